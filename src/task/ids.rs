/// The log-group family of a task definition reference: everything before
/// the first `:` of a `family:revision` pair, or the whole value.
pub fn group_id(task_definition: &str) -> &str {
    task_definition
        .split(':')
        .next()
        .unwrap_or(task_definition)
}

/// The trailing task id of a task ARN. Matches a final slash-free `task/`
/// segment; anything else yields an empty id.
pub fn task_id(task_arn: &str) -> &str {
    match task_arn.rfind("task/") {
        Some(position) => {
            let id = &task_arn[position + "task/".len()..];
            if id.is_empty() || id.contains('/') {
                ""
            } else {
                id
            }
        }
        None => "",
    }
}
