//! Run request construction and task submission.
use std::env;

use crate::config::{LaunchMode, TaskSection};
use crate::lib::errors::LaunchError;

use super::api::{
    CommandOverride, LaunchFailure, LaunchedTask, NetworkPlacement, RunRequest, RunTaskResult,
    TaskApi,
};

/// Build the run request, resolving the override container when a command
/// is given.
pub async fn prepare_request<T: TaskApi>(
    api: &T,
    task: &TaskSection,
    command: &[String],
) -> Result<RunRequest, LaunchError> {
    let overrides = match command {
        [] => None,
        command => {
            let names = api
                .container_names(&task.task_definition)
                .await
                .map_err(|source| LaunchError::Api { source })?;
            let container_name =
                pick_override_container(&names).ok_or(LaunchError::NoContainer)?;
            Some(CommandOverride {
                container_name: container_name.to_string(),
                command: command.to_vec(),
                environment: match &task.env_prefix {
                    Some(prefix) => prefixed_environment(prefix, env::vars()),
                    None => Vec::new(),
                },
            })
        }
    };

    Ok(RunRequest {
        task_definition: task.task_definition.clone(),
        cluster: task.cluster.clone(),
        launch_mode: task.launch_mode,
        count: 1,
        network: network_placement(task),
        overrides,
    })
}

/// Placement is only meaningful for Fargate capacity; EC2 launches omit it.
fn network_placement(task: &TaskSection) -> Option<NetworkPlacement> {
    match task.launch_mode {
        LaunchMode::Fargate => Some(NetworkPlacement {
            subnets: task.subnets.clone(),
            security_groups: task.security_groups.clone(),
            assign_public_ip: task.assign_public_ip,
        }),
        LaunchMode::Ec2 => None,
    }
}

/// Which container receives a command override: the last declared one.
/// Single-container definitions are the expected case; with several, the
/// definition order decides the target.
pub fn pick_override_container(names: &[String]) -> Option<&str> {
    names.last().map(String::as_str)
}

/// Environment entries whose names start with `prefix`, prefix stripped.
pub fn prefixed_environment(
    prefix: &str,
    vars: impl Iterator<Item = (String, String)>,
) -> Vec<(String, String)> {
    if prefix.is_empty() {
        return Vec::new();
    }
    vars.filter_map(|(name, value)| {
        name.strip_prefix(prefix)
            .map(|stripped| (stripped.to_string(), value))
    })
    .collect()
}

/// Submit the request. Any failure the service reports voids the whole
/// call, even when the response also carries started tasks.
pub async fn submit<T: TaskApi>(
    api: &T,
    request: &RunRequest,
) -> Result<LaunchedTask, LaunchError> {
    if request.count > 1 {
        return Err(LaunchError::CountExceeded {
            count: request.count,
        });
    }

    let result = api
        .run_task(request)
        .await
        .map_err(|source| LaunchError::Api { source })?;
    fail_fast(result)
}

fn fail_fast(result: RunTaskResult) -> Result<LaunchedTask, LaunchError> {
    if !result.failures.is_empty() {
        return Err(LaunchError::Rejected {
            reasons: describe_failures(&result.failures),
        });
    }
    let task = result
        .tasks
        .into_iter()
        .next()
        .ok_or(LaunchError::MissingTask)?;
    let container_name = task.container_names.into_iter().next().unwrap_or_default();
    Ok(LaunchedTask {
        task_arn: task.task_arn,
        container_name,
    })
}

fn describe_failures(failures: &[LaunchFailure]) -> String {
    failures
        .iter()
        .map(|failure| {
            format!(
                "{} ({})",
                failure.reason.as_deref().unwrap_or("unknown reason"),
                failure.arn.as_deref().unwrap_or("no arn")
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}
