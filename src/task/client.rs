use anyhow::anyhow;
use async_trait::async_trait;
use aws_sdk_ecs::error::DisplayErrorContext;
use aws_sdk_ecs::types::{
    AssignPublicIp, AwsVpcConfiguration, ContainerOverride, KeyValuePair, LaunchType,
    NetworkConfiguration, TaskOverride,
};

use crate::config::LaunchMode;
use crate::lib::errors::PollError;

use super::api::{
    CommandOverride, LaunchFailure, LogEvent, LogPage, LogRoute, LogsApi, NetworkPlacement,
    RunRequest, RunTaskResult, StartedTask, TaskApi, TaskSnapshot, TaskStatus,
};

/// ECS-backed implementation of [`TaskApi`].
#[derive(Debug, Clone)]
pub struct EcsTaskApi {
    client: aws_sdk_ecs::Client,
}

impl EcsTaskApi {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_ecs::Client::new(config),
        }
    }
}

#[async_trait]
impl TaskApi for EcsTaskApi {
    async fn container_names(&self, task_definition: &str) -> anyhow::Result<Vec<String>> {
        let output = self
            .client
            .describe_task_definition()
            .task_definition(task_definition)
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))?;

        let names = output
            .task_definition()
            .map(|definition| definition.container_definitions())
            .unwrap_or_default()
            .iter()
            .filter_map(|container| container.name().map(str::to_string))
            .collect();
        Ok(names)
    }

    async fn run_task(&self, request: &RunRequest) -> anyhow::Result<RunTaskResult> {
        let mut call = self
            .client
            .run_task()
            .task_definition(&request.task_definition)
            .launch_type(launch_type(request.launch_mode))
            .count(request.count);
        if !request.cluster.is_empty() {
            call = call.cluster(&request.cluster);
        }
        if let Some(network) = &request.network {
            call = call.network_configuration(network_configuration(network)?);
        }
        if let Some(overrides) = &request.overrides {
            call = call.overrides(task_override(overrides));
        }

        let output = call
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))?;
        Ok(RunTaskResult {
            tasks: output.tasks().iter().map(started_task).collect(),
            failures: output.failures().iter().map(launch_failure).collect(),
        })
    }

    async fn describe_task(
        &self,
        cluster: &str,
        task_id: &str,
    ) -> Result<TaskSnapshot, PollError> {
        let mut call = self.client.describe_tasks().tasks(task_id);
        if !cluster.is_empty() {
            call = call.cluster(cluster);
        }

        let output = call.send().await.map_err(|err| PollError::Status {
            source: anyhow!("{}", DisplayErrorContext(&err)),
        })?;
        if !output.failures().is_empty() {
            return Err(PollError::TaskNotFound);
        }

        let container = output
            .tasks()
            .iter()
            .flat_map(|task| task.containers())
            .next()
            .ok_or(PollError::TaskNotFound)?;
        Ok(TaskSnapshot {
            status: TaskStatus::parse(container.last_status().unwrap_or_default()),
            exit_code: container.exit_code(),
        })
    }
}

fn launch_type(mode: LaunchMode) -> LaunchType {
    match mode {
        LaunchMode::Fargate => LaunchType::Fargate,
        LaunchMode::Ec2 => LaunchType::Ec2,
    }
}

fn network_configuration(network: &NetworkPlacement) -> anyhow::Result<NetworkConfiguration> {
    let assign = if network.assign_public_ip {
        AssignPublicIp::Enabled
    } else {
        AssignPublicIp::Disabled
    };
    let awsvpc = AwsVpcConfiguration::builder()
        .set_subnets(Some(network.subnets.clone()))
        .set_security_groups(Some(network.security_groups.clone()))
        .assign_public_ip(assign)
        .build()?;
    Ok(NetworkConfiguration::builder()
        .awsvpc_configuration(awsvpc)
        .build())
}

fn task_override(overrides: &CommandOverride) -> TaskOverride {
    let mut container = ContainerOverride::builder()
        .name(&overrides.container_name)
        .set_command(Some(overrides.command.clone()));
    if !overrides.environment.is_empty() {
        let pairs = overrides
            .environment
            .iter()
            .map(|(name, value)| KeyValuePair::builder().name(name).value(value).build())
            .collect();
        container = container.set_environment(Some(pairs));
    }
    TaskOverride::builder()
        .container_overrides(container.build())
        .build()
}

fn started_task(task: &aws_sdk_ecs::types::Task) -> StartedTask {
    StartedTask {
        task_arn: task.task_arn().unwrap_or_default().to_string(),
        container_names: task
            .containers()
            .iter()
            .filter_map(|container| container.name().map(str::to_string))
            .collect(),
    }
}

fn launch_failure(failure: &aws_sdk_ecs::types::Failure) -> LaunchFailure {
    LaunchFailure {
        arn: failure.arn().map(str::to_string),
        reason: failure.reason().map(str::to_string),
    }
}

/// CloudWatch Logs-backed implementation of [`LogsApi`].
#[derive(Debug, Clone)]
pub struct CloudWatchLogsApi {
    client: aws_sdk_cloudwatchlogs::Client,
}

impl CloudWatchLogsApi {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudwatchlogs::Client::new(config),
        }
    }
}

#[async_trait]
impl LogsApi for CloudWatchLogsApi {
    async fn log_events(&self, route: &LogRoute, token: Option<&str>) -> anyhow::Result<LogPage> {
        let output = self
            .client
            .get_log_events()
            .log_group_name(&route.group)
            .log_stream_name(&route.stream)
            .start_from_head(true)
            .set_next_token(token.map(str::to_string))
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))?;

        let events = output
            .events()
            .iter()
            .map(|event| LogEvent {
                // the service reports milliseconds; the seam carries seconds
                timestamp: event.timestamp().unwrap_or_default() / 1000,
                message: event.message().unwrap_or_default().to_string(),
            })
            .collect();
        Ok(LogPage {
            events,
            next_forward_token: output.next_forward_token().map(str::to_string),
        })
    }
}
