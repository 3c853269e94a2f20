//! Service seams and the domain types shared by the launcher and poller.
use async_trait::async_trait;

use crate::config::LaunchMode;
use crate::lib::errors::PollError;

/// Network placement parameters for awsvpc-mode tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPlacement {
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub assign_public_ip: bool,
}

/// Command and environment override targeting a single container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOverride {
    pub container_name: String,
    pub command: Vec<String>,
    pub environment: Vec<(String, String)>,
}

/// Immutable run submission built by the launcher.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub task_definition: String,
    pub cluster: String,
    pub launch_mode: LaunchMode,
    pub count: i32,
    pub network: Option<NetworkPlacement>,
    pub overrides: Option<CommandOverride>,
}

/// One task the service reports as started.
#[derive(Debug, Clone)]
pub struct StartedTask {
    pub task_arn: String,
    pub container_names: Vec<String>,
}

/// One failure the service reports for a submission or status query.
#[derive(Debug, Clone)]
pub struct LaunchFailure {
    pub arn: Option<String>,
    pub reason: Option<String>,
}

/// Raw outcome of a run submission, before the fail-fast policy applies.
#[derive(Debug, Clone, Default)]
pub struct RunTaskResult {
    pub tasks: Vec<StartedTask>,
    pub failures: Vec<LaunchFailure>,
}

/// Launched task handle: identifier plus primary container name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedTask {
    pub task_arn: String,
    pub container_name: String,
}

/// Task lifecycle states; unrecognized values are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Stopped,
    Other(String),
}

impl TaskStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "PENDING" => TaskStatus::Pending,
            "RUNNING" => TaskStatus::Running,
            "STOPPED" => TaskStatus::Stopped,
            other => TaskStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Stopped => "STOPPED",
            TaskStatus::Other(value) => value,
        }
    }
}

/// Remote-reported status snapshot for one task.
#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    pub status: TaskStatus,
    pub exit_code: Option<i32>,
}

/// Where the task's log lines live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRoute {
    pub group: String,
    pub stream: String,
}

/// A single remote log line: epoch seconds plus message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub timestamp: i64,
    pub message: String,
}

/// One page of log lines plus the forward continuation token.
#[derive(Debug, Clone, Default)]
pub struct LogPage {
    pub events: Vec<LogEvent>,
    pub next_forward_token: Option<String>,
}

/// Operations the launcher and poller need from the container orchestrator.
#[async_trait]
pub trait TaskApi {
    /// Container names declared by a task definition, in definition order.
    async fn container_names(&self, task_definition: &str) -> anyhow::Result<Vec<String>>;

    /// Submit a run request.
    async fn run_task(&self, request: &RunRequest) -> anyhow::Result<RunTaskResult>;

    /// Snapshot the current status of one task. Service-reported failures
    /// and an empty task list both surface as [`PollError::TaskNotFound`].
    async fn describe_task(&self, cluster: &str, task_id: &str)
        -> Result<TaskSnapshot, PollError>;
}

/// Log retrieval operations.
#[async_trait]
pub trait LogsApi {
    /// Fetch one page of log events starting at `token`.
    async fn log_events(&self, route: &LogRoute, token: Option<&str>) -> anyhow::Result<LogPage>;
}
