//! Launch-and-tail execution pipeline and process exit mapping.
use std::io::Write;
use std::process::ExitCode;

use anyhow::Error;
use tracing::info;

use crate::config::RunnerConfig;
use crate::lib::errors::PollError;
use crate::lib::telemetry::TaskSpan;
use crate::task::api::{LogRoute, LogsApi, TaskApi};
use crate::task::poller::PollSettings;
use crate::task::{ids, launcher, poller};

/// Exit code for configuration and launch failures.
pub const EXIT_SETUP_FAILURE: u8 = 1;
/// Exit code for fatal status-poll failures, including task-not-found.
pub const EXIT_POLL_FAILURE: u8 = 2;

/// Bundles a fatal error message with the process exit code.
#[derive(Debug)]
pub struct RunnerExit {
    message: String,
    code: u8,
}

impl RunnerExit {
    /// Configuration or launch failure.
    pub fn setup(err: impl Into<Error>) -> Self {
        Self::new(err, EXIT_SETUP_FAILURE)
    }

    /// Fatal status-poll failure.
    pub fn poll(err: PollError) -> Self {
        Self::new(err, EXIT_POLL_FAILURE)
    }

    fn new(err: impl Into<Error>, code: u8) -> Self {
        let err = err.into();
        Self {
            message: format!("{err:?}"),
            code,
        }
    }

    pub fn report(self) -> ExitCode {
        eprintln!("{}", self.message);
        ExitCode::from(self.code)
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Launch the task and tail it to completion, returning the task's exit
/// code.
pub async fn execute<T, L, W>(
    tasks: &T,
    logs: &L,
    config: &RunnerConfig,
    command: &[String],
    sink: &mut W,
) -> Result<i32, RunnerExit>
where
    T: TaskApi,
    L: LogsApi,
    W: Write,
{
    let request = launcher::prepare_request(tasks, &config.task, command)
        .await
        .map_err(RunnerExit::setup)?;
    let launched = launcher::submit(tasks, &request)
        .await
        .map_err(RunnerExit::setup)?;

    let task_id = ids::task_id(&launched.task_arn).to_string();
    let route = LogRoute {
        group: format!("/ecs/{}", ids::group_id(&config.task.task_definition)),
        stream: format!("ecs/{}/{}", launched.container_name, task_id),
    };
    info!(
        target: "ecsrun::runner",
        task_arn = %launched.task_arn,
        container = %launched.container_name,
        log_group = %route.group,
        log_stream = %route.stream,
        "Task launched; waiting for completion"
    );

    let span = TaskSpan::start(&task_id);
    let settings = PollSettings::new(&config.poll);
    match poller::wait_for_exit(
        tasks,
        logs,
        &config.task.cluster,
        &task_id,
        &route,
        &settings,
        sink,
    )
    .await
    {
        Ok(code) => {
            span.finish("stopped", Some(code));
            Ok(code)
        }
        Err(err) => {
            span.finish("failed", None);
            Err(RunnerExit::poll(err))
        }
    }
}
