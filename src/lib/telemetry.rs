//! Telemetry initialization and task span helpers.

use std::time::Instant;

use anyhow::Result;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize `tracing`. Diagnostics go to stderr; stdout carries only the
/// task's own log lines.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper to record start and finish of one launched task.
pub struct TaskSpan {
    span: Span,
    started_at: Instant,
}

impl TaskSpan {
    /// Start a task span.
    pub fn start(task_id: &str) -> Self {
        let span = info_span!(
            target: "ecsrun::task",
            "ecs_task",
            task_id
        );
        Self {
            span,
            started_at: Instant::now(),
        }
    }

    /// Close the span while recording status and completion info.
    pub fn finish(self, status: &'static str, exit_code: Option<i32>) {
        let elapsed_ms = self.started_at.elapsed().as_millis() as u64;
        let _entered = self.span.enter();
        info!(
            target: "ecsrun::task",
            status = status,
            exit_code = exit_code,
            elapsed_ms = elapsed_ms,
            "Task finished"
        );
    }
}
