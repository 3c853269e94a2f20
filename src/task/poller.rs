//! Task completion polling and log pagination.
//!
//! The loop has no overall deadline: a task that never stops keeps the
//! poller alive until the process is killed. The startup wait and the poll
//! interval are the only time parameters.
use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};

use crate::config::PollSection;
use crate::lib::errors::{FetchError, PollError};

use super::api::{LogPage, LogRoute, LogsApi, TaskApi, TaskStatus};

/// Fixed delay between status polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Knobs for one polling run.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub start_wait: Duration,
    pub poll_interval: Duration,
    pub show_pending: bool,
    pub print_time: bool,
}

impl PollSettings {
    pub fn new(poll: &PollSection) -> Self {
        Self {
            start_wait: poll.start_wait,
            poll_interval: POLL_INTERVAL,
            show_pending: poll.show_pending,
            print_time: poll.print_time,
        }
    }
}

/// Wait for the task to stop, streaming new log pages between status polls.
///
/// Returns the remote-reported exit code (0 when the task stopped without
/// one). A status-poll failure aborts the loop; a log-fetch failure is
/// logged and the next iteration retries from the current cursor.
pub async fn wait_for_exit<T, L, W>(
    tasks: &T,
    logs: &L,
    cluster: &str,
    task_id: &str,
    route: &LogRoute,
    settings: &PollSettings,
    sink: &mut W,
) -> Result<i32, PollError>
where
    T: TaskApi,
    L: LogsApi,
    W: Write,
{
    tokio::time::sleep(settings.start_wait).await;

    let mut cursor: Option<String> = None;
    loop {
        let snapshot = tasks.describe_task(cluster, task_id).await?;

        if snapshot.status == TaskStatus::Pending {
            if settings.show_pending {
                info!(
                    target: "ecsrun::poll",
                    status = snapshot.status.as_str(),
                    "Task status"
                );
            }
            tokio::time::sleep(settings.poll_interval).await;
            continue;
        }

        if let Err(err) =
            fetch_log_pages(logs, route, &mut cursor, settings.print_time, sink).await
        {
            warn!(
                target: "ecsrun::poll",
                error = %err,
                "Log fetch failed; retrying on the next poll"
            );
        }

        if snapshot.status == TaskStatus::Stopped {
            return Ok(snapshot.exit_code.unwrap_or(0));
        }
        tokio::time::sleep(settings.poll_interval).await;
    }
}

/// Drain new log pages, advancing `cursor` as pages arrive.
///
/// The service signals exhaustion by echoing back the token it was sent, so
/// the loop stops as soon as the token it would send next equals the token
/// the last response returned. On an API error the cursor keeps its
/// last-known-good position; on a sink error it skips past the partially
/// written page rather than re-emit it.
async fn fetch_log_pages<L, W>(
    logs: &L,
    route: &LogRoute,
    cursor: &mut Option<String>,
    print_time: bool,
    sink: &mut W,
) -> Result<(), FetchError>
where
    L: LogsApi,
    W: Write,
{
    let mut last_returned: Option<String> = None;
    loop {
        if cursor.is_some() && *cursor == last_returned {
            return Ok(());
        }
        if let Some(returned) = last_returned.take() {
            *cursor = Some(returned);
        }

        let page = logs
            .log_events(route, cursor.as_deref())
            .await
            .map_err(|source| FetchError::Api { source })?;
        last_returned = page.next_forward_token.clone();

        if let Err(err) = emit_page(&page, print_time, sink) {
            if let Some(returned) = last_returned {
                *cursor = Some(returned);
            }
            return Err(FetchError::Sink { source: err });
        }
    }
}

fn emit_page<W: Write>(page: &LogPage, print_time: bool, sink: &mut W) -> std::io::Result<()> {
    for event in &page.events {
        if print_time {
            writeln!(sink, "{} {}", format_timestamp(event.timestamp), event.message)?;
        } else {
            writeln!(sink, "{}", event.message)?;
        }
    }
    Ok(())
}

fn format_timestamp(epoch_secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(epoch_secs, 0)
        .map(|timestamp| timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}
