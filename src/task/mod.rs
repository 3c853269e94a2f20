//! Task launch, identifier helpers, and the completion/log poller.

pub mod api;
pub mod client;
pub mod ids;
pub mod launcher;
pub mod poller;

pub use api::{LaunchedTask, LogRoute, LogsApi, RunRequest, TaskApi};
pub use client::{CloudWatchLogsApi, EcsTaskApi};
pub use poller::{PollSettings, POLL_INTERVAL};
