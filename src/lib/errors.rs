use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while binding and validating the environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("environment variable `{var}` is required")]
    MissingVar { var: &'static str },
    /// A variable is set but fails validation.
    #[error("environment variable `{var}` has invalid value `{value}`: {message}")]
    InvalidVar {
        var: &'static str,
        value: String,
        message: &'static str,
    },
}

/// Errors raised while reading the shared AWS credential/config files.
///
/// A missing file or section is not an error; resolution is simply absent
/// and the caller falls back to ambient credentials.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to load shared AWS file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
}

/// Failures while constructing or submitting the run request.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("the run request count must be 1 (got {count})")]
    CountExceeded { count: i32 },
    #[error("the task definition declares no containers to override")]
    NoContainer,
    #[error("task launch rejected: {reasons}")]
    Rejected { reasons: String },
    #[error("the launch response contained no task")]
    MissingTask,
    #[error("failed to submit the run request: {source}")]
    Api {
        #[source]
        source: anyhow::Error,
    },
}

/// Fatal failures of the status-poll loop.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("task not found")]
    TaskNotFound,
    #[error("failed to query task status: {source}")]
    Status {
        #[source]
        source: anyhow::Error,
    },
}

/// Failures of a single log fetch. Never fatal to the poll loop.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("log request failed: {source}")]
    Api {
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to write log output: {source}")]
    Sink {
        #[from]
        source: io::Error,
    },
}
