use std::time::Duration;

use crate::lib::errors::ConfigError;

use super::{lookup_var, parse_bool};

pub const START_WAIT_ENV: &str = "STARTWAIT";
pub const SHOW_PENDING_ENV: &str = "SHOWPENDING";
pub const PRINT_TIME_ENV: &str = "PRINT_TIME";

/// Seconds to wait before the first status poll, giving the scheduler time
/// to place the task and create its log stream.
pub const DEFAULT_START_WAIT_SECS: u64 = 40;

/// Polling and output settings bound from the environment.
#[derive(Debug, Clone)]
pub struct PollSection {
    pub start_wait: Duration,
    pub show_pending: bool,
    pub print_time: bool,
}

pub fn parse_poll_section(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<PollSection, ConfigError> {
    let start_wait = match lookup_var(lookup, START_WAIT_ENV) {
        Some(value) => {
            let secs = value.parse::<u64>().map_err(|_| ConfigError::InvalidVar {
                var: START_WAIT_ENV,
                value: value.clone(),
                message: "expected a whole number of seconds",
            })?;
            Duration::from_secs(secs)
        }
        None => Duration::from_secs(DEFAULT_START_WAIT_SECS),
    };

    let show_pending = match lookup_var(lookup, SHOW_PENDING_ENV) {
        Some(value) => parse_bool(SHOW_PENDING_ENV, &value)?,
        None => false,
    };
    let print_time = match lookup_var(lookup, PRINT_TIME_ENV) {
        Some(value) => parse_bool(PRINT_TIME_ENV, &value)?,
        None => false,
    };

    Ok(PollSection {
        start_wait,
        show_pending,
        print_time,
    })
}
