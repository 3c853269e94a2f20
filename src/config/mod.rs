//! Environment-bound runner configuration, validated once at startup.
use std::env;

use crate::lib::errors::ConfigError;

pub mod aws;
pub mod poll;
pub mod task;

pub use aws::{parse_aws_section, AwsSection, DEFAULT_PROFILE};
pub use poll::{parse_poll_section, PollSection, DEFAULT_START_WAIT_SECS};
pub use task::{parse_task_section, LaunchMode, TaskSection};

/// Top-level configuration container.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub aws: AwsSection,
    pub task: TaskSection,
    pub poll: PollSection,
}

impl RunnerConfig {
    /// Bind configuration from the process environment.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Bind configuration from an arbitrary lookup. Tests use this to bind a
    /// plain map instead of mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let aws = parse_aws_section(&lookup)?;
        let task = parse_task_section(&lookup)?;
        let poll = parse_poll_section(&lookup)?;
        Ok(Self { aws, task, poll })
    }
}

/// Variable lookup that treats empty or blank values as unset.
pub(crate) fn lookup_var(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    lookup(var)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Boolean parsing with the `strconv.ParseBool` alphabet.
pub(crate) fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            var,
            value: value.to_string(),
            message: "expected a boolean such as true or false",
        }),
    }
}

/// Comma-separated list parsing; blank entries are dropped.
pub(crate) fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |var| {
            pairs
                .iter()
                .find(|(name, _)| *name == var)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn minimal_environment_yields_defaults() {
        let config = RunnerConfig::from_lookup(lookup_from(&[("TASKDEF", "batch:3")]))
            .expect("TASKDEF alone should be enough");

        assert_eq!(config.task.task_definition, "batch:3");
        assert_eq!(config.task.cluster, "");
        assert_eq!(config.task.launch_mode, LaunchMode::Fargate);
        assert!(config.task.assign_public_ip);
        assert!(config.task.subnets.is_empty());
        assert!(config.task.security_groups.is_empty());
        assert_eq!(config.task.env_prefix, None);
        assert_eq!(config.poll.start_wait, Duration::from_secs(40));
        assert!(!config.poll.show_pending);
        assert!(!config.poll.print_time);
    }

    #[test]
    fn missing_task_definition_is_an_error() {
        let error = RunnerConfig::from_lookup(lookup_from(&[]))
            .expect_err("should error without TASKDEF");
        assert!(error.to_string().contains("TASKDEF"), "error: {error}");
    }

    #[test]
    fn malformed_boolean_is_an_error() {
        let error =
            RunnerConfig::from_lookup(lookup_from(&[("TASKDEF", "batch"), ("PUBLICIP", "yes")]))
                .expect_err("should reject a malformed boolean");
        assert!(error.to_string().contains("PUBLICIP"), "error: {error}");
    }

    #[test]
    fn boolean_alphabet_matches_parse_bool() {
        for value in ["1", "t", "T", "true", "TRUE", "True"] {
            assert!(parse_bool("X", value).expect("truthy value"));
        }
        for value in ["0", "f", "F", "false", "FALSE", "False"] {
            assert!(!parse_bool("X", value).expect("falsy value"));
        }
        assert!(parse_bool("X", "on").is_err());
    }

    #[test]
    fn list_variables_split_on_commas() {
        let config = RunnerConfig::from_lookup(lookup_from(&[
            ("TASKDEF", "batch"),
            ("SUBNETS", "subnet-1, subnet-2,"),
            ("SECGROUPS", "sg-1"),
        ]))
        .expect("lists should parse");

        assert_eq!(config.task.subnets, vec!["subnet-1", "subnet-2"]);
        assert_eq!(config.task.security_groups, vec!["sg-1"]);
    }

    #[test]
    fn ec2_launch_mode_is_recognized() {
        let config = RunnerConfig::from_lookup(lookup_from(&[
            ("TASKDEF", "batch"),
            ("LAUNCHTYPE", "ec2"),
        ]))
        .expect("EC2 should parse case-insensitively");
        assert_eq!(config.task.launch_mode, LaunchMode::Ec2);

        let error = RunnerConfig::from_lookup(lookup_from(&[
            ("TASKDEF", "batch"),
            ("LAUNCHTYPE", "LAMBDA"),
        ]))
        .expect_err("unknown launch type should be rejected");
        assert!(error.to_string().contains("LAUNCHTYPE"), "error: {error}");
    }

    #[test]
    fn start_wait_is_bound_in_seconds() {
        let config = RunnerConfig::from_lookup(lookup_from(&[
            ("TASKDEF", "batch"),
            ("STARTWAIT", "0"),
        ]))
        .expect("STARTWAIT should parse");
        assert_eq!(config.poll.start_wait, Duration::ZERO);

        let error = RunnerConfig::from_lookup(lookup_from(&[
            ("TASKDEF", "batch"),
            ("STARTWAIT", "soon"),
        ]))
        .expect_err("non-numeric STARTWAIT should be rejected");
        assert!(error.to_string().contains("STARTWAIT"), "error: {error}");
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let config = RunnerConfig::from_lookup(lookup_from(&[
            ("TASKDEF", "batch"),
            ("LAUNCHTYPE", "  "),
            ("PUBLICIP", ""),
        ]))
        .expect("blank values should fall back to defaults");
        assert_eq!(config.task.launch_mode, LaunchMode::Fargate);
        assert!(config.task.assign_public_ip);
    }
}
