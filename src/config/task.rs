use crate::lib::errors::ConfigError;

use super::{lookup_var, parse_bool, parse_list};

pub const TASK_DEFINITION_ENV: &str = "TASKDEF";
pub const CLUSTER_ENV: &str = "CLUSTER";
pub const LAUNCH_TYPE_ENV: &str = "LAUNCHTYPE";
pub const ASSIGN_PUBLIC_IP_ENV: &str = "PUBLICIP";
pub const SECURITY_GROUPS_ENV: &str = "SECGROUPS";
pub const SUBNETS_ENV: &str = "SUBNETS";
pub const ENV_PREFIX_ENV: &str = "ENVPREFIX";

pub const DEFAULT_ASSIGN_PUBLIC_IP: bool = true;

/// Where the task runs: Fargate capacity (awsvpc placement required) or
/// self-managed EC2 instances (no placement fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Fargate,
    Ec2,
}

impl LaunchMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LaunchMode::Fargate => "FARGATE",
            LaunchMode::Ec2 => "EC2",
        }
    }
}

/// Task launch settings bound from the environment.
#[derive(Debug, Clone)]
pub struct TaskSection {
    pub task_definition: String,
    pub cluster: String,
    pub launch_mode: LaunchMode,
    pub assign_public_ip: bool,
    pub security_groups: Vec<String>,
    pub subnets: Vec<String>,
    pub env_prefix: Option<String>,
}

pub fn parse_task_section(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<TaskSection, ConfigError> {
    let task_definition = lookup_var(lookup, TASK_DEFINITION_ENV).ok_or(
        ConfigError::MissingVar {
            var: TASK_DEFINITION_ENV,
        },
    )?;

    let launch_mode = match lookup_var(lookup, LAUNCH_TYPE_ENV) {
        Some(value) => parse_launch_mode(&value)?,
        None => LaunchMode::Fargate,
    };

    let assign_public_ip = match lookup_var(lookup, ASSIGN_PUBLIC_IP_ENV) {
        Some(value) => parse_bool(ASSIGN_PUBLIC_IP_ENV, &value)?,
        None => DEFAULT_ASSIGN_PUBLIC_IP,
    };

    Ok(TaskSection {
        task_definition,
        cluster: lookup_var(lookup, CLUSTER_ENV).unwrap_or_default(),
        launch_mode,
        assign_public_ip,
        security_groups: lookup_var(lookup, SECURITY_GROUPS_ENV)
            .map(|value| parse_list(&value))
            .unwrap_or_default(),
        subnets: lookup_var(lookup, SUBNETS_ENV)
            .map(|value| parse_list(&value))
            .unwrap_or_default(),
        env_prefix: lookup_var(lookup, ENV_PREFIX_ENV),
    })
}

fn parse_launch_mode(value: &str) -> Result<LaunchMode, ConfigError> {
    match value.to_ascii_uppercase().as_str() {
        "FARGATE" => Ok(LaunchMode::Fargate),
        "EC2" => Ok(LaunchMode::Ec2),
        _ => Err(ConfigError::InvalidVar {
            var: LAUNCH_TYPE_ENV,
            value: value.to_string(),
            message: "expected FARGATE or EC2",
        }),
    }
}
