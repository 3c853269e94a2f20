//! CLI argument definitions.
use clap::Parser;

/// Command-line arguments. Everything except the command override is bound
/// from the environment; the variable list prints below `--help`.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version = version_string(),
    about = "Run a one-off ECS task and stream its CloudWatch logs until it stops",
    after_help = ENV_HELP
)]
pub struct RunTaskArgs {
    /// Container command override, forwarded verbatim to the target
    /// container.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Version line carrying the commit and build date when the build pipeline
/// provides them.
fn version_string() -> &'static str {
    use std::sync::OnceLock;
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION
        .get_or_init(|| {
            format!(
                "{} (commit {}, built {})",
                env!("CARGO_PKG_VERSION"),
                option_env!("ECSRUN_COMMIT").unwrap_or("none"),
                option_env!("ECSRUN_BUILD_DATE").unwrap_or("unknown"),
            )
        })
        .as_str()
}

const ENV_HELP: &str = "\
Environment variables:
  TASKDEF       (required) family, family:revision, or full task definition ARN
  CLUSTER       cluster name; empty means the default cluster
  LAUNCHTYPE    FARGATE (default) or EC2
  SUBNETS       comma-separated subnet ids (awsvpc placement)
  SECGROUPS     comma-separated security group ids (awsvpc placement)
  PUBLICIP      assign a public IP (default true)
  STARTWAIT     seconds to wait before the first status poll (default 40)
  SHOWPENDING   log a notice while the task is PENDING (default false)
  PRINT_TIME    prefix each log line with an RFC3339 timestamp (default false)
  ENVPREFIX     forward prefixed environment variables to the container
                (applies only together with a command override)
  AWS_PROFILE, AWS_DEFAULT_PROFILE, AWS_REGION, AWS_DEFAULT_REGION,
  AWS_CONFIG_FILE, AWS_SHARED_CREDENTIALS_FILE, HOME";
