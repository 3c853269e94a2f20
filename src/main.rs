//! Entry point for ecsrun.
use std::io;
use std::process::ExitCode;

use clap::Parser;
use ecsrun::{
    aws,
    cli::RunTaskArgs,
    config::RunnerConfig,
    lib::telemetry,
    runner::{self, RunnerExit},
    task::{CloudWatchLogsApi, EcsTaskApi},
};

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(code) => code,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<ExitCode, RunnerExit> {
    telemetry::init_tracing().map_err(RunnerExit::setup)?;
    let args = RunTaskArgs::parse();
    let config = RunnerConfig::load_from_env().map_err(RunnerExit::setup)?;

    let profile = aws::resolve_profile(&config.aws).map_err(RunnerExit::setup)?;
    let sdk_config = aws::load_sdk_config(&config.aws, profile.as_ref()).await;
    let tasks = EcsTaskApi::new(&sdk_config);
    let logs = CloudWatchLogsApi::new(&sdk_config);

    let mut stdout = io::stdout();
    let code = runner::execute(&tasks, &logs, &config, &args.command, &mut stdout).await?;
    Ok(exit_code_from(code))
}

/// Remote exit codes are container exit statuses and fit in 0-255.
fn exit_code_from(code: i32) -> ExitCode {
    ExitCode::from(code.clamp(0, u8::MAX as i32) as u8)
}
