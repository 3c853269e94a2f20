//! End-to-end launch → poll → emit pipeline against in-memory service mocks.
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ecsrun::config::{AwsSection, LaunchMode, PollSection, RunnerConfig, TaskSection};
use ecsrun::lib::errors::PollError;
use ecsrun::runner;
use ecsrun::task::api::{
    LogEvent, LogPage, LogRoute, LogsApi, RunRequest, RunTaskResult, StartedTask, TaskApi,
    TaskSnapshot, TaskStatus,
};

fn config() -> RunnerConfig {
    RunnerConfig {
        aws: AwsSection::default(),
        task: TaskSection {
            task_definition: "batch:3".to_string(),
            cluster: "jobs".to_string(),
            launch_mode: LaunchMode::Fargate,
            assign_public_ip: true,
            security_groups: vec!["sg-1".to_string()],
            subnets: vec!["subnet-1".to_string()],
            env_prefix: None,
        },
        poll: PollSection {
            start_wait: Duration::ZERO,
            show_pending: false,
            print_time: false,
        },
    }
}

struct FakeOrchestrator {
    container_names: Vec<String>,
    run_result: RunTaskResult,
    snapshots: Mutex<Vec<Result<TaskSnapshot, PollError>>>,
    seen_request: Mutex<Option<RunRequest>>,
}

impl FakeOrchestrator {
    fn new(run_result: RunTaskResult, snapshots: Vec<Result<TaskSnapshot, PollError>>) -> Self {
        Self {
            container_names: vec!["app".to_string(), "sidecar".to_string()],
            run_result,
            snapshots: Mutex::new(snapshots),
            seen_request: Mutex::new(None),
        }
    }

    fn seen_request(&self) -> Option<RunRequest> {
        self.seen_request.lock().expect("request lock").clone()
    }
}

#[async_trait]
impl TaskApi for FakeOrchestrator {
    async fn container_names(&self, _task_definition: &str) -> anyhow::Result<Vec<String>> {
        Ok(self.container_names.clone())
    }

    async fn run_task(&self, request: &RunRequest) -> anyhow::Result<RunTaskResult> {
        *self.seen_request.lock().expect("request lock") = Some(request.clone());
        Ok(self.run_result.clone())
    }

    async fn describe_task(
        &self,
        _cluster: &str,
        _task_id: &str,
    ) -> Result<TaskSnapshot, PollError> {
        self.snapshots.lock().expect("snapshots lock").remove(0)
    }
}

/// Serves scripted pages, then echoes the token it is sent. Records the
/// route of the first request for assertions.
struct FakeLogs {
    pages: Mutex<Vec<LogPage>>,
    seen_route: Mutex<Option<LogRoute>>,
}

impl FakeLogs {
    fn new(pages: Vec<LogPage>) -> Self {
        Self {
            pages: Mutex::new(pages),
            seen_route: Mutex::new(None),
        }
    }

    fn seen_route(&self) -> Option<LogRoute> {
        self.seen_route.lock().expect("route lock").clone()
    }
}

#[async_trait]
impl LogsApi for FakeLogs {
    async fn log_events(&self, route: &LogRoute, token: Option<&str>) -> anyhow::Result<LogPage> {
        self.seen_route
            .lock()
            .expect("route lock")
            .get_or_insert_with(|| route.clone());

        let mut pages = self.pages.lock().expect("pages lock");
        if pages.is_empty() {
            return Ok(LogPage {
                events: Vec::new(),
                next_forward_token: Some(token.unwrap_or("bootstrap").to_string()),
            });
        }
        Ok(pages.remove(0))
    }
}

fn started_task() -> RunTaskResult {
    RunTaskResult {
        tasks: vec![StartedTask {
            task_arn: "arn:aws:ecs:us-east-1:954586889057:task/abc-123".to_string(),
            container_names: vec!["app".to_string()],
        }],
        failures: Vec::new(),
    }
}

fn stopped(exit_code: Option<i32>) -> Result<TaskSnapshot, PollError> {
    Ok(TaskSnapshot {
        status: TaskStatus::Stopped,
        exit_code,
    })
}

#[tokio::test]
async fn run_streams_logs_and_returns_the_exit_code() {
    let tasks = FakeOrchestrator::new(started_task(), vec![stopped(Some(0))]);
    let logs = FakeLogs::new(vec![LogPage {
        events: vec![
            LogEvent {
                timestamp: 1_519_556_892,
                message: "sample message log........".to_string(),
            },
            LogEvent {
                timestamp: 1_519_556_893,
                message: "sample message log2........".to_string(),
            },
        ],
        next_forward_token: Some("t1".to_string()),
    }]);
    let mut sink = Vec::new();

    let code = runner::execute(&tasks, &logs, &config(), &[], &mut sink)
        .await
        .expect("run should finish");

    assert_eq!(code, 0);
    assert_eq!(
        String::from_utf8(sink).expect("utf8"),
        "sample message log........\nsample message log2........\n"
    );
    let route = logs.seen_route().expect("a log fetch must happen");
    assert_eq!(route.group, "/ecs/batch");
    assert_eq!(route.stream, "ecs/app/abc-123");
}

#[tokio::test]
async fn remote_exit_code_propagates() {
    let tasks = FakeOrchestrator::new(started_task(), vec![stopped(Some(5))]);
    let logs = FakeLogs::new(Vec::new());
    let mut sink = Vec::new();

    let code = runner::execute(&tasks, &logs, &config(), &[], &mut sink)
        .await
        .expect("run should finish");
    assert_eq!(code, 5);
}

#[tokio::test]
async fn command_override_targets_the_last_container() {
    let tasks = FakeOrchestrator::new(started_task(), vec![stopped(Some(0))]);
    let logs = FakeLogs::new(Vec::new());
    let mut sink = Vec::new();
    let command = vec!["echo".to_string(), "hello".to_string()];

    runner::execute(&tasks, &logs, &config(), &command, &mut sink)
        .await
        .expect("run should finish");

    let request = tasks.seen_request().expect("run_task must be called");
    let overrides = request.overrides.expect("command sets overrides");
    assert_eq!(overrides.container_name, "sidecar");
    assert_eq!(overrides.command, command);
}

#[tokio::test]
async fn reported_launch_failure_maps_to_exit_one() {
    let mut result = started_task();
    result.failures.push(ecsrun::task::api::LaunchFailure {
        arn: Some("arn".to_string()),
        reason: Some("RESOURCE:MEMORY".to_string()),
    });
    let tasks = FakeOrchestrator::new(result, Vec::new());
    let logs = FakeLogs::new(Vec::new());
    let mut sink = Vec::new();

    let exit = runner::execute(&tasks, &logs, &config(), &[], &mut sink)
        .await
        .expect_err("reported failures must fail the run");

    assert_eq!(exit.code(), 1);
    assert!(
        exit.message().contains("RESOURCE:MEMORY"),
        "message should carry the failure reason: {}",
        exit.message()
    );
}

#[tokio::test]
async fn task_not_found_maps_to_exit_two() {
    let tasks = FakeOrchestrator::new(started_task(), vec![Err(PollError::TaskNotFound)]);
    let logs = FakeLogs::new(vec![LogPage {
        events: vec![LogEvent {
            timestamp: 1_519_556_892,
            message: "never emitted".to_string(),
        }],
        next_forward_token: Some("t1".to_string()),
    }]);
    let mut sink = Vec::new();

    let exit = runner::execute(&tasks, &logs, &config(), &[], &mut sink)
        .await
        .expect_err("not-found must fail the run");

    assert_eq!(exit.code(), 2);
    assert!(sink.is_empty(), "no log lines may be emitted");
}
