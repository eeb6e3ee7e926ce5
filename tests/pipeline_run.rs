//! Pipeline runner scenarios: confirmation gate, ordering, fail-fast.

mod helpers;

use helpers::MockShell;
use stackctl::cli::confirm::read_confirmation;
use stackctl::core::{Pipeline, StackConfig, StepKind, StepState};
use stackctl::execution::{Approval, ExecutionEngine, ExecutionEvent, StepExecutor};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const RESET_DB: &str = "docker-compose exec postgres psql --user postgres \
     -c \"drop database database;\" -c \"create database database;\"";

/// A project tree with one fixture so load_fixtures has work to do.
fn project_with_fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let fixtures = dir.path().join("apps/users/fixtures");
    fs::create_dir_all(&fixtures).unwrap();
    fs::write(fixtures.join("users.json"), "[]").unwrap();
    dir
}

fn config_for(root: &Path) -> StackConfig {
    let mut config = StackConfig::default();
    config.project_root = root.to_path_buf();
    config.poll_interval = std::time::Duration::ZERO;
    config
}

fn engine_for(shell: MockShell, config: StackConfig) -> ExecutionEngine<MockShell> {
    ExecutionEngine::new(StepExecutor::new(shell, config, Approval::Always))
}

/// Mirror of the run command's gate: confirm first, execute only on yes.
async fn run_gated(
    answer: &str,
    engine: &ExecutionEngine<MockShell>,
    pipeline: &mut Pipeline,
) -> bool {
    let confirmed = read_confirmation(&mut answer.as_bytes()).unwrap();
    if confirmed {
        engine.execute(pipeline).await.unwrap();
    }
    confirmed
}

#[tokio::test]
async fn default_pipeline_runs_steps_in_declared_order() {
    let project = project_with_fixture();
    let shell = MockShell::new();
    shell.script_stdout(RESET_DB, "DROP DATABASE\nCREATE DATABASE");

    let engine = engine_for(shell.clone(), config_for(project.path()));
    let mut pipeline = Pipeline::default_stack();

    engine.execute(&mut pipeline).await.unwrap();

    assert_eq!(
        shell.commands(),
        vec![
            "docker kill $(docker ps -q)".to_string(),
            "docker-compose start postgres".to_string(),
            RESET_DB.to_string(),
            "docker-compose run --rm django python manage.py migrate".to_string(),
            "docker-compose run --rm django python manage.py loaddata users.json".to_string(),
            "make application-dev".to_string(),
        ]
    );
    assert!(pipeline.is_complete());
    assert!(!pipeline.has_failed());
    assert_eq!(pipeline.state.completed_steps, 5);
}

#[tokio::test]
async fn affirmative_answers_run_the_whole_pipeline() {
    for answer in ["y\n", "Y\n", "yes\n", "YES\n"] {
        let project = project_with_fixture();
        let shell = MockShell::new();
        shell.script_stdout(RESET_DB, "CREATE DATABASE");

        let engine = engine_for(shell.clone(), config_for(project.path()));
        let mut pipeline = Pipeline::default_stack();

        assert!(run_gated(answer, &engine, &mut pipeline).await, "{answer:?}");
        assert_eq!(shell.commands().len(), 6, "{answer:?}");
        assert!(pipeline.is_complete());
    }
}

#[tokio::test]
async fn non_affirmative_answers_execute_zero_actions() {
    for answer in ["n\n", "\n", "", "no\n", "maybe\n"] {
        let shell = MockShell::new();
        let engine = engine_for(shell.clone(), StackConfig::default());
        let mut pipeline = Pipeline::default_stack();

        assert!(!run_gated(answer, &engine, &mut pipeline).await, "{answer:?}");
        assert!(shell.commands().is_empty(), "{answer:?}");
        assert!(matches!(
            pipeline.step_at(0).unwrap().state,
            StepState::Pending
        ));
    }
}

#[tokio::test]
async fn unknown_step_name_aborts_before_any_action() {
    let names = vec!["kill_containers".to_string(), "defragment_disk".to_string()];
    let err = Pipeline::from_names("broken", &names).unwrap_err();
    assert_eq!(err.0, "defragment_disk");
    // Construction failed, so there is no pipeline to run at all.
}

#[tokio::test]
async fn failing_step_aborts_remaining_steps() {
    let project = project_with_fixture();
    let shell = MockShell::new();
    // The first step cannot even spawn.
    shell.fail_on("docker kill $(docker ps -q)");

    let engine = engine_for(shell.clone(), config_for(project.path()));
    let mut pipeline = Pipeline::default_stack();

    let err = engine.execute(&mut pipeline).await.unwrap_err();
    assert_eq!(err.step, StepKind::KillContainers);

    // Nothing past the failed step ran.
    assert_eq!(shell.commands().len(), 1);
    assert!(pipeline.has_failed());
    assert!(matches!(
        pipeline.step_at(0).unwrap().state,
        StepState::Failed { .. }
    ));
    assert!(matches!(
        pipeline.step_at(1).unwrap().state,
        StepState::Pending
    ));
}

#[tokio::test]
async fn missing_fixtures_skip_without_failing_the_run() {
    let project = TempDir::new().unwrap(); // no fixtures anywhere
    let shell = MockShell::new();
    shell.script_stdout(RESET_DB, "CREATE DATABASE");

    let engine = engine_for(shell.clone(), config_for(project.path()));
    let mut pipeline = Pipeline::default_stack();

    engine.execute(&mut pipeline).await.unwrap();

    assert!(pipeline.is_complete());
    assert_eq!(pipeline.state.skipped_steps, 1);
    assert_eq!(pipeline.state.completed_steps, 4);
    assert!(matches!(
        pipeline.step_at(3).unwrap().state,
        StepState::Skipped { .. }
    ));
    // No loaddata command was issued.
    assert!(!shell.commands().iter().any(|c| c.contains("loaddata")));
}

#[tokio::test]
async fn events_are_emitted_in_lifecycle_order() {
    let project = project_with_fixture();
    let shell = MockShell::new();
    shell.script_stdout(RESET_DB, "CREATE DATABASE");

    let mut engine = engine_for(shell, config_for(project.path()));
    let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    engine.add_event_handler(move |event| {
        let tag = match event {
            ExecutionEvent::PipelineStarted { .. } => "pipeline_started".to_string(),
            ExecutionEvent::StepStarted { step } => format!("started:{step}"),
            ExecutionEvent::StepCompleted { step } => format!("completed:{step}"),
            ExecutionEvent::StepSkipped { step, .. } => format!("skipped:{step}"),
            ExecutionEvent::StepFailed { step, .. } => format!("failed:{step}"),
            ExecutionEvent::PipelineCompleted { .. } => "pipeline_completed".to_string(),
        };
        sink.lock().unwrap().push(tag);
    });

    let mut pipeline = Pipeline::default_stack();
    engine.execute(&mut pipeline).await.unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.first().unwrap(), "pipeline_started");
    assert_eq!(events.last().unwrap(), "pipeline_completed");
    assert_eq!(events[1], "started:kill_containers");
    assert_eq!(events[2], "completed:kill_containers");
    // 2 events per step plus the pipeline bookends
    assert_eq!(events.len(), 2 + 2 * 5);
}

#[tokio::test]
async fn dump_restore_skips_when_no_dumps_exist() {
    let project = TempDir::new().unwrap();
    let shell = MockShell::new();
    let executor = StepExecutor::new(shell.clone(), config_for(project.path()), Approval::Always);

    let outcome = executor.execute(StepKind::LoadLastDump).await.unwrap();
    assert_eq!(
        outcome,
        stackctl::execution::StepOutcome::Skipped {
            reason: "no dumps to load".to_string()
        }
    );
    // The db container is still started before the dump lookup.
    assert_eq!(shell.commands(), vec!["docker-compose start postgres"]);
}

#[tokio::test]
async fn dump_restore_pipes_newest_dump_through_backend() {
    let project = TempDir::new().unwrap();
    let dumps = project.path().join("dumps");
    fs::create_dir_all(&dumps).unwrap();
    fs::write(dumps.join("old.sql"), "old").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(20));
    fs::write(dumps.join("new.sql"), "new").unwrap();

    let shell = MockShell::new();
    let executor = StepExecutor::new(shell.clone(), config_for(project.path()), Approval::Always);

    let outcome = executor.execute(StepKind::LoadLastDump).await.unwrap();
    assert_eq!(outcome, stackctl::execution::StepOutcome::Completed);

    let commands = shell.commands();
    assert_eq!(commands.len(), 2);
    assert!(commands[1].starts_with("docker-compose run --rm django psql -U postgres -d database < "));
    assert!(commands[1].ends_with("new.sql"));
}
