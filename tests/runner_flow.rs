//! Command runner driven the way the binary drives it.

mod common;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::level_filters::LevelFilter;

use prodstarter::cli::RunnerCommand;
use prodstarter::error::ExitStatus;
use prodstarter::lifecycle::{Shutdown, ShutdownState};
use prodstarter::runner::{CommandRunner, RunOutcome, RunPhase, SimulatedWork};

fn run_args(cli: prodstarter::cli::RunnerCli) -> prodstarter::cli::RunArgs {
    match cli.command {
        Some(RunnerCommand::Run(args)) => args,
        other => panic!("expected run, got {:?}", other),
    }
}

#[tokio::test]
async fn three_line_input_completes() {
    let (logs, _guard) = common::capture_logs(LevelFilter::DEBUG);
    let input = common::temp_file("first\nsecond\nthird\n");
    let shutdown = Arc::new(Shutdown::new());
    let mut runner = CommandRunner::new(shutdown.clone());

    let path = input.path().to_str().unwrap();
    let cli = runner.parse(["prodstarter-cli", "run", "--input", path, "-v"]).unwrap();
    let verbosity = cli.verbose;
    let args = run_args(cli);

    let (config, warning) = runner.load_config(Vec::<(String, String)>::new(), &args, verbosity);
    assert!(warning.is_none());
    assert!(config.verbose);

    let outcome = runner.execute(&config).await.unwrap();
    assert_eq!(outcome, RunOutcome::Completed { units: 3 });
    assert_eq!(outcome.exit_status().code(), 0);
    assert_eq!(runner.phase(), RunPhase::Completed);
    assert_eq!(shutdown.state(), ShutdownState::Stopped);

    assert_eq!(logs.count("DEBUG", "processing"), 3, "{}", logs.contents());
    for line in ["first", "second", "third"] {
        assert!(logs.contents().contains(&format!("line={}", line)), "{}", logs.contents());
    }
}

#[tokio::test]
async fn pre_triggered_simulation_is_interrupted() {
    let shutdown = Arc::new(Shutdown::new());
    shutdown.trigger();
    let mut runner = CommandRunner::new(shutdown.clone());

    let cli = runner.parse(["prodstarter-cli", "run"]).unwrap();
    let args = run_args(cli);
    let (config, _) = runner.load_config(Vec::<(String, String)>::new(), &args, 0);

    let outcome = runner.execute(&config).await.unwrap();
    assert_eq!(outcome, RunOutcome::Interrupted { units: 0 });
    assert_eq!(outcome.exit_status(), ExitStatus::Interrupted);
    assert_eq!(outcome.exit_status().code(), 130);
    assert_eq!(runner.phase(), RunPhase::Interrupted);
}

#[tokio::test]
async fn shutdown_mid_run_interrupts_simulation() {
    let shutdown = Arc::new(Shutdown::new());
    let mut runner = CommandRunner::new(shutdown.clone()).with_simulated_work(SimulatedWork {
        steps: 5,
        step_interval: Duration::from_millis(40),
    });

    let cli = runner.parse(["prodstarter-cli", "run"]).unwrap();
    let args = run_args(cli);
    let (config, _) = runner.load_config(Vec::<(String, String)>::new(), &args, 0);

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.trigger();
    });

    let outcome = runner.execute(&config).await.unwrap();
    assert!(matches!(outcome, RunOutcome::Interrupted { units } if units < 5));
}

#[tokio::test]
async fn missing_input_fails_with_runtime_error() {
    let mut runner = CommandRunner::new(Arc::new(Shutdown::new()));
    let cli = runner
        .parse(["prodstarter-cli", "run", "--input", "/no/such/file.txt"])
        .unwrap();
    let args = run_args(cli);
    let (config, _) = runner.load_config(Vec::<(String, String)>::new(), &args, 0);

    let err = runner.execute(&config).await.unwrap_err();
    assert_eq!(err.exit_status().code(), 4);
    assert_eq!(runner.phase(), RunPhase::Failed);
}

#[test]
fn flag_overrides_file_overrides_environment() {
    let file = common::temp_file("# comment\n  INPUT_PATH=/tmp/x\nMETRICS_ENABLED=TRUE\n");
    let mut runner = CommandRunner::new(Arc::new(Shutdown::new()));

    let file_path = file.path().to_str().unwrap();
    let cli = runner
        .parse(["prodstarter-cli", "run", "--config", file_path, "--input", "/tmp/z"])
        .unwrap();
    let args = run_args(cli);

    let env = [("INPUT_PATH", "/tmp/y"), ("VERBOSE", "1")];
    let (config, warning) = runner.load_config(env, &args, 0);

    assert!(warning.is_none());
    assert_eq!(config.input_path, Some(PathBuf::from("/tmp/z")));
    assert!(config.verbose);
    assert!(config.metrics_enabled);
}

#[test]
fn missing_config_file_only_warns() {
    let mut runner = CommandRunner::new(Arc::new(Shutdown::new()));
    let cli = runner
        .parse(["prodstarter-cli", "run", "--config", "/no/such/app.conf"])
        .unwrap();
    let args = run_args(cli);

    let (config, warning) = runner.load_config([("INPUT_PATH", "/tmp/y")], &args, 0);
    let warning = warning.expect("unreadable file should produce a warning");
    assert!(warning.to_string().contains("/no/such/app.conf"));
    assert_eq!(config.input_path, Some(PathBuf::from("/tmp/y")));
}

#[test]
fn bad_flag_is_invalid_arguments() {
    let mut runner = CommandRunner::new(Arc::new(Shutdown::new()));
    let err = runner.parse(["prodstarter-cli", "run", "--input"]).unwrap_err();
    assert!(err.use_stderr());
    assert_eq!(runner.phase(), RunPhase::Failed);
}
