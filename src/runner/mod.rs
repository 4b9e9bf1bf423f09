//! Foreground command runner.
//!
//! # States
//! ```text
//! Init → ParsingArgs → LoadingConfig → Executing → Completed
//!                ↓                             ↘ Interrupted
//!              Failed                           ↘ Failed
//! ```
//!
//! # Design Decisions
//! - Bad arguments fail before any config is read or work is done
//! - A missing config file only warns; the run continues
//! - Interruption is its own outcome, never a runtime error

pub mod work;

use std::ffi::{OsStr, OsString};
use std::sync::Arc;

use clap::Parser;

use crate::cli::{RunArgs, RunnerCli};
use crate::config::{load_runner_config, RunnerConfig};
use crate::error::{ConfigWarning, RunError};
use crate::lifecycle::Shutdown;

pub use work::{RunOutcome, SimulatedWork};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    ParsingArgs,
    LoadingConfig,
    Executing,
    Completed,
    Interrupted,
    Failed,
}

/// Drives one invocation of the CLI through its phases.
#[derive(Debug)]
pub struct CommandRunner {
    shutdown: Arc<Shutdown>,
    simulated: SimulatedWork,
    phase: RunPhase,
}

impl CommandRunner {
    pub fn new(shutdown: Arc<Shutdown>) -> Self {
        Self {
            shutdown,
            simulated: SimulatedWork::default(),
            phase: RunPhase::Init,
        }
    }

    /// Replace the simulated loop used when there is no input.
    pub fn with_simulated_work(mut self, simulated: SimulatedWork) -> Self {
        self.simulated = simulated;
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    fn transition(&mut self, next: RunPhase) {
        tracing::debug!(from = ?self.phase, to = ?next, "Runner phase change");
        self.phase = next;
    }

    /// Parse the command line.
    ///
    /// Help and version requests come back as errors that are not failures
    /// (`clap::Error::use_stderr` is false); everything else moves the
    /// runner to `Failed`.
    pub fn parse<I, T>(&mut self, argv: I) -> Result<RunnerCli, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.transition(RunPhase::ParsingArgs);
        let result = RunnerCli::try_parse_from(argv);
        if let Err(e) = &result {
            if e.use_stderr() {
                self.transition(RunPhase::Failed);
            }
        }
        result
    }

    /// Merge environment, optional file and `run` flags, in that order.
    pub fn load_config<I, K, V>(
        &mut self,
        env: I,
        args: &RunArgs,
        verbosity: u8,
    ) -> (RunnerConfig, Option<ConfigWarning>)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<OsStr>,
    {
        self.transition(RunPhase::LoadingConfig);
        let (mut config, warning) = load_runner_config(env, args.config.as_deref());
        args.apply(verbosity, &mut config);
        (config, warning)
    }

    /// Execute the bounded work selected by `config`.
    pub async fn execute(&mut self, config: &RunnerConfig) -> Result<RunOutcome, RunError> {
        self.transition(RunPhase::Executing);
        let input = config
            .input_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string());
        tracing::info!(input = %input, metrics = config.metrics_enabled, "run: starting main action");

        let result = match &config.input_path {
            Some(path) => work::process_input(path, &self.shutdown).await,
            None => Ok(work::simulate(self.simulated, &self.shutdown).await),
        };

        match &result {
            Ok(RunOutcome::Completed { units }) => {
                self.transition(RunPhase::Completed);
                tracing::info!(units, "run: completed successfully");
            }
            Ok(RunOutcome::Interrupted { units }) => {
                self.transition(RunPhase::Interrupted);
                tracing::warn!(units, "run: interrupted, shutting down early");
            }
            Err(_) => self.transition(RunPhase::Failed),
        }
        self.shutdown.mark_stopped();
        result
    }
}

/// Render the effective configuration for the `config` command.
pub fn render_config(config: &RunnerConfig, json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(config);
    }

    let mut out = String::from("Effective configuration:\n");
    for (key, value) in config.to_key_values() {
        out.push_str(&format!("  {}={}\n", key, value));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_failure_moves_to_failed() {
        let mut runner = CommandRunner::new(Arc::new(Shutdown::new()));
        assert_eq!(runner.phase(), RunPhase::Init);

        let err = runner.parse(["prodstarter-cli", "run", "--nope"]).unwrap_err();
        assert!(err.use_stderr());
        assert_eq!(runner.phase(), RunPhase::Failed);
    }

    #[test]
    fn help_is_not_a_failure() {
        let mut runner = CommandRunner::new(Arc::new(Shutdown::new()));
        let err = runner.parse(["prodstarter-cli", "--help"]).unwrap_err();
        assert!(!err.use_stderr());
        assert_eq!(runner.phase(), RunPhase::ParsingArgs);
    }

    #[test]
    fn flag_beats_file_beats_env() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("run.conf");
        std::fs::write(&file, "INPUT_PATH=/tmp/x\n").unwrap();

        let mut runner = CommandRunner::new(Arc::new(Shutdown::new()));
        let args = RunArgs {
            input: Some(PathBuf::from("/tmp/z")),
            metrics: false,
            config: Some(file),
        };
        let (config, warning) = runner.load_config([("INPUT_PATH", "/tmp/y")], &args, 0);

        assert!(warning.is_none());
        assert_eq!(config.input_path, Some(PathBuf::from("/tmp/z")));
        assert_eq!(runner.phase(), RunPhase::LoadingConfig);
    }

    #[test]
    fn renders_key_values() {
        let config = RunnerConfig {
            input_path: None,
            verbose: true,
            metrics_enabled: false,
        };
        let text = render_config(&config, false).unwrap();
        assert_eq!(
            text,
            "Effective configuration:\n  INPUT_PATH=(unset)\n  VERBOSE=1\n  METRICS_ENABLED=0\n"
        );
    }

    #[test]
    fn renders_json() {
        let config = RunnerConfig {
            input_path: Some(PathBuf::from("/data/in.txt")),
            verbose: false,
            metrics_enabled: true,
        };
        let value: serde_json::Value = serde_json::from_str(&render_config(&config, true).unwrap()).unwrap();
        assert_eq!(value["input_path"], "/data/in.txt");
        assert_eq!(value["metrics_enabled"], true);
    }
}
