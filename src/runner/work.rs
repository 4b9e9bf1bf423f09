//! Bounded work patterns executed by the runner.
//!
//! Both loops check the shutdown signal between units and never start a
//! new unit once it has fired. The per-record body is the extension point
//! for real processing.

use std::path::Path;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::{ExitStatus, RunError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Result of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every unit was processed.
    Completed { units: usize },
    /// Shutdown was observed; `units` were finished before it.
    Interrupted { units: usize },
}

impl RunOutcome {
    pub fn units(&self) -> usize {
        match *self {
            RunOutcome::Completed { units } | RunOutcome::Interrupted { units } => units,
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        match self {
            RunOutcome::Completed { .. } => ExitStatus::Success,
            RunOutcome::Interrupted { .. } => ExitStatus::Interrupted,
        }
    }
}

/// Shape of the simulated loop used when no input is configured.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedWork {
    pub steps: usize,
    pub step_interval: Duration,
}

impl Default for SimulatedWork {
    fn default() -> Self {
        Self {
            steps: 5,
            step_interval: Duration::from_secs(1),
        }
    }
}

/// Process `path` line by line, one record per line.
pub async fn process_input(path: &Path, shutdown: &Shutdown) -> Result<RunOutcome, RunError> {
    let file = File::open(path).await.map_err(|source| RunError::InputOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut record = Vec::new();
    let mut processed = 0;

    loop {
        if shutdown.is_triggered() {
            return Ok(RunOutcome::Interrupted { units: processed });
        }

        record.clear();
        let read = reader
            .read_until(b'\n', &mut record)
            .await
            .map_err(|source| RunError::InputRead {
                path: path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            break;
        }
        trim_line_ending(&mut record);

        processed += 1;
        tracing::debug!(record = processed, line = %String::from_utf8_lossy(&record), "processing");
        metrics::record_processed();
    }

    Ok(RunOutcome::Completed { units: processed })
}

/// Records are raw bytes; only the trailing `\n` or `\r\n` is dropped.
fn trim_line_ending(record: &mut Vec<u8>) {
    if record.last() == Some(&b'\n') {
        record.pop();
        if record.last() == Some(&b'\r') {
            record.pop();
        }
    }
}

/// Run the fixed number of simulated steps, sleeping between them.
pub async fn simulate(work: SimulatedWork, shutdown: &Shutdown) -> RunOutcome {
    let mut completed = 0;

    for step in 1..=work.steps {
        if shutdown.is_triggered() {
            return RunOutcome::Interrupted { units: completed };
        }

        tracing::info!(step, total = work.steps, "working...");
        tokio::select! {
            _ = shutdown.cancelled() => return RunOutcome::Interrupted { units: completed },
            _ = tokio::time::sleep(work.step_interval) => {}
        }

        completed += 1;
        metrics::record_step();
    }

    RunOutcome::Completed { units: completed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    fn quick(steps: usize) -> SimulatedWork {
        SimulatedWork {
            steps,
            step_interval: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn processes_every_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "alpha\nbeta\ngamma\n").unwrap();

        let outcome = process_input(file.path(), &Shutdown::new()).await.unwrap();
        assert_eq!(outcome, RunOutcome::Completed { units: 3 });
    }

    #[tokio::test]
    async fn last_line_without_newline_counts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "one\ntwo").unwrap();

        let outcome = process_input(file.path(), &Shutdown::new()).await.unwrap();
        assert_eq!(outcome.units(), 2);
    }

    #[tokio::test]
    async fn non_utf8_records_are_processed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"caf\xe9\nplain\r\nthird\n").unwrap();

        let outcome = process_input(file.path(), &Shutdown::new()).await.unwrap();
        assert_eq!(outcome, RunOutcome::Completed { units: 3 });
    }

    #[test]
    fn line_endings_are_trimmed() {
        let mut crlf = b"abc\r\n".to_vec();
        trim_line_ending(&mut crlf);
        assert_eq!(crlf, b"abc");

        let mut bare = b"abc".to_vec();
        trim_line_ending(&mut bare);
        assert_eq!(bare, b"abc");
    }

    #[tokio::test]
    async fn input_stops_when_triggered() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a\nb\nc\n").unwrap();
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let outcome = process_input(file.path(), &shutdown).await.unwrap();
        assert_eq!(outcome, RunOutcome::Interrupted { units: 0 });
    }

    #[tokio::test]
    async fn missing_input_is_runtime_error() {
        let err = process_input(Path::new("/no/such/input.txt"), &Shutdown::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::InputOpen { .. }));
        assert_eq!(err.exit_status(), ExitStatus::RuntimeError);
    }

    #[tokio::test]
    async fn simulation_runs_all_steps() {
        let outcome = simulate(quick(3), &Shutdown::new()).await;
        assert_eq!(outcome, RunOutcome::Completed { units: 3 });
        assert_eq!(outcome.exit_status(), ExitStatus::Success);
    }

    #[tokio::test]
    async fn pre_triggered_simulation_does_no_steps() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let outcome = simulate(quick(5), &shutdown).await;
        assert_eq!(outcome, RunOutcome::Interrupted { units: 0 });
        assert_eq!(outcome.exit_status(), ExitStatus::Interrupted);
    }

    #[tokio::test]
    async fn trigger_mid_step_cuts_the_sleep_short() {
        let shutdown = Arc::new(Shutdown::new());
        let work = SimulatedWork {
            steps: 5,
            step_interval: Duration::from_secs(30),
        };

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.trigger();
        });

        let outcome = tokio::time::timeout(Duration::from_secs(2), simulate(work, &shutdown))
            .await
            .expect("simulation should stop promptly");
        assert_eq!(outcome, RunOutcome::Interrupted { units: 0 });
    }
}
