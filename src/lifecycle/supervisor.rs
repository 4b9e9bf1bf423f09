//! Long-running service supervision.
//!
//! # States
//! ```text
//! Bootstrapping → Serving → Draining → Stopped
//! ```
//!
//! # Ordering
//! - Serving: health SERVING, workers spawned, signal listener installed
//! - Draining: health NOT_SERVING strictly before the server drain starts
//! - Stopped: server joined, then every worker joined

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::config::ServiceConfig;
use crate::grpc::{HealthReporter, ServerHandle, ServingStatus};
use crate::lifecycle::signals::spawn_signal_listener;
use crate::lifecycle::workers::{default_worker_count, WorkerPool};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Bootstrapping,
    Serving,
    Draining,
    Stopped,
}

/// Runtime knobs of the supervisor.
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    pub workers: usize,
    pub poll_interval: Duration,
    /// `None` waits for in-flight requests indefinitely.
    pub drain_timeout: Option<Duration>,
    /// Install SIGINT/SIGTERM handlers on entering `Serving`.
    pub os_signals: bool,
}

impl SupervisorSettings {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            workers: config.workers.threads.unwrap_or_else(default_worker_count),
            poll_interval: Duration::from_millis(config.workers.poll_interval_ms),
            drain_timeout: config.shutdown.drain_timeout_secs.map(Duration::from_secs),
            os_signals: true,
        }
    }
}

/// Summary of a completed shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Workers that exited cleanly.
    pub workers_joined: usize,
    /// False when the drain timeout expired and the server was aborted.
    pub drained: bool,
}

/// Owns the shutdown signal, the server handle and the worker pool.
pub struct Supervisor<H, S> {
    health: H,
    server: S,
    shutdown: Arc<Shutdown>,
    settings: SupervisorSettings,
    state: watch::Sender<SupervisorState>,
}

impl<H, S> Supervisor<H, S>
where
    H: HealthReporter,
    S: ServerHandle,
{
    pub fn new(health: H, server: S, shutdown: Arc<Shutdown>, settings: SupervisorSettings) -> Self {
        let (state, _) = watch::channel(SupervisorState::Bootstrapping);
        Self {
            health,
            server,
            shutdown,
            settings,
            state,
        }
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<SupervisorState> {
        self.state.subscribe()
    }

    pub fn shutdown(&self) -> Arc<Shutdown> {
        self.shutdown.clone()
    }

    fn transition(&self, next: SupervisorState) {
        let previous = self.state.send_replace(next);
        tracing::debug!(from = ?previous, to = ?next, "Supervisor state change");
    }

    /// Serve until shutdown is requested, then drain and stop.
    pub async fn run(mut self) -> ShutdownReport {
        self.transition(SupervisorState::Serving);
        self.health.set_status(ServingStatus::Serving).await;
        metrics::set_serving(true);

        let workers = WorkerPool::spawn(
            self.settings.workers,
            self.settings.poll_interval,
            self.shutdown.clone(),
        );
        if self.settings.os_signals {
            // Detached: keeps absorbing repeated signals until exit.
            spawn_signal_listener(self.shutdown.clone());
        }

        self.shutdown.cancelled().await;
        tracing::info!("Shutdown requested, initiating graceful stop");

        self.transition(SupervisorState::Draining);
        self.health.set_status(ServingStatus::NotServing).await;
        metrics::set_serving(false);
        self.server.drain();
        let drained = self.join_server().await;

        let workers_joined = workers.join().await;
        self.shutdown.mark_stopped();
        self.transition(SupervisorState::Stopped);
        tracing::info!(workers = workers_joined, drained, "Server shutdown complete");

        ShutdownReport {
            workers_joined,
            drained,
        }
    }

    async fn join_server(&mut self) -> bool {
        let result = match self.settings.drain_timeout {
            None => self.server.join().await,
            Some(limit) => match tokio::time::timeout(limit, self.server.join()).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::error!(
                        timeout_secs = limit.as_secs_f64(),
                        "Drain timed out, aborting in-flight requests"
                    );
                    self.server.abort();
                    return false;
                }
            },
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "gRPC server terminated with error");
        }
        true
    }
}
