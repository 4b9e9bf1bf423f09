//! Background worker pool.
//!
//! Workers carry no payload yet: each one idles on a fixed tick until the
//! shutdown signal fires. Queue consumers or periodic jobs go in
//! [`worker_loop`].

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tokio::time;

use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Number of workers to run when none is configured.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Fixed-size pool of independent worker tasks.
#[derive(Debug)]
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `count` workers indexed `0..count`.
    pub fn spawn(count: usize, interval: Duration, shutdown: Arc<Shutdown>) -> Self {
        let handles = (0..count)
            .map(|index| tokio::spawn(worker_loop(index, interval, shutdown.clone())))
            .collect();

        tracing::info!(workers = count, interval_ms = interval.as_millis() as u64, "Worker pool started");
        metrics::set_active_workers(count);
        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker to exit. Returns how many exited cleanly.
    pub async fn join(self) -> usize {
        let results = join_all(self.handles).await;
        let mut clean = 0;
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(()) => clean += 1,
                Err(e) => tracing::error!(worker = index, error = %e, "Worker terminated abnormally"),
            }
        }
        metrics::set_active_workers(0);
        clean
    }
}

async fn worker_loop(index: usize, interval: Duration, shutdown: Arc<Shutdown>) {
    tracing::debug!(worker = index, "Worker started");

    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                tracing::trace!(worker = index, "Worker tick");
            }
        }
    }

    tracing::debug!(worker = index, "Worker exiting");
}
