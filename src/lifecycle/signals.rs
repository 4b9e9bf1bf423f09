//! OS signal handling.
//!
//! # Responsibilities
//! - Register SIGTERM/SIGINT handlers (Ctrl+C elsewhere)
//! - Translate every delivery into [`Shutdown::trigger`]
//!
//! # Design Decisions
//! - Uses Tokio's signal handling: the OS handler only wakes this task,
//!   so logging here is safe
//! - Once registered the handlers stay installed for the process lifetime;
//!   repeated signals are logged and ignored, never a hard kill

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;

/// Spawn the listener task that turns termination signals into a
/// shutdown request. The task runs until the process exits or the handle
/// is aborted.
pub fn spawn_signal_listener(shutdown: Arc<Shutdown>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = listen(&shutdown).await {
            tracing::error!(error = %e, "Failed to install signal handlers");
        }
    })
}

/// Record one delivered signal against the shutdown signal.
fn on_signal(shutdown: &Shutdown, name: &'static str) {
    if shutdown.is_triggered() {
        tracing::debug!(signal = name, "Shutdown already requested, ignoring signal");
        return;
    }

    // Log before triggering so this line precedes anything the trigger wakes.
    tracing::warn!(signal = name, "Signal received, requesting graceful shutdown");
    if !shutdown.trigger() {
        tracing::debug!(signal = name, "Shutdown requested concurrently");
    }
}

#[cfg(unix)]
async fn listen(shutdown: &Shutdown) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tracing::debug!("Signal handlers installed (SIGINT, SIGTERM)");

    loop {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        on_signal(shutdown, name);
    }
}

#[cfg(not(unix))]
async fn listen(shutdown: &Shutdown) -> std::io::Result<()> {
    loop {
        tokio::signal::ctrl_c().await?;
        on_signal(shutdown, "CTRL_C");
    }
}
