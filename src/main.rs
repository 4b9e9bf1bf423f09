//! prodstarter-service
//!
//! A gRPC service skeleton with health checking and graceful shutdown.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │                 SERVICE                        │
//!                    │                                                │
//!   gRPC clients     │  ┌──────────┐   ┌──────────────────────────┐  │
//!   ─────────────────┼─▶│   net    │──▶│ grpc: health, reflection │  │
//!                    │  │ listener │   │       app services       │  │
//!                    │  └──────────┘   └────────────▲─────────────┘  │
//!                    │                              │ drain / join   │
//!   SIGINT/SIGTERM   │  ┌──────────┐   ┌───────────┴──────────────┐  │
//!   ─────────────────┼─▶│ signals  │──▶│ supervisor ── workers[N] │  │
//!                    │  └──────────┘   └──────────────────────────┘  │
//!                    │                                                │
//!                    │   config · observability (logs, Prometheus)    │
//!                    └───────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use prodstarter::cli::service::{ServiceArgs, APP_NAME};
use prodstarter::config::load_service_config;
use prodstarter::error::{ExitStatus, StartupError};
use prodstarter::lifecycle::{bootstrap, Shutdown, Supervisor, SupervisorSettings};
use prodstarter::observability::{init_logging, level_for};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match ServiceArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitStatus::InvalidArguments.into()
            } else {
                ExitStatus::Success.into()
            };
        }
    };

    let (mut config, warning) = match load_service_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            let _guard = init_logging(APP_NAME, level_for(0, args.verbose));
            tracing::error!(error = %e, "Failed to load configuration");
            return StartupError::from(e).exit_status().into();
        }
    };
    args.apply(&mut config);

    let _guard = init_logging(APP_NAME, level_for(0, config.observability.verbose));
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "{} starting", APP_NAME);

    if let Some(warning) = warning {
        tracing::warn!(error = %warning, "Config file unavailable, using defaults");
    }

    tracing::info!(
        bind_address = %config.bind_address,
        tls = config.tls.enabled,
        reflection = config.enable_reflection,
        prometheus = config.observability.prometheus_enabled,
        "Configuration loaded"
    );

    let started = match bootstrap(&config).await {
        Ok(started) => started,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return e.exit_status().into();
        }
    };

    let shutdown = Arc::new(Shutdown::new());
    let settings = SupervisorSettings::from_config(&config);
    tracing::info!(
        address = %started.local_addr,
        workers = settings.workers,
        "Serving"
    );

    Supervisor::new(started.health, started.server, shutdown, settings)
        .run()
        .await;

    ExitStatus::Success.into()
}
