//! Startup orchestration (BOOTSTRAPPING).
//!
//! # Responsibilities
//! - Validate configuration
//! - Load TLS material
//! - Start the metrics exporter (optional, non-fatal)
//! - Bind the listener and start the gRPC server
//!
//! # Design Decisions
//! - Fail fast: configuration and TLS errors surface before anything binds
//! - Listeners start last; health stays NOT_SERVING until the supervisor
//!   takes over

use std::net::SocketAddr;

use crate::config::{validate_config, ConfigError, ServiceConfig};
use crate::error::StartupError;
use crate::grpc::{self, GrpcHealth, GrpcServerHandle};
use crate::net::{load_tls_config, Listener};
use crate::observability::metrics;

/// Everything the supervisor needs once bootstrap succeeded.
#[derive(Debug)]
pub struct Bootstrapped {
    pub server: GrpcServerHandle,
    pub health: GrpcHealth,
    pub local_addr: SocketAddr,
}

pub async fn bootstrap(config: &ServiceConfig) -> Result<Bootstrapped, StartupError> {
    validate_config(config).map_err(ConfigError::Validation)?;

    let tls = load_tls_config(&config.tls).await?;

    if config.observability.prometheus_enabled {
        start_exporter(&config.observability.metrics_address);
    }

    let listener = Listener::bind(&config.bind_address).await?;
    let local_addr = listener.local_addr();

    let (server, health) = grpc::launch(listener, tls, config.enable_reflection).await?;

    Ok(Bootstrapped {
        server,
        health,
        local_addr,
    })
}

fn start_exporter(address: &str) {
    match address.parse() {
        Ok(addr) => {
            if let Err(e) = metrics::init_exporter(addr) {
                tracing::error!(address = %address, error = %e, "Failed to start Prometheus exporter");
            }
        }
        Err(e) => {
            tracing::error!(address = %address, error = %e, "Failed to parse metrics address");
        }
    }
}
