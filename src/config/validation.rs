//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - TLS material must be complete when TLS is requested
//! - Validate value ranges (port, worker count, intervals)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: &ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before any listener is bound

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with the service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("bind address '{0}' must be host:port")]
    InvalidBindAddress(String),

    #[error("TLS enabled but {0} file not provided")]
    MissingTlsMaterial(&'static str),

    #[error("worker thread count must be at least 1")]
    ZeroWorkers,

    #[error("worker poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("metrics address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_host_port(&config.bind_address) {
        errors.push(ValidationError::InvalidBindAddress(config.bind_address.clone()));
    }

    if config.tls.enabled {
        if config.tls.cert_path.is_none() {
            errors.push(ValidationError::MissingTlsMaterial("certificate"));
        }
        if config.tls.key_path.is_none() {
            errors.push(ValidationError::MissingTlsMaterial("private key"));
        }
    }

    if config.workers.threads == Some(0) {
        errors.push(ValidationError::ZeroWorkers);
    }
    if config.workers.poll_interval_ms == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }

    if config.observability.prometheus_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `host:port` with a non-empty host and a numeric port. Hostnames are
/// resolved at bind time.
fn is_host_port(address: &str) -> bool {
    match address.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}
