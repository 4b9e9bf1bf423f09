//! Health reporting.
//!
//! # States
//! - Serving: load balancers may route traffic here
//! - NotServing: bootstrapping or draining, route elsewhere
//!
//! # State Transitions
//! ```text
//! NotServing (bootstrap) → Serving (listening, workers up) → NotServing (drain)
//! ```
//!
//! The overall server status is published under the empty service name,
//! which is what `grpc_health_probe` and Kubernetes gRPC probes query.

use async_trait::async_trait;

/// Status published through the health protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServingStatus {
    Serving,
    NotServing,
}

impl From<ServingStatus> for tonic_health::ServingStatus {
    fn from(status: ServingStatus) -> Self {
        match status {
            ServingStatus::Serving => tonic_health::ServingStatus::Serving,
            ServingStatus::NotServing => tonic_health::ServingStatus::NotServing,
        }
    }
}

/// Sink for the server's overall health status.
#[async_trait]
pub trait HealthReporter: Send {
    async fn set_status(&mut self, status: ServingStatus);
}

/// [`HealthReporter`] backed by the standard `grpc.health.v1` service.
#[derive(Clone)]
pub struct GrpcHealth {
    reporter: tonic_health::server::HealthReporter,
}

impl GrpcHealth {
    pub fn new(reporter: tonic_health::server::HealthReporter) -> Self {
        Self { reporter }
    }
}

impl std::fmt::Debug for GrpcHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrpcHealth").finish_non_exhaustive()
    }
}

#[async_trait]
impl HealthReporter for GrpcHealth {
    async fn set_status(&mut self, status: ServingStatus) {
        self.reporter.set_service_status("", status.into()).await;
        tracing::info!(status = ?status, "Health status updated");
    }
}
