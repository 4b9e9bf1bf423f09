//! gRPC transport subsystem.
//!
//! # Data Flow
//! ```text
//! Listener (net)
//!     → server.rs (tonic Server: health, reflection, app services)
//!     → GrpcServerHandle (drain / join / abort)
//!
//! health.rs:
//!     Supervisor → HealthReporter::set_status → grpc.health.v1
//! ```
//!
//! # Design Decisions
//! - The supervisor only sees the `ServerHandle` and `HealthReporter`
//!   traits, never tonic types
//! - Drain is tonic's graceful shutdown: stop accepting, finish in-flight

pub mod health;
pub mod server;

pub use health::{GrpcHealth, HealthReporter, ServingStatus};
pub use server::{launch, GrpcServerHandle, ServeError, ServerHandle};
