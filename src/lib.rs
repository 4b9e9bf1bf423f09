//! Production service starter: a bounded CLI runner and a gRPC service
//! supervisor sharing one cancellation signal.

pub mod cli;
pub mod config;
pub mod error;
pub mod grpc;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod runner;

pub use config::{RunnerConfig, ServiceConfig};
pub use error::ExitStatus;
pub use lifecycle::Shutdown;
