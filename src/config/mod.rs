//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! Service:
//!     defaults
//!     → loader.rs (optional TOML file)
//!     → CLI flags (cli::service)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!
//! Runner:
//!     environment → optional KEY=VALUE file → CLI flags
//!     → RunnerConfig (last writer wins per key)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the work phase begins
//! - All fields have defaults to allow minimal configs
//! - An unreadable config file is a warning, never fatal
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_runner_config, load_service_config, ConfigError};
pub use schema::{RunnerConfig, ServiceConfig, TlsConfig};
pub use validation::{validate_config, ValidationError};
