//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, one line format)
//!     → metrics.rs (gauges, counters)
//!
//! Consumers:
//!     → stderr (both binaries)
//!     → Prometheus scrape endpoint (service, --prometheus)
//!     → rendered summary at exit (cli, --metrics)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, level_for, LineFormat};
