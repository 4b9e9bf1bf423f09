//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Load TLS → Bind listener → Start server (NOT_SERVING)
//!
//! Supervision (supervisor.rs):
//!     SERVING → wait on Shutdown → DRAINING → STOPPED
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger (first one wins)
//!
//! Workers (workers.rs):
//!     N independent loops, exit when Shutdown fires
//! ```
//!
//! # Design Decisions
//! - One cancellation signal, owned here and shared by `Arc`
//! - Ordered shutdown: health off, drain server, join workers
//! - Drain waits indefinitely unless a drain timeout is configured

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod supervisor;
pub mod workers;

pub use shutdown::{Shutdown, ShutdownState};
pub use startup::{bootstrap, Bootstrapped};
pub use supervisor::{ShutdownReport, Supervisor, SupervisorSettings, SupervisorState};
pub use workers::WorkerPool;
