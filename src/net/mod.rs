//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceConfig
//!     → tls.rs (load + validate PEM material, optional)
//!     → listener.rs (bind, report bind failures)
//!     → Hand off to the gRPC server as its accept stream
//! ```
//!
//! # Design Decisions
//! - TLS material is checked before anything is bound
//! - The listener is bound before the server is built, so a bind failure
//!   is reported as a startup error rather than a serve error
//! - TLS is optional and handled by the transport

pub mod listener;
pub mod tls;

pub use listener::{Listener, ListenerError};
pub use tls::{load_tls_config, TlsError};
