//! Error taxonomy and process exit statuses.
//!
//! Every failure is resolved at the binary boundary: the binary logs the
//! error and maps it to an [`ExitStatus`]. Nothing here crosses from the
//! command runner into the service supervisor or back.

use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

use crate::config::ConfigError;
use crate::net::listener::ListenerError;
use crate::net::tls::TlsError;

/// Deterministic process exit statuses shared by both binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Work completed or the service shut down cleanly.
    Success,
    /// The server could not start (bind or transport failure).
    StartupFailed,
    /// Malformed or unknown command-line input.
    InvalidArguments,
    /// Service configuration rejected during bootstrap.
    ConfigError,
    /// Failure during the work phase.
    RuntimeError,
    /// Cooperative shutdown observed mid-work.
    Interrupted,
}

impl ExitStatus {
    /// Numeric exit code reported to the operating system.
    pub const fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::StartupFailed => 1,
            ExitStatus::InvalidArguments => 2,
            ExitStatus::ConfigError => 2,
            ExitStatus::RuntimeError => 4,
            ExitStatus::Interrupted => 130,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Non-fatal configuration problem: the file could not be read and
/// execution continues with environment values and defaults.
#[derive(Debug, Error)]
#[error("could not open config file '{}': {source}", path.display())]
pub struct ConfigWarning {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors raised by the command runner.
#[derive(Debug, Error)]
pub enum RunError {
    /// Command line could not be parsed.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Input source could not be opened.
    #[error("failed to open input '{}': {source}", path.display())]
    InputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input source failed while reading records.
    #[error("failed to read input '{}': {source}", path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            RunError::InvalidArguments(_) => ExitStatus::InvalidArguments,
            RunError::InputOpen { .. } | RunError::InputRead { .. } => ExitStatus::RuntimeError,
        }
    }
}

/// Fatal errors raised while bootstrapping the service, before it serves.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    /// The transport library rejected the server setup.
    #[error("gRPC transport error: {0}")]
    Transport(String),
}

impl StartupError {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            StartupError::Config(_) | StartupError::Tls(_) => ExitStatus::ConfigError,
            StartupError::Listener(_) | StartupError::Transport(_) => ExitStatus::StartupFailed,
        }
    }
}
