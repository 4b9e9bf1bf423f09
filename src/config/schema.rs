//! Configuration schema definitions.
//!
//! [`ServiceConfig`] derives Serde traits for deserialization from a TOML
//! file. [`RunnerConfig`] is the flat `KEY=VALUE` mapping used by the
//! command runner.

use std::ffi::OsStr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the gRPC service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bind address (e.g., "0.0.0.0:50051").
    pub bind_address: String,

    /// Transport security.
    pub tls: TlsConfig,

    /// Register the gRPC server reflection service.
    pub enable_reflection: bool,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Background worker pool.
    pub workers: WorkerConfig,

    /// Shutdown behavior.
    pub shutdown: ShutdownConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:50051".to_string(),
            tls: TlsConfig::default(),
            enable_reflection: true,
            observability: ObservabilityConfig::default(),
            workers: WorkerConfig::default(),
            shutdown: ShutdownConfig::default(),
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Serve over TLS instead of plaintext.
    pub enabled: bool,

    /// Path to certificate chain file (PEM).
    pub cert_path: Option<PathBuf>,

    /// Path to private key file (PEM).
    pub key_path: Option<PathBuf>,

    /// Optional CA bundle (PEM) used to verify client certificates.
    pub root_path: Option<PathBuf>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Raise the log level to debug.
    pub verbose: bool,

    /// Enable the Prometheus metrics endpoint.
    pub prometheus_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            prometheus_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of workers. `None` means one per available CPU.
    pub threads: Option<usize>,

    /// Worker tick interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: None,
            poll_interval_ms: 200,
        }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Upper bound on draining in-flight requests, in seconds.
    /// `None` waits for as long as the requests take.
    pub drain_timeout_secs: Option<u64>,
}

/// Effective configuration of the command runner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunnerConfig {
    /// `INPUT_PATH`: file to process line by line.
    pub input_path: Option<PathBuf>,

    /// `VERBOSE`: log each processed record.
    pub verbose: bool,

    /// `METRICS_ENABLED`: collect and print run metrics.
    pub metrics_enabled: bool,
}

impl RunnerConfig {
    /// Apply one recognized key. Unknown keys are ignored.
    ///
    /// Paths keep their raw OS bytes; a flag that is not valid UTF-8 is false.
    pub fn set<V: AsRef<OsStr>>(&mut self, key: &str, value: V) {
        let value = value.as_ref();
        match key {
            "INPUT_PATH" => self.input_path = Some(PathBuf::from(value)),
            "VERBOSE" => self.verbose = value.to_str().is_some_and(parse_flag),
            "METRICS_ENABLED" => self.metrics_enabled = value.to_str().is_some_and(parse_flag),
            _ => {}
        }
    }

    /// Render the effective configuration as `KEY=VALUE` lines.
    pub fn to_key_values(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "INPUT_PATH",
                self.input_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(unset)".to_string()),
            ),
            ("VERBOSE", u8::from(self.verbose).to_string()),
            ("METRICS_ENABLED", u8::from(self.metrics_enabled).to_string()),
        ]
    }
}

/// Boolean keys accept `1` or `true` (any case); everything else is false.
pub fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}
