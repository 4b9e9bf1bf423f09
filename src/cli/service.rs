//! Command-line surface of `prodstarter-service`.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ServiceConfig;

pub const APP_NAME: &str = "prodstarter-service";

#[derive(Debug, Default, Parser)]
#[command(name = APP_NAME)]
#[command(version, about = "gRPC service with graceful shutdown", long_about = None)]
pub struct ServiceArgs {
    /// Address to listen on [default: 0.0.0.0:50051]
    #[arg(long, value_name = "HOST:PORT")]
    pub bind: Option<String>,

    /// Serve over TLS (requires --cert and --key)
    #[arg(long)]
    pub tls: bool,

    /// Certificate chain (PEM)
    #[arg(long, value_name = "PATH")]
    pub cert: Option<PathBuf>,

    /// Private key (PEM)
    #[arg(long, value_name = "PATH")]
    pub key: Option<PathBuf>,

    /// CA bundle for client certificate verification (PEM)
    #[arg(long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Disable the gRPC reflection service
    #[arg(long)]
    pub no_reflection: bool,

    /// Expose Prometheus metrics
    #[arg(long)]
    pub prometheus: bool,

    /// Prometheus endpoint address [default: 0.0.0.0:9090]
    #[arg(long, value_name = "ADDR")]
    pub metrics_address: Option<String>,

    /// Background worker count [default: available CPUs]
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Debug logging
    #[arg(long)]
    pub verbose: bool,

    /// TOML configuration file; flags override it
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Abort draining after this many seconds [default: wait indefinitely]
    #[arg(long, value_name = "SECS")]
    pub drain_timeout: Option<u64>,
}

impl ServiceArgs {
    /// Apply flags on top of the file configuration.
    pub fn apply(&self, config: &mut ServiceConfig) {
        if let Some(bind) = &self.bind {
            config.bind_address = bind.clone();
        }
        if self.tls {
            config.tls.enabled = true;
        }
        if let Some(cert) = &self.cert {
            config.tls.cert_path = Some(cert.clone());
        }
        if let Some(key) = &self.key {
            config.tls.key_path = Some(key.clone());
        }
        if let Some(root) = &self.root {
            config.tls.root_path = Some(root.clone());
        }
        if self.no_reflection {
            config.enable_reflection = false;
        }
        if self.prometheus {
            config.observability.prometheus_enabled = true;
        }
        if let Some(addr) = &self.metrics_address {
            config.observability.metrics_address = addr.clone();
        }
        if let Some(threads) = self.threads {
            config.workers.threads = Some(threads);
        }
        if self.verbose {
            config.observability.verbose = true;
        }
        if let Some(secs) = self.drain_timeout {
            config.shutdown.drain_timeout_secs = Some(secs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_surface() {
        let args = ServiceArgs::try_parse_from([
            "prodstarter-service",
            "--bind",
            "127.0.0.1:6000",
            "--tls",
            "--cert",
            "c.pem",
            "--key",
            "k.pem",
            "--root",
            "ca.pem",
            "--no-reflection",
            "--prometheus",
            "--threads",
            "3",
            "--verbose",
        ])
        .unwrap();

        let mut config = ServiceConfig::default();
        args.apply(&mut config);

        assert_eq!(config.bind_address, "127.0.0.1:6000");
        assert!(config.tls.enabled);
        assert_eq!(config.tls.cert_path, Some(PathBuf::from("c.pem")));
        assert_eq!(config.tls.key_path, Some(PathBuf::from("k.pem")));
        assert_eq!(config.tls.root_path, Some(PathBuf::from("ca.pem")));
        assert!(!config.enable_reflection);
        assert!(config.observability.prometheus_enabled);
        assert!(config.observability.verbose);
        assert_eq!(config.workers.threads, Some(3));
    }

    #[test]
    fn absent_flags_keep_file_values() {
        let args = ServiceArgs::try_parse_from(["prodstarter-service"]).unwrap();
        let mut config = ServiceConfig::default();
        config.bind_address = "10.0.0.1:7000".into();
        config.workers.threads = Some(2);

        args.apply(&mut config);
        assert_eq!(config.bind_address, "10.0.0.1:7000");
        assert_eq!(config.workers.threads, Some(2));
        assert!(config.enable_reflection);
    }

    #[test]
    fn threads_must_be_numeric() {
        assert!(ServiceArgs::try_parse_from(["prodstarter-service", "--threads", "many"]).is_err());
    }
}
