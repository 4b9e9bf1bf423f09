//! Shared utilities for integration tests.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::sync::watch;
use tonic::transport::Channel;
use tonic_health::pb::health_check_response::ServingStatus;
use tonic_health::pb::health_client::HealthClient;
use tonic_health::pb::HealthCheckRequest;
use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use prodstarter::lifecycle::SupervisorState;
use prodstarter::ServiceConfig;

/// Service config bound to an ephemeral loopback port.
#[allow(dead_code)]
pub fn loopback_config(workers: usize) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.bind_address = "127.0.0.1:0".to_string();
    config.workers.threads = Some(workers);
    config.workers.poll_interval_ms = 50;
    config
}

/// Write `contents` to a fresh temporary file.
#[allow(dead_code)]
pub fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Query the overall health status of the server at `addr`.
#[allow(dead_code)]
pub async fn health_status(addr: SocketAddr) -> Result<ServingStatus, Box<dyn std::error::Error>> {
    let channel = Channel::from_shared(format!("http://{}", addr))?.connect().await?;
    let mut client = HealthClient::new(channel);
    let response = client
        .check(HealthCheckRequest {
            service: String::new(),
        })
        .await?;
    Ok(ServingStatus::try_from(response.into_inner().status)?)
}

/// Wait until the supervisor publishes `target`.
#[allow(dead_code)]
pub async fn wait_for_state(rx: &mut watch::Receiver<SupervisorState>, target: SupervisorState) {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|state| *state == target))
        .await
        .expect("timed out waiting for supervisor state")
        .expect("supervisor dropped its state channel");
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Lines containing both `level` and `message`.
    pub fn count(&self, level: &str, message: &str) -> usize {
        self.contents()
            .lines()
            .filter(|line| line.contains(level) && line.contains(message))
            .count()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route this thread's events at or above `level` into a [`CapturedLogs`].
#[allow(dead_code)]
pub fn capture_logs(level: LevelFilter) -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(logs.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
