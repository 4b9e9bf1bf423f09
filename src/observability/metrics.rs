//! Metrics collection and exposition.
//!
//! # Metrics
//! - `prodstarter_workers_active` (gauge): running worker tasks
//! - `prodstarter_serving` (gauge): 1 while the health status is SERVING
//! - `prodstarter_records_processed_total` (counter): runner input records
//! - `prodstarter_steps_completed_total` (counter): runner simulated steps
//!
//! Without an installed recorder every update is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Start the Prometheus scrape endpoint on `addr`. Must run inside a
/// Tokio runtime.
pub fn init_exporter(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus metrics exposed");
    Ok(())
}

/// Install an in-process recorder whose contents can be rendered on demand.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

pub fn set_active_workers(count: usize) {
    ::metrics::gauge!("prodstarter_workers_active").set(count as f64);
}

pub fn set_serving(serving: bool) {
    ::metrics::gauge!("prodstarter_serving").set(if serving { 1.0 } else { 0.0 });
}

pub fn record_processed() {
    ::metrics::counter!("prodstarter_records_processed_total").increment(1);
}

pub fn record_step() {
    ::metrics::counter!("prodstarter_steps_completed_total").increment(1);
}
