//! gRPC server setup.
//!
//! This module builds the tonic server (health, optional reflection, and
//! the place where application services get registered), starts it on a
//! pre-bound listener, and returns a handle used to drain and join it.

use std::net::SocketAddr;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tonic::transport::{Server, ServerTlsConfig};

use crate::error::StartupError;
use crate::grpc::health::{GrpcHealth, HealthReporter, ServingStatus};
use crate::net::Listener;

/// Errors surfaced when joining a draining server.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("gRPC server error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("gRPC server task failed: {0}")]
    Task(#[from] JoinError),
}

/// Control surface of a started server.
#[async_trait]
pub trait ServerHandle: Send {
    /// Stop accepting new connections; in-flight requests keep running.
    fn drain(&mut self);

    /// Wait until every in-flight request has completed. Call once.
    async fn join(&mut self) -> Result<(), ServeError>;

    /// Tear the server down without waiting for in-flight requests.
    fn abort(&mut self);
}

/// Handle to a tonic server running on its own task.
#[derive(Debug)]
pub struct GrpcServerHandle {
    local_addr: SocketAddr,
    drain_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), tonic::transport::Error>>,
}

impl GrpcServerHandle {
    /// Get the address the server is listening on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

#[async_trait]
impl ServerHandle for GrpcServerHandle {
    fn drain(&mut self) {
        if let Some(tx) = self.drain_tx.take() {
            let _ = tx.send(());
            tracing::info!(address = %self.local_addr, "gRPC server draining");
        }
    }

    async fn join(&mut self) -> Result<(), ServeError> {
        (&mut self.task).await??;
        tracing::info!("gRPC server stopped");
        Ok(())
    }

    fn abort(&mut self) {
        self.task.abort();
    }
}

/// Build the server and start serving on `listener`.
///
/// The health status starts as NOT_SERVING; the supervisor flips it once
/// the rest of the process is ready.
pub async fn launch(
    listener: Listener,
    tls: Option<ServerTlsConfig>,
    enable_reflection: bool,
) -> Result<(GrpcServerHandle, GrpcHealth), StartupError> {
    let local_addr = listener.local_addr();

    let (reporter, health_service) = tonic_health::server::health_reporter();
    let mut health = GrpcHealth::new(reporter);
    health.set_status(ServingStatus::NotServing).await;

    let mut builder = Server::builder();
    if let Some(tls) = tls {
        builder = builder
            .tls_config(tls)
            .map_err(|e| StartupError::Transport(format!("invalid TLS configuration: {}", e)))?;
    }

    let reflection = if enable_reflection {
        let service = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(tonic_health::pb::FILE_DESCRIPTOR_SET)
            .build_v1()
            .map_err(|e| StartupError::Transport(format!("failed to build reflection service: {}", e)))?;
        tracing::info!("gRPC reflection service enabled");
        Some(service)
    } else {
        None
    };

    // Application services are registered here alongside health.
    let router = builder
        .add_service(health_service)
        .add_optional_service(reflection);

    let incoming = listener.into_incoming()?;
    let (drain_tx, drain_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        router
            .serve_with_incoming_shutdown(incoming, async {
                let _ = drain_rx.await;
            })
            .await
    });

    tracing::info!(address = %local_addr, "gRPC server listening");
    Ok((
        GrpcServerHandle {
            local_addr,
            drain_tx: Some(drain_tx),
            task,
        },
        health,
    ))
}
