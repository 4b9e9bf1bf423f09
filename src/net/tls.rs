//! TLS configuration and certificate loading.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tonic::transport::{Certificate, Identity, ServerTlsConfig};

use crate::config::TlsConfig;

/// Errors loading TLS material.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("TLS enabled but {0} file not provided")]
    Missing(&'static str),

    #[error("failed to read TLS file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed PEM in {}: {source}", path.display())]
    Pem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificates found in {}", path.display())]
    NoCertificates { path: PathBuf },

    #[error("no private key found in {}", path.display())]
    NoPrivateKey { path: PathBuf },
}

/// Build the server TLS configuration, or `None` when TLS is disabled.
///
/// The PEM files are parsed up front so that an unusable file fails
/// bootstrap instead of the first handshake.
pub async fn load_tls_config(config: &TlsConfig) -> Result<Option<ServerTlsConfig>, TlsError> {
    if !config.enabled {
        return Ok(None);
    }

    let cert_path = config.cert_path.as_deref().ok_or(TlsError::Missing("certificate"))?;
    let key_path = config.key_path.as_deref().ok_or(TlsError::Missing("private key"))?;

    let cert = read_pem(cert_path).await?;
    ensure_certificates(cert_path, &cert)?;
    let key = read_pem(key_path).await?;
    ensure_private_key(key_path, &key)?;

    let mut tls = ServerTlsConfig::new().identity(Identity::from_pem(cert, key));

    if let Some(root_path) = config.root_path.as_deref() {
        let root = read_pem(root_path).await?;
        ensure_certificates(root_path, &root)?;
        tls = tls.client_ca_root(Certificate::from_pem(root));
        tracing::info!(root = %root_path.display(), "Client certificate verification enabled");
    }

    tracing::info!(cert = %cert_path.display(), key = %key_path.display(), "TLS material loaded");
    Ok(Some(tls))
}

async fn read_pem(path: &Path) -> Result<Vec<u8>, TlsError> {
    tokio::fs::read(path).await.map_err(|source| TlsError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_certificates(path: &Path, pem: &[u8]) -> Result<(), TlsError> {
    let mut reader = pem;
    let mut found = 0usize;
    for cert in rustls_pemfile::certs(&mut reader) {
        cert.map_err(|source| TlsError::Pem {
            path: path.to_path_buf(),
            source,
        })?;
        found += 1;
    }

    if found == 0 {
        return Err(TlsError::NoCertificates {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn ensure_private_key(path: &Path, pem: &[u8]) -> Result<(), TlsError> {
    let mut reader = pem;
    match rustls_pemfile::private_key(&mut reader) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(TlsError::NoPrivateKey {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(TlsError::Pem {
            path: path.to_path_buf(),
            source,
        }),
    }
}
