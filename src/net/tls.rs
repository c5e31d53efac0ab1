//! TLS configuration, certificate loading and session capture.

use std::io;
use std::path::{Path, PathBuf};

use axum::middleware::AddExtension;
use axum::Extension;
use axum_server::accept::Accept;
use axum_server::tls_rustls::{RustlsAcceptor, RustlsConfig};
use futures_util::future::BoxFuture;
use rustls::{ProtocolVersion, ServerConnection};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::server::TlsStream;
use tower::Layer;

/// Error type for TLS setup.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("{kind} file not found: {path:?}")]
    MissingFile { kind: &'static str, path: PathBuf },

    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("no certificates found in {0:?}")]
    NoCertificates(PathBuf),

    #[error("no private key found in {0:?}")]
    NoPrivateKey(PathBuf),

    #[error("invalid TLS material: {0}")]
    Config(io::Error),
}

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    let cert = read_pem("Certificate", cert_path).await?;
    let key = read_pem("Private key", key_path).await?;

    let certs = rustls_pemfile::certs(&mut cert.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TlsError::Read {
            path: cert_path.to_path_buf(),
            source,
        })?;
    if certs.is_empty() {
        return Err(TlsError::NoCertificates(cert_path.to_path_buf()));
    }

    let private_key = rustls_pemfile::private_key(&mut key.as_slice()).map_err(|source| {
        TlsError::Read {
            path: key_path.to_path_buf(),
            source,
        }
    })?;
    if private_key.is_none() {
        return Err(TlsError::NoPrivateKey(key_path.to_path_buf()));
    }

    tracing::debug!(
        cert_path = %cert_path.display(),
        certificates = certs.len(),
        "TLS material loaded"
    );

    RustlsConfig::from_pem(cert, key).await.map_err(TlsError::Config)
}

async fn read_pem(kind: &'static str, path: &Path) -> Result<Vec<u8>, TlsError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(TlsError::MissingFile {
            kind,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(TlsError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Negotiated session details of the connection a request arrived on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsInfo {
    pub version: Option<ProtocolVersion>,
    /// SNI host name sent by the client.
    pub server_name: Option<String>,
}

impl TlsInfo {
    pub fn from_connection(conn: &ServerConnection) -> Self {
        Self {
            version: conn.protocol_version(),
            server_name: conn.server_name().map(str::to_owned),
        }
    }

    /// Display label for the negotiated version.
    pub fn version_label(&self) -> &'static str {
        self.version.map(version_label).unwrap_or("")
    }
}

/// Map a protocol version to its log label.
///
/// Only SSL 3.0 through TLS 1.2 have labels; everything else, TLS 1.3
/// included, renders as an empty string.
pub fn version_label(version: ProtocolVersion) -> &'static str {
    match version {
        ProtocolVersion::SSLv3 => "SSL3.0",
        ProtocolVersion::TLSv1_0 => "TLS1.0",
        ProtocolVersion::TLSv1_1 => "TLS1.1",
        ProtocolVersion::TLSv1_2 => "TLS1.2",
        _ => "",
    }
}

/// Rustls acceptor that attaches [`TlsInfo`] to every request on the connection.
#[derive(Debug, Clone)]
pub struct TlsInfoAcceptor {
    inner: RustlsAcceptor,
}

impl TlsInfoAcceptor {
    pub fn new(config: RustlsConfig) -> Self {
        Self {
            inner: RustlsAcceptor::new(config),
        }
    }
}

impl<I, S> Accept<I, S> for TlsInfoAcceptor
where
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    S: Send + 'static,
{
    type Stream = TlsStream<I>;
    type Service = AddExtension<S, TlsInfo>;
    type Future = BoxFuture<'static, io::Result<(Self::Stream, Self::Service)>>;

    fn accept(&self, stream: I, service: S) -> Self::Future {
        let acceptor = self.inner.clone();

        Box::pin(async move {
            let (stream, service) = acceptor.accept(stream, service).await?;
            let info = TlsInfo::from_connection(stream.get_ref().1);

            tracing::trace!(
                version = info.version_label(),
                server_name = info.server_name.as_deref().unwrap_or(""),
                "TLS handshake complete"
            );

            Ok((stream, Extension(info).layer(service)))
        })
    }
}
