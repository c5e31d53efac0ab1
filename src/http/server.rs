//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum routers for both listeners
//! - Wire up middleware (tracing, Server header)
//! - Bind the plaintext listener in a background task
//! - Load TLS material and serve the HTTPS listener in the foreground
//! - Surface the first listener failure to the caller

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    Router,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::{validate_config, ConfigError, ServerConfig, ValidationError};
use crate::http::files::{serve_file, FileState};
use crate::http::redirect::{redirect_to_https, RedirectState};
use crate::net::tls::{load_tls_config, TlsError, TlsInfoAcceptor};
use crate::observability::{AccessLogSink, TracingSink};

/// Listener-level failures. Any of these ends the process.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("{listener} listener failed: {source}")]
    Serve {
        listener: &'static str,
        source: std::io::Error,
    },

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("listener task failed: {0}")]
    Task(#[from] JoinError),

    #[error("{0} listener stopped")]
    Stopped(&'static str),
}

/// The plaintext redirector and the HTTPS file server.
pub struct HttpServer {
    config: ServerConfig,
    server_header: HeaderValue,
    sink: Arc<dyn AccessLogSink>,
}

impl HttpServer {
    /// Create a new server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let server_header = HeaderValue::from_str(&config.files.server_header).map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidServerHeader(
                config.files.server_header.clone(),
            )])
        })?;

        Ok(Self {
            config,
            server_header,
            sink: Arc::new(TracingSink),
        })
    }

    /// Replace the destination of access log lines.
    pub fn with_sink(mut self, sink: Arc<dyn AccessLogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Router for the plaintext listener. Every request is redirected.
    pub fn redirect_router(&self) -> Router {
        let state = RedirectState {
            sink: self.sink.clone(),
        };

        Router::new()
            .fallback(redirect_to_https)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Router for the HTTPS listener.
    pub fn file_router(&self) -> Router {
        let state = FileState::new(
            &self.config.files.root,
            self.config.files.legacy_prefix.clone(),
            self.sink.clone(),
        );

        Router::new()
            .fallback(serve_file)
            .with_state(state)
            .layer(SetResponseHeaderLayer::overriding(
                header::SERVER,
                self.server_header.clone(),
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// Run both listeners until one of them fails.
    ///
    /// The plaintext listener runs as a spawned task; the HTTPS listener runs
    /// on the current task. Whichever ends first decides the returned error.
    pub async fn run(self) -> ServerError {
        let redirect_router = self.redirect_router();
        let http_address = self.config.listener.http_address.clone();

        let redirect = tokio::spawn(async move {
            let listener = bind(&http_address).await?;
            if let Ok(addr) = listener.local_addr() {
                tracing::info!(address = %addr, "Listening on HTTP, port {}", addr.port());
            }
            serve_redirect(listener, redirect_router).await
        });

        tokio::select! {
            joined = redirect => match joined {
                Ok(Ok(())) => ServerError::Stopped("HTTP"),
                Ok(Err(e)) => e,
                Err(e) => ServerError::Task(e),
            },
            result = self.serve_tls() => match result {
                Ok(()) => ServerError::Stopped("HTTPS"),
                Err(e) => e,
            },
        }
    }

    async fn serve_tls(&self) -> Result<(), ServerError> {
        let address: SocketAddr = self
            .config
            .listener
            .https_address
            .parse()
            .map_err(|_| {
                ConfigError::Validation(vec![ValidationError::InvalidAddress {
                    field: "listener.https_address",
                    value: self.config.listener.https_address.clone(),
                }])
            })?;

        let tls = load_tls_config(
            Path::new(&self.config.tls.cert_path),
            Path::new(&self.config.tls.key_path),
        )
        .await?;

        tracing::info!(address = %address, "Listening on HTTPS, port {}", address.port());

        serve_files(self.file_router(), address, tls, Handle::new()).await
    }
}

async fn bind(address: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.to_string(),
            source,
        })
}

/// Serve the redirect router on an already bound listener.
pub async fn serve_redirect(listener: TcpListener, router: Router) -> Result<(), ServerError> {
    let app = router.into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, app)
        .await
        .map_err(|source| ServerError::Serve {
            listener: "HTTP",
            source,
        })
}

/// Serve the file router over TLS on `address`.
///
/// Each accepted connection carries its [`TlsInfo`](crate::net::TlsInfo) into
/// the handlers. `handle` reports the bound address once listening.
pub async fn serve_files(
    router: Router,
    address: SocketAddr,
    tls: RustlsConfig,
    handle: Handle,
) -> Result<(), ServerError> {
    let app = router.into_make_service_with_connect_info::<SocketAddr>();

    axum_server::bind(address)
        .handle(handle)
        .acceptor(TlsInfoAcceptor::new(tls))
        .serve(app)
        .await
        .map_err(|source| ServerError::Serve {
            listener: "HTTPS",
            source,
        })
}
