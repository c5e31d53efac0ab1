//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;
use ranney_server::net::TlsInfo;
use ranney_server::observability::AccessLogSink;
use ranney_server::{HttpServer, ServerConfig};

/// Peer address attached to every synthetic request.
pub const REMOTE: &str = "192.0.2.10:50000";

/// Sink that keeps every access line in memory.
#[derive(Clone, Default)]
pub struct CollectingSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CollectingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl AccessLogSink for CollectingSink {
    fn record(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_owned());
    }
}

/// Build a server whose content root is `root`, logging into a collecting sink.
pub fn server_with_root(root: &Path) -> (HttpServer, CollectingSink) {
    let mut config = ServerConfig::default();
    config.files.root = root.to_string_lossy().into_owned();

    let sink = CollectingSink::default();
    let server = HttpServer::new(config)
        .unwrap()
        .with_sink(Arc::new(sink.clone()));
    (server, sink)
}

/// A request as it would arrive from the acceptor: peer address attached,
/// and session details when it came over TLS.
pub fn request(method: &str, uri: &str, tls: Option<TlsInfo>) -> axum::http::request::Builder {
    let remote: SocketAddr = REMOTE.parse().unwrap();
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Host", "ranney.com")
        .extension(ConnectInfo(remote));
    if let Some(tls) = tls {
        builder = builder.extension(tls);
    }
    builder
}

#[allow(dead_code)]
pub fn empty(builder: axum::http::request::Builder) -> Request<Body> {
    builder.body(Body::empty()).unwrap()
}
