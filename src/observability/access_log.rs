//! Per-request access log lines.
//!
//! Every request produces exactly one line of space separated `key=value`
//! tokens. Lines are handed to an [`AccessLogSink`]; in production that is
//! [`TracingSink`], which routes them to stdout through the `access` target.

use std::fmt;
use std::net::SocketAddr;

use axum::http::{header, HeaderMap, Method, Request, Uri, Version};

use crate::http::stats::ResponseStats;
use crate::net::TlsInfo;

/// Tracing target reserved for access log lines.
pub const ACCESS_LOG_TARGET: &str = "access";

/// Destination for finished access log lines.
pub trait AccessLogSink: Send + Sync + 'static {
    fn record(&self, line: &str);
}

/// Emits access lines as `tracing` events on [`ACCESS_LOG_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AccessLogSink for TracingSink {
    fn record(&self, line: &str) {
        tracing::info!(target: ACCESS_LOG_TARGET, "{line}");
    }
}

/// Request fields common to both listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSummary {
    pub method: Method,
    pub url: String,
    pub version: Version,
    pub host: String,
    pub remote: Option<SocketAddr>,
}

impl RequestSummary {
    pub fn from_request<B>(request: &Request<B>, remote: Option<SocketAddr>) -> Self {
        Self {
            method: request.method().clone(),
            url: request_url(request.uri()),
            version: request.version(),
            host: request_host(request.headers(), request.uri()),
            remote,
        }
    }
}

impl fmt::Display for RequestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "method={} url={} proto={} host={} remote=",
            self.method,
            self.url,
            proto_label(self.version),
            self.host
        )?;
        match self.remote {
            Some(addr) => write!(f, "{addr}"),
            None => Ok(()),
        }
    }
}

/// Line logged by the plaintext listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRecord {
    pub request: RequestSummary,
    pub code: u16,
}

impl fmt::Display for RedirectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} code={}", self.request, self.code)
    }
}

/// Line logged by the HTTPS listener once the response has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub request: RequestSummary,
    pub stats: ResponseStats,
    pub referer: String,
    pub tls: Option<TlsInfo>,
}

impl fmt::Display for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} code={} bytes={} ref={} ",
            self.request, self.stats.status_code, self.stats.response_bytes, self.referer
        )?;
        match &self.tls {
            Some(tls) => write!(
                f,
                "tls=true version={} server_name={}",
                tls.version_label(),
                tls.server_name.as_deref().unwrap_or("")
            ),
            None => f.write_str("tls=false version= server_name="),
        }
    }
}

/// Path and query exactly as the client sent them.
pub fn request_url(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| uri.path().to_owned())
}

/// Host header, falling back to the URI authority (HTTP/2 `:authority`).
pub fn request_host(headers: &HeaderMap, uri: &Uri) -> String {
    match headers.get(header::HOST) {
        Some(value) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
        None => uri
            .authority()
            .map(|authority| authority.as_str().to_owned())
            .unwrap_or_default(),
    }
}

/// Referer header, empty when absent.
pub fn request_referer(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default()
}

/// HTTP version as `major.minor`.
pub fn proto_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_11 => "1.1",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "",
    }
}
