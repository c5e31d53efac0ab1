//! HTTPS listener: static files with per-request access logging.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode, Uri},
    response::Response,
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::config::PrefixRewrite;
use crate::http::listing::directory_listing;
use crate::http::stats::instrument;
use crate::net::TlsInfo;
use crate::observability::access_log::request_referer;
use crate::observability::{AccessLogSink, FileRecord, RequestSummary};

/// State shared by file handlers.
#[derive(Clone)]
pub struct FileState {
    pub root: PathBuf,
    pub files: ServeDir,
    pub legacy_prefix: Option<PrefixRewrite>,
    pub sink: Arc<dyn AccessLogSink>,
}

impl FileState {
    pub fn new(
        root: &str,
        legacy_prefix: Option<PrefixRewrite>,
        sink: Arc<dyn AccessLogSink>,
    ) -> Self {
        Self {
            root: PathBuf::from(root),
            files: ServeDir::new(root),
            legacy_prefix,
            sink,
        }
    }
}

/// Serve a file from the content root and log the outcome.
///
/// The access line is written once the response body has been fully sent
/// (or abandoned), so it carries the real byte count. The logged URL is the
/// one the client asked for, before any legacy rewrite. Directories without
/// an `index.html` get a generated listing.
pub async fn serve_file(
    State(state): State<FileState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    mut request: Request<Body>,
) -> Response {
    let summary = RequestSummary::from_request(&request, Some(remote));
    let referer = request_referer(request.headers());
    let tls = request.extensions().get::<TlsInfo>().cloned();

    if let Some(rewrite) = &state.legacy_prefix {
        if let Some(uri) = rewrite_legacy_prefix(request.uri(), rewrite) {
            tracing::debug!(from = %request.uri(), to = %uri, "Legacy path rewritten");
            *request.uri_mut() = uri;
        }
    }

    let path = request.uri().path().to_owned();
    let method = request.method().clone();

    let mut response = match state.files.clone().oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };

    if response.status() == StatusCode::NOT_FOUND && path.ends_with('/') {
        if let Some(listing) = directory_listing(&state.root, &path, &method).await {
            response = listing;
        }
    }

    let sink = state.sink.clone();
    instrument(response, move |stats| {
        let record = FileRecord {
            request: summary,
            stats,
            referer,
            tls,
        };
        sink.record(&record.to_string());
    })
}

/// Replace the first occurrence of `rewrite.from` when the path starts with it.
///
/// Returns `None` when the path does not match; the query string is kept.
pub fn rewrite_legacy_prefix(uri: &Uri, rewrite: &PrefixRewrite) -> Option<Uri> {
    let path = uri.path();
    if !path.starts_with(&rewrite.from) {
        return None;
    }

    let rewritten = path.replacen(&rewrite.from, &rewrite.to, 1);
    let path_and_query = match uri.query() {
        Some(query) => format!("{rewritten}?{query}"),
        None => rewritten,
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}
