//! Plaintext listener: send every request to the HTTPS equivalent.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::observability::{AccessLogSink, RedirectRecord, RequestSummary};

/// State shared by redirect handlers.
#[derive(Clone)]
pub struct RedirectState {
    pub sink: Arc<dyn AccessLogSink>,
}

/// Answer with `301 Moved Permanently` to `https://<host><path+query>`.
///
/// The Host header is not validated; it is copied into the target as sent.
pub async fn redirect_to_https(
    State(state): State<RedirectState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let summary = RequestSummary::from_request(&request, Some(remote));
    let target = https_target(&summary.host, &summary.url);
    let response = permanent_redirect(request.method(), &target);

    let record = RedirectRecord {
        request: summary,
        code: response.status().as_u16(),
    };
    state.sink.record(&record.to_string());

    response
}

/// Secure URL for a plaintext request. Plain concatenation, no normalization.
pub fn https_target(host: &str, url: &str) -> String {
    format!("https://{host}{url}")
}

/// Build the permanent redirect response.
///
/// GET and HEAD are marked `text/html`; only GET carries the short HTML body
/// linking to the target, followed by a blank line.
pub fn permanent_redirect(method: &Method, target: &str) -> Response {
    let location = match HeaderValue::from_bytes(target.as_bytes()) {
        Ok(value) => value,
        Err(_) => {
            tracing::debug!(redirect_target = target, "Redirect target is not a legal header value");
            return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
        }
    };

    let body = if method == Method::GET {
        Body::from(format!(
            "<a href=\"{}\">Moved Permanently</a>.\n\n",
            html_escape::encode_double_quoted_attribute(target)
        ))
    } else {
        Body::empty()
    };

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::MOVED_PERMANENTLY;
    if method == Method::GET || method == Method::HEAD {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
    }
    response.headers_mut().insert(header::LOCATION, location);
    response
}
