//! Response instrumentation.
//!
//! Wraps an outbound response so the status code and the number of body
//! bytes handed to the connection can be logged once the response is done.
//! Bytes and headers pass through untouched.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use axum::http::{Response, StatusCode};
use axum::BoxError;
use http_body::{Body as HttpBody, Frame, SizeHint};

/// Status and byte count captured for a single response.
///
/// `status_code` is `0` until a status is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseStats {
    pub status_code: u16,
    pub response_bytes: u64,
}

impl ResponseStats {
    pub fn set_status(&mut self, status: StatusCode) {
        self.status_code = status.as_u16();
    }

    pub fn record_write(&mut self, len: usize) {
        self.response_bytes += len as u64;
    }
}

type OnComplete = Box<dyn FnOnce(ResponseStats) + Send>;

/// Body decorator counting every data frame it yields.
///
/// The completion callback runs exactly once, when the body is dropped:
/// after the last frame, or early if the client goes away.
pub struct InstrumentedBody<B> {
    inner: B,
    stats: ResponseStats,
    on_complete: Option<OnComplete>,
}

impl<B> InstrumentedBody<B> {
    pub fn new<F>(inner: B, stats: ResponseStats, on_complete: F) -> Self
    where
        F: FnOnce(ResponseStats) + Send + 'static,
    {
        Self {
            inner,
            stats,
            on_complete: Some(Box::new(on_complete)),
        }
    }

    pub fn stats(&self) -> ResponseStats {
        self.stats
    }
}

impl<B> HttpBody for InstrumentedBody<B>
where
    B: HttpBody<Data = Bytes> + Unpin,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.inner).poll_frame(cx);

        // Errors are returned as-is and count for nothing.
        if let Poll::Ready(Some(Ok(frame))) = &polled {
            if let Some(data) = frame.data_ref() {
                this.stats.record_write(data.len());
            }
        }

        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B> Drop for InstrumentedBody<B> {
    fn drop(&mut self) {
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(self.stats);
        }
    }
}

impl<B> fmt::Debug for InstrumentedBody<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentedBody")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Record the response status and wrap its body in an [`InstrumentedBody`].
///
/// Headers are left exactly as the inner service produced them.
pub fn instrument<B, F>(response: Response<B>, on_complete: F) -> Response<Body>
where
    B: HttpBody<Data = Bytes> + Send + Unpin + 'static,
    B::Error: Into<BoxError>,
    F: FnOnce(ResponseStats) + Send + 'static,
{
    let (parts, body) = response.into_parts();

    let mut stats = ResponseStats::default();
    stats.set_status(parts.status);

    Response::from_parts(parts, Body::new(InstrumentedBody::new(body, stats, on_complete)))
}
