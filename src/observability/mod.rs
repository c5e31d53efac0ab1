//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers produce:
//!     → access_log.rs (one key=value line per request)
//!     → AccessLogSink (TracingSink in production)
//!     → logging.rs (stdout, bare line for target "access")
//!
//! Startup and listener failures:
//!     → tracing events → logging.rs (timestamped, levelled)
//! ```

pub mod access_log;
pub mod logging;

pub use access_log::{AccessLogSink, FileRecord, RedirectRecord, RequestSummary, TracingSink};
pub use logging::init_logging;
