//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Plaintext connection
//!     → server.rs (axum::serve)
//!     → redirect.rs (log, 301 to https://<host><path+query>)
//!
//! TLS connection (TlsInfo attached by net::tls)
//!     → server.rs (axum_server + rustls)
//!     → files.rs (legacy rewrite, ServeDir)
//!     → listing.rs (only for index-less directories)
//!     → stats.rs (count status + bytes while the body streams)
//!     → access line once the body is done
//! ```

pub mod files;
pub mod listing;
pub mod redirect;
pub mod server;
pub mod stats;

pub use server::{HttpServer, ServerError};
pub use stats::{instrument, InstrumentedBody, ResponseStats};
