//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection on the HTTPS port
//!     → tls.rs (rustls handshake, capture version + SNI)
//!     → TlsInfo attached to every request on the connection
//!     → Hand off to HTTP layer
//! ```
//!
//! The plaintext port needs nothing from this layer; axum accepts it directly.

pub mod tls;

pub use tls::{load_tls_config, version_label, TlsError, TlsInfo, TlsInfoAcceptor};
