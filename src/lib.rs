//! Static file HTTPS server for ranney.com
//!
//! Plaintext requests are redirected to HTTPS; HTTPS requests are served
//! from a fixed content root. Every request leaves one access log line.

pub mod config;
pub mod http;
pub mod net;
pub mod observability;

pub use config::ServerConfig;
pub use http::{HttpServer, ServerError};
