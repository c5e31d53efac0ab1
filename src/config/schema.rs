//! Configuration schema definitions.
//!
//! Every value the server needs is fixed at build time; the defaults below
//! are the production configuration. All types derive Serde traits so the
//! same structure can be read from a TOML file when embedding the library.

use serde::{Deserialize, Serialize};

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Plaintext and TLS bind addresses.
    pub listener: ListenerConfig,

    /// Certificate chain and private key locations.
    pub tls: TlsConfig,

    /// Static content settings.
    pub files: FilesConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Plaintext address; every request here is redirected to HTTPS.
    pub http_address: String,

    /// TLS address serving the static files.
    pub https_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            http_address: "0.0.0.0:80".to_string(),
            https_address: "0.0.0.0:443".to_string(),
        }
    }
}

/// TLS configuration for the HTTPS listener.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to certificate chain file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: "/etc/letsencrypt/live/ranney.com/fullchain.pem".to_string(),
            key_path: "/etc/letsencrypt/live/ranney.com/privkey.pem".to_string(),
        }
    }
}

/// Static file serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FilesConfig {
    /// Absolute directory files are served from.
    pub root: String,

    /// Value of the `Server` header on every HTTPS response.
    pub server_header: String,

    /// Legacy path prefix rewritten before lookup.
    pub legacy_prefix: Option<PrefixRewrite>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root: "/home/freebsd/ranney.com/files".to_string(),
            server_header: "ranney.com".to_string(),
            legacy_prefix: Some(PrefixRewrite {
                from: "/~mjr".to_string(),
                to: "/mjr".to_string(),
            }),
        }
    }
}

/// A single path prefix replacement.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PrefixRewrite {
    /// Prefix matched at the start of the request path.
    pub from: String,

    /// Replacement for the first occurrence of `from`.
    pub to: String,
}
