//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate bind addresses, paths and header values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::path::Path;

use axum::http::HeaderValue;

use crate::config::schema::ServerConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is not a valid socket address: {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must not be empty")]
    EmptyPath { field: &'static str },

    #[error("files.root must be an absolute path: {0:?}")]
    RelativeRoot(String),

    #[error("files.server_header is not a legal header value: {0:?}")]
    InvalidServerHeader(String),

    #[error("files.legacy_prefix.{field} must start with '/': {value:?}")]
    InvalidPrefix { field: &'static str, value: String },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("listener.http_address", &config.listener.http_address),
        ("listener.https_address", &config.listener.https_address),
    ] {
        if value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.clone(),
            });
        }
    }

    for (field, value) in [
        ("tls.cert_path", &config.tls.cert_path),
        ("tls.key_path", &config.tls.key_path),
        ("files.root", &config.files.root),
    ] {
        if value.is_empty() {
            errors.push(ValidationError::EmptyPath { field });
        }
    }

    if !config.files.root.is_empty() && !Path::new(&config.files.root).is_absolute() {
        errors.push(ValidationError::RelativeRoot(config.files.root.clone()));
    }

    if HeaderValue::from_str(&config.files.server_header).is_err() {
        errors.push(ValidationError::InvalidServerHeader(
            config.files.server_header.clone(),
        ));
    }

    if let Some(rewrite) = &config.files.legacy_prefix {
        for (field, value) in [("from", &rewrite.from), ("to", &rewrite.to)] {
            if !value.starts_with('/') {
                errors.push(ValidationError::InvalidPrefix {
                    field,
                    value: value.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::PrefixRewrite;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = ServerConfig::default();
        config.listener.http_address = ":80".into();
        config.tls.key_path = String::new();
        config.files.root = "files".into();
        config.files.server_header = "bad\nvalue".into();
        config.files.legacy_prefix = Some(PrefixRewrite {
            from: "~mjr".into(),
            to: "/mjr".into(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidAddress {
                    field: "listener.http_address",
                    value: ":80".into(),
                },
                ValidationError::EmptyPath {
                    field: "tls.key_path"
                },
                ValidationError::RelativeRoot("files".into()),
                ValidationError::InvalidServerHeader("bad\nvalue".into()),
                ValidationError::InvalidPrefix {
                    field: "from",
                    value: "~mjr".into(),
                },
            ]
        );
    }

    #[test]
    fn rewrite_is_optional() {
        let mut config = ServerConfig::default();
        config.files.legacy_prefix = None;
        assert!(validate_config(&config).is_ok());
    }
}
