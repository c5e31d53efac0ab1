//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! ServerConfig::default()  (fixed production values)
//!   or config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared read-only by both listeners
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The binary only runs the defaults; `loader` is for embedders that
//!   keep their settings in a file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{FilesConfig, ListenerConfig, PrefixRewrite, ServerConfig, TlsConfig};
pub use validation::{validate_config, ValidationError};
