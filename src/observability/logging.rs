//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Keep access lines bare on stdout, operational events decorated
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Filters are fixed in code; no environment lookup

use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::observability::access_log::ACCESS_LOG_TARGET;

/// Filter for the access layer: only access lines.
pub fn access_filter() -> Targets {
    Targets::new().with_target(ACCESS_LOG_TARGET, LevelFilter::INFO)
}

/// Filter for the operational layer: everything at INFO except access lines.
pub fn operational_filter() -> Targets {
    Targets::new()
        .with_default(LevelFilter::INFO)
        .with_target(ACCESS_LOG_TARGET, LevelFilter::OFF)
}

/// Install the global subscriber.
///
/// Access lines go to stdout as the bare message. Everything else goes
/// through the default formatter with timestamp and level.
pub fn init_logging() {
    let access = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(false)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_filter(access_filter());

    let operational = fmt::layer().with_filter(operational_filter());

    tracing_subscriber::registry()
        .with(access)
        .with(operational)
        .init();
}
