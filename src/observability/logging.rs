//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Honour `RUST_LOG` and the timestamp-format override
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Human-readable fmt output; this is a development tool

use tracing_subscriber::{
    fmt::{self, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "spa_devserver=info,tower_http=info";

/// Environment variable holding a strftime-style timestamp format.
pub const LOG_TIME_ENV: &str = "SPA_DEVSERVER_LOG_TIME";

/// Install the global subscriber. Call once, from `main`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let (custom_time, default_time) = match std::env::var(LOG_TIME_ENV) {
        Ok(format) if !format.is_empty() => {
            (Some(fmt::layer().with_timer(ChronoLocal::new(format))), None)
        }
        _ => (None, Some(fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(custom_time)
        .with(default_time)
        .init();
}
