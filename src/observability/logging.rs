//! Structured logging.
//!
//! # Responsibilities
//! - Install the global `tracing` subscriber once at startup
//! - Select pretty or JSON output from configuration
//! - Let `RUST_LOG` override the configured level
//!
//! Secrets never reach this layer: request keys are redacted in `Debug`
//! and never passed as log fields.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Initialize the global subscriber.
///
/// A second call leaves the first subscriber in place.
pub fn init_logging(config: &ObservabilityConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let installed = match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_target(true))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(format = ?config.log_format, level = %config.log_level, "Logging initialized");
    }
}
