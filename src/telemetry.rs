//! Telemetry and observability setup
//!
//! Configures structured logging with tracing and tracing-subscriber. Logs go
//! to stderr so the `study` command's stdout stays readable.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Default filter directives for a log level
pub fn default_filter(level: &str) -> String {
    format!("flashai={},tower_http=debug", level)
}

/// Initialize tracing subscriber for structured logging
///
/// This can only be called once per process. Subsequent calls are silently ignored.
///
/// Reads the filter from the RUST_LOG environment variable, defaulting to the
/// level from `[observability]` in config.
///
/// # Examples
///
/// ```no_run
/// flashai::telemetry::init("info");
/// tracing::info!("Application started");
/// ```
pub fn init(default_level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter(default_level)));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    });
}
