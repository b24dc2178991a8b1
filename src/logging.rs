//! Tracing subscriber setup for the binary
//!
//! Logs always go to stderr; stdout carries only the rendered prompt.

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber
///
/// `verbose` forces `debug`; otherwise `RUST_LOG` wins over the configured
/// level. Calling this twice keeps the first subscriber.
pub fn init(config: &LoggingConfig, verbose: bool, ansi: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false);

    let result = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    if result.is_ok() {
        debug!(level = %config.level, format = ?config.format, "logging initialized");
    }
}
