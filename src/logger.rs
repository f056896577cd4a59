use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::args::LogLevel;

/// Initializes tracing, panicking if a subscriber is already installed.
///
/// `RUST_LOG` takes precedence; otherwise `level` applies to every target.
/// Tests should prefer [`try_init`].
pub fn init(level: LogLevel) {
    try_init(level).expect("failed to initialize tracing")
}

/// Attempts to initialize tracing and returns an error if a subscriber is
/// already set.
pub fn try_init(level: LogLevel) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from(level).into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(Into::into)
}
