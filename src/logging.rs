//! Tracing subscriber setup shared by both binaries.
//!
//! Diagnostics go to stderr so they never interleave with the report printed
//! on stdout.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{AppError, AppResult};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

/// Pick the filter directive: `RUST_LOG`, then the CLI flag, then the config.
pub fn resolve_filter(config: &LoggingConfig, cli_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = cli_level.unwrap_or(&config.level);
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    })
}

/// Install the global subscriber.
pub fn init(config: &LoggingConfig, cli_level: Option<&str>) -> AppResult<()> {
    let filter = resolve_filter(config, cli_level);

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    result.map_err(|e| AppError::Logging(e.to_string()))?;

    debug!("Logging initialized with format {:?}", config.format);
    Ok(())
}
