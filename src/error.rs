use crate::config::ConfigError;
use crate::port::PortError;
use thiserror::Error;

/// Unified application error type returned from both binaries.
///
/// Operational problems (no device, failed connection, bad telemetry) are
/// reported to the user and are not errors at this level; only setup
/// failures and broken terminal output end up here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serial port error: {0}")]
    Port(#[from] PortError),

    #[error("Failed to enumerate serial ports: {0}")]
    Enumerate(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

/// Result alias used across the crate.
pub type AppResult<T> = Result<T, AppError>;
