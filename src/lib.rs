//! Pico Mixer Tools Library
//!
//! Shared code behind the two diagnostic binaries of the Pico audio mixer:
//! `pico-usb-debug` (USB/serial inspector) and `pico-connection-test`
//! (discovers the mixer's port and shows live potentiometer readings).
//!
//! # Modules
//!
//! - `config`: TOML configuration with environment overrides
//! - `error`: Unified error handling
//! - `logging`: tracing subscriber setup
//! - `port`: Port abstraction layer for serial communication
//! - `discovery`: Port descriptors, automatic and interactive port selection
//! - `telemetry`: The firmware's JSON line format
//! - `monitor`: Connection and streaming loop
//! - `inspector`: The USB/serial inspector report

pub mod config;
pub mod discovery;
pub mod error;
pub mod inspector;
pub mod logging;
pub mod monitor;
pub mod port;
pub mod telemetry;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use discovery::{find_candidate, select_port, MatchReason, PortDescriptor};
pub use error::{AppError, AppResult};
pub use monitor::{Monitor, MonitorError, StreamEnd};
pub use port::{MockSerialPort, PortConfiguration, PortError, SerialPortAdapter, SyncSerialPort};
pub use telemetry::{parse_line, LineOutcome, TelemetryRecord};
