//! Configuration schema definitions.
//!
//! Every section is `#[serde(default)]`, so a file only needs the keys it
//! changes.

use crate::port::{PortConfiguration, DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::error::{ConfigError, ConfigResult};

/// Raspberry Pi USB vendor ID, reported by RP2040 boards.
pub const RASPBERRY_PI_VID: u16 = 0x2E8A;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial connection parameters
    pub serial: SerialConfig,
    /// Automatic port discovery
    pub discovery: DiscoveryConfig,
    /// Telemetry streaming loop
    pub monitor: MonitorConfig,
    /// USB/serial inspector
    pub inspector: InspectorConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl Config {
    /// Check values that deserialize fine but make no sense at runtime.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.serial.baud_rate == 0 {
            return Err(ConfigError::validation(
                "serial.baud_rate",
                "must be greater than zero",
            ));
        }
        if self.monitor.newline_every == 0 {
            return Err(ConfigError::validation(
                "monitor.newline_every",
                "must be greater than zero",
            ));
        }
        if self.monitor.max_line_len == 0 {
            return Err(ConfigError::validation(
                "monitor.max_line_len",
                "must be greater than zero",
            ));
        }
        if let Err(e) = regex::Regex::new(&self.inspector.device_pattern) {
            return Err(ConfigError::validation(
                "inspector.device_pattern",
                e.to_string(),
            ));
        }
        if matches!(self.inspector.usb_command.as_deref(), Some([])) {
            return Err(ConfigError::validation(
                "inspector.usb_command",
                "must name a program",
            ));
        }
        Ok(())
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Serial connection section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Fixed port path; skips discovery when set
    pub port: Option<String>,
    /// Baud rate
    pub baud_rate: u32,
    /// Read timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

impl SerialConfig {
    /// Get the read timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parameters for opening the port.
    pub fn port_configuration(&self) -> PortConfiguration {
        PortConfiguration {
            baud_rate: self.baud_rate,
            timeout: self.timeout(),
        }
    }
}

/// Port discovery section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Case-insensitive substrings matched against the port description
    pub keywords: Vec<String>,
    /// Case-insensitive substrings matched against the device path
    pub path_patterns: Vec<String>,
    /// USB vendor IDs accepted when nothing else matched
    pub vendor_ids: Vec<u16>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            keywords: vec![
                "pico".to_string(),
                "rp2040".to_string(),
                "usb serial".to_string(),
            ],
            path_patterns: vec!["usbmodem".to_string()],
            vendor_ids: vec![RASPBERRY_PI_VID],
        }
    }
}

/// Streaming loop section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Idle time between polls in milliseconds
    pub poll_interval_ms: u64,
    /// Emit a full newline after this many rendered records
    pub newline_every: u64,
    /// Longest partial line kept before it is flushed as raw data
    pub max_line_len: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
            newline_every: 20,
            max_line_len: 4096,
        }
    }
}

impl MonitorConfig {
    /// Get the poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// USB/serial inspector section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Inventory command and arguments; the platform default when unset
    pub usb_command: Option<Vec<String>>,
    /// Case-insensitive substrings marking a Pico-related inventory line
    pub usb_keywords: Vec<String>,
    /// Lines of context printed before a match
    pub context_before: usize,
    /// Lines of context printed after a match
    pub context_after: usize,
    /// Directory holding serial device files; unset where there is none
    pub device_dir: Option<PathBuf>,
    /// Regex matched against device file names
    pub device_pattern: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            usb_command: None,
            usb_keywords: vec![
                "pico".to_string(),
                "rp2040".to_string(),
                "raspberry".to_string(),
            ],
            context_before: 3,
            context_after: 4,
            device_dir: default_device_dir(),
            device_pattern: default_device_pattern().to_string(),
        }
    }
}

impl InspectorConfig {
    /// The inventory command to run, falling back to the platform default.
    pub fn usb_command(&self) -> Vec<String> {
        match &self.usb_command {
            Some(command) => command.clone(),
            None => default_usb_command()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

fn default_usb_command() -> &'static [&'static str] {
    if cfg!(target_os = "macos") {
        &["system_profiler", "SPUSBDataType"]
    } else if cfg!(target_os = "windows") {
        &["pnputil", "/enum-devices", "/connected"]
    } else {
        &["lsusb"]
    }
}

fn default_device_dir() -> Option<PathBuf> {
    if cfg!(unix) {
        Some(PathBuf::from("/dev"))
    } else {
        None
    }
}

fn default_device_pattern() -> &'static str {
    if cfg!(target_os = "macos") {
        r"^cu\."
    } else {
        r"^tty(ACM|USB)\d+$"
    }
}

/// Logging section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive: "trace", "debug", "info", "warn", "error" or an
    /// `EnvFilter` expression
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    #[default]
    Pretty,
    /// Compact format
    Compact,
}
