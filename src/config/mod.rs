//! Configuration module for the Pico mixer tools.
//!
//! TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! 1. `--config <PATH>` on the command line
//! 2. `PICO_MIXER_CONFIG` environment variable (explicit path)
//! 3. `./pico-mixer.toml` (current directory)
//! 4. `<platform config dir>/pico-mixer/config.toml`
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! The pattern is `PICO_MIXER_<SECTION>_<KEY>`:
//! - `PICO_MIXER_SERIAL_PORT=/dev/ttyACM0`
//! - `PICO_MIXER_SERIAL_BAUD_RATE=115200`
//! - `PICO_MIXER_SERIAL_TIMEOUT_MS=1000`
//! - `PICO_MIXER_MONITOR_POLL_INTERVAL_MS=10`
//! - `PICO_MIXER_MONITOR_NEWLINE_EVERY=20`
//! - `PICO_MIXER_LOG_LEVEL=debug`
//!
//! # Example
//!
//! ```rust,no_run
//! use pico_mixer_tools::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load()?;
//! println!("Baud rate: {}", loader.config().serial.baud_rate);
//! # Ok::<(), pico_mixer_tools::config::ConfigError>(())
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    get_default_config_dir, get_default_config_path, resolve_config_path, ConfigLoader,
};
pub use schema::{
    Config, DiscoveryConfig, InspectorConfig, LogFormat, LoggingConfig, MonitorConfig,
    SerialConfig, RASPBERRY_PI_VID,
};
