//! USB/serial inspector.
//!
//! Prints Pico-related USB devices, every serial port with its metadata and
//! the serial device files, then exits.
//!
//! # Usage
//!
//! ```bash
//! pico-usb-debug
//! ```

use clap::Parser;
use pico_mixer_tools::config::ConfigLoader;
use pico_mixer_tools::{inspector, logging, AppError};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Check USB devices and serial ports for the Pico audio mixer.",
    long_about = "Runs the platform USB inventory utility and highlights Pico-related entries, lists every serial port with its descriptor fields, and lists serial device files. Failures of any single check are reported and the report continues."
)]
struct Args {
    /// Configuration file to load.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter for diagnostics on stderr (RUST_LOG takes precedence).
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let config = ConfigLoader::load_with(args.config.as_deref())?.into_config();
    logging::init(&config.logging, args.log_level.as_deref())?;
    debug!("Command line args: {:?}", args);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    inspector::run_report(&config.inspector, &mut out)?;
    Ok(())
}
