//! Pico connection tester.
//!
//! Finds the mixer's serial port, opens it and prints the potentiometer
//! readings in place until Ctrl+C.
//!
//! # Usage
//!
//! ```bash
//! pico-connection-test
//! pico-connection-test --port /dev/ttyACM0
//! ```

use clap::Parser;
use pico_mixer_tools::config::ConfigLoader;
use pico_mixer_tools::discovery::{self, PortDescriptor};
use pico_mixer_tools::monitor::{self, Monitor, StreamEnd};
use pico_mixer_tools::{logging, AppError};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Connect to the Pico audio mixer and show live potentiometer values.",
    long_about = "Discovers the mixer's serial port (or asks which one to use), opens it at 115200 baud and renders the streamed JSON readings on a single status line. Press Ctrl+C to disconnect."
)]
struct Args {
    /// Serial port to open instead of searching for one.
    #[arg(short, long)]
    port: Option<String>,

    /// Configuration file to load.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter for diagnostics on stderr (RUST_LOG takes precedence).
    #[arg(long)]
    log_level: Option<String>,
}

fn discover_ports(out: &mut impl Write) -> io::Result<Vec<PortDescriptor>> {
    match discovery::list_ports() {
        Ok(ports) => Ok(ports),
        Err(e) => {
            error!("Port enumeration failed: {}", e);
            writeln!(out, "❌ Failed to enumerate serial ports: {}", e)?;
            Ok(Vec::new())
        }
    }
}

/// Resolves once the operator interrupts; never resolves if the handler
/// cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let config = ConfigLoader::load_with(args.config.as_deref())?.into_config();
    logging::init(&config.logging, args.log_level.as_deref())?;
    debug!("Command line args: {:?}", args);

    let mut out = io::stdout();
    writeln!(out, "PC Audio Mixer - Pico Connection Test")?;
    writeln!(out, "{:=<40}", "")?;

    let requested = args.port.or_else(|| config.serial.port.clone());
    let port_name = match requested {
        Some(port) => {
            info!("Using configured port {}", port);
            Some(port)
        }
        None => {
            let ports = discover_ports(&mut out)?;
            let mut input = io::stdin().lock();
            discovery::select_port(&ports, &config.discovery, &mut input, &mut out)?
        }
    };

    let Some(port_name) = port_name else {
        writeln!(out, "No Pico found!")?;
        writeln!(out, "Exiting...")?;
        return Ok(());
    };

    let Some(port) = monitor::connect(&port_name, config.serial.port_configuration(), &mut out)?
    else {
        writeln!(out, "Exiting...")?;
        return Ok(());
    };

    let mut monitor = Monitor::new(port, out, &config.monitor);
    match monitor.run(interrupted()).await? {
        StreamEnd::Interrupted => info!("Stopped by operator"),
        StreamEnd::ConnectionLost(e) => info!("Stream ended: {}", e),
    }
    Ok(())
}
