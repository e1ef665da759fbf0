//! The USB/serial inspector report.
//!
//! Three independent checks, each of which reports its own failures and
//! never stops the others:
//!
//! - [`usb`]: USB topology from the platform inventory utility
//! - [`ports`]: serial ports with their descriptors
//! - [`devices`]: serial device files

pub mod devices;
pub mod ports;
pub mod usb;

use crate::config::InspectorConfig;
use std::io::{self, Write};

/// Print the troubleshooting hints that close the report.
pub fn write_tips<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "💡 Troubleshooting tips:")?;
    writeln!(out, "1. If no Pico found: Check USB cable and try different port")?;
    writeln!(out, "2. If Pico found but no serial: Flash the firmware first")?;
    writeln!(out, "3. If multiple serial ports: Try each one with pico-connection-test")?;
    Ok(())
}

/// Run the full report once.
pub fn run_report<W: Write>(config: &InspectorConfig, out: &mut W) -> io::Result<()> {
    writeln!(out, "PC Audio Mixer - USB Debug Tool")?;
    writeln!(out, "{:=<40}", "")?;
    writeln!(out)?;

    usb::report_usb_devices(config, out)?;
    ports::report_serial_ports(out)?;
    devices::report_device_files(config, out)?;
    write_tips(out)
}
