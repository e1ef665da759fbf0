//! Serial port listing with full descriptor details.

use crate::discovery::{list_ports, PortDescriptor};
use std::io::{self, Write};
use tracing::warn;

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("n/a")
}

fn usb_ids(port: &PortDescriptor) -> String {
    match (port.vid, port.pid) {
        (Some(vid), Some(pid)) => format!("{:04x}:{:04x}", vid, pid),
        _ => "n/a".to_string(),
    }
}

/// Print every descriptor field of every port.
pub fn write_port_details<W: Write>(ports: &[PortDescriptor], out: &mut W) -> io::Result<()> {
    if ports.is_empty() {
        writeln!(out, "❌ No serial ports found")?;
        return Ok(());
    }

    for port in ports {
        writeln!(out, "📍 Port: {}", port.device)?;
        writeln!(out, "   Description: {}", port.description_or_na())?;
        writeln!(out, "   Manufacturer: {}", or_na(port.manufacturer.as_deref()))?;
        writeln!(out, "   VID:PID: {}", usb_ids(port))?;
        writeln!(out, "   Serial Number: {}", or_na(port.serial_number.as_deref()))?;
        writeln!(out)?;
    }
    Ok(())
}

/// Enumerate the ports and print them; an enumeration error is reported.
pub fn report_serial_ports<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "🔌 Available serial ports:")?;

    match list_ports() {
        Ok(ports) => write_port_details(&ports, out),
        Err(e) => {
            warn!("Port enumeration failed: {}", e);
            writeln!(out, "❌ Failed to enumerate serial ports: {}", e)
        }
    }
}
