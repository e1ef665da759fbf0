//! Serial port discovery.
//!
//! [`find_candidate`] is a pure scan over a port list; [`select_port`] adds
//! the interactive fallback and is generic over its input and output so it
//! can be driven from tests.

use crate::config::DiscoveryConfig;
use serialport::{SerialPortInfo, SerialPortType};
use std::fmt;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// OS-reported metadata for one serial device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortDescriptor {
    /// Device path or name (`/dev/ttyACM0`, `COM3`).
    pub device: String,
    /// Human-readable description.
    pub description: Option<String>,
    /// Manufacturer string.
    pub manufacturer: Option<String>,
    /// Product string.
    pub product: Option<String>,
    /// USB vendor ID.
    pub vid: Option<u16>,
    /// USB product ID.
    pub pid: Option<u16>,
    /// Serial number string.
    pub serial_number: Option<String>,
}

impl PortDescriptor {
    /// A descriptor with only a device path, as for a plain UART.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the USB vendor/product ID pair.
    pub fn with_usb_ids(mut self, vid: u16, pid: u16) -> Self {
        self.vid = Some(vid);
        self.pid = Some(pid);
        self
    }

    /// Description text, or `n/a` when the driver reports none.
    pub fn description_or_na(&self) -> &str {
        self.description.as_deref().unwrap_or("n/a")
    }
}

impl From<SerialPortInfo> for PortDescriptor {
    fn from(info: SerialPortInfo) -> Self {
        let mut descriptor = PortDescriptor::new(info.port_name);
        match info.port_type {
            SerialPortType::UsbPort(usb) => {
                descriptor.description = usb.product.clone();
                descriptor.manufacturer = usb.manufacturer;
                descriptor.product = usb.product;
                descriptor.vid = Some(usb.vid);
                descriptor.pid = Some(usb.pid);
                descriptor.serial_number = usb.serial_number;
            }
            SerialPortType::BluetoothPort => {
                descriptor.description = Some("Bluetooth serial port".to_string());
            }
            SerialPortType::PciPort => {
                descriptor.description = Some("PCI serial port".to_string());
            }
            SerialPortType::Unknown => {}
        }
        descriptor
    }
}

impl fmt::Display for PortDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.device, self.description_or_na())
    }
}

/// Enumerate the serial ports currently known to the OS.
pub fn list_ports() -> Result<Vec<PortDescriptor>, serialport::Error> {
    let ports = serialport::available_ports()?;
    debug!("Enumerated {} serial port(s)", ports.len());
    Ok(ports.into_iter().map(PortDescriptor::from).collect())
}

/// Why a port was picked automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    /// The description contains a known keyword.
    Keyword,
    /// The device path contains a known pattern.
    DevicePath,
    /// The USB vendor ID is a known one.
    VendorId,
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    needles
        .iter()
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}

/// Pick a port without asking anyone.
///
/// The whole list is scanned for a description keyword first, then for a
/// device-path pattern, then for a known vendor ID; within each pass the
/// first port in list order wins.
pub fn find_candidate<'a>(
    ports: &'a [PortDescriptor],
    config: &DiscoveryConfig,
) -> Option<(&'a PortDescriptor, MatchReason)> {
    let by_keyword = ports.iter().find(|port| {
        port.description
            .as_deref()
            .is_some_and(|desc| contains_any(desc, &config.keywords))
    });
    if let Some(port) = by_keyword {
        return Some((port, MatchReason::Keyword));
    }

    if let Some(port) = ports
        .iter()
        .find(|port| contains_any(&port.device, &config.path_patterns))
    {
        return Some((port, MatchReason::DevicePath));
    }

    ports
        .iter()
        .find(|port| port.vid.is_some_and(|vid| config.vendor_ids.contains(&vid)))
        .map(|port| (port, MatchReason::VendorId))
}

/// Outcome of reading the operator's choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// A valid index into the port list.
    Index(usize),
    /// `q`, or end of input.
    Cancelled,
    /// Not a number, or out of range.
    Invalid,
}

/// Interpret one line typed at the port prompt.
pub fn parse_selection(input: &str, port_count: usize) -> Selection {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Selection::Cancelled;
    }
    match input.parse::<usize>() {
        Ok(index) if index < port_count => Selection::Index(index),
        _ => Selection::Invalid,
    }
}

/// Find the Pico's port, asking the operator when nothing matches.
///
/// Progress and the prompt are written to `out`; the answer is read from
/// `input`. Returns the chosen device path.
pub fn select_port<R: BufRead, W: Write>(
    ports: &[PortDescriptor],
    config: &DiscoveryConfig,
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<String>> {
    writeln!(out, "Searching for Pico device...")?;

    if let Some((port, reason)) = find_candidate(ports, config) {
        debug!("Matched {} by {:?}", port.device, reason);
        match reason {
            MatchReason::Keyword => writeln!(out, "Found Pico: {}", port)?,
            MatchReason::DevicePath => writeln!(out, "Found USB modem device: {}", port)?,
            MatchReason::VendorId => writeln!(out, "Found Raspberry Pi USB device: {}", port)?,
        }
        return Ok(Some(port.device.clone()));
    }

    if ports.is_empty() {
        writeln!(out, "No serial ports found!")?;
        return Ok(None);
    }

    writeln!(out)?;
    writeln!(out, "Available ports:")?;
    for (index, port) in ports.iter().enumerate() {
        writeln!(out, "  {}: {}", index, port)?;
    }

    write!(out, "\nEnter port number (or 'q' to quit): ")?;
    out.flush()?;

    let mut line = String::new();
    let selection = if input.read_line(&mut line)? == 0 {
        // EOF: nobody is there to answer.
        writeln!(out)?;
        Selection::Cancelled
    } else {
        parse_selection(&line, ports.len())
    };

    match selection {
        Selection::Index(index) => Ok(Some(ports[index].device.clone())),
        Selection::Cancelled => Ok(None),
        Selection::Invalid => {
            writeln!(out, "Invalid selection")?;
            Ok(None)
        }
    }
}
