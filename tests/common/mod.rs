//! Shared test utilities.
//!
//! - Mock port creation with queued telemetry lines
//! - Port descriptor builders
//! - Output helpers for monitors writing into a `Vec<u8>`

#![allow(dead_code)]

use pico_mixer_tools::config::MonitorConfig;
use pico_mixer_tools::discovery::PortDescriptor;
use pico_mixer_tools::monitor::Monitor;
use pico_mixer_tools::port::MockSerialPort;

/// A telemetry line as the firmware sends it, without terminator.
pub fn record_line(pot1: u16, pot2: u16, pot3: u16) -> String {
    format!(r#"{{"pot1":{},"pot2":{},"pot3":{}}}"#, pot1, pot2, pot3)
}

/// Create a mock port with the given lines queued for reading.
pub fn mock_port_with_lines(port_name: &str, lines: &[&str]) -> MockSerialPort {
    let mut mock = MockSerialPort::new(port_name);
    for line in lines {
        mock.enqueue_line(line);
    }
    mock
}

/// A monitor writing into memory with the default settings.
pub fn memory_monitor(port: MockSerialPort) -> Monitor<MockSerialPort, Vec<u8>> {
    Monitor::new(port, Vec::new(), &MonitorConfig::default())
}

/// Poll until the mock has nothing left to read.
pub fn drain(monitor: &mut Monitor<MockSerialPort, Vec<u8>>, port: &MockSerialPort) {
    while port.available_bytes() > 0 {
        monitor.poll_once().expect("poll failed");
    }
}

/// Everything the monitor printed so far.
pub fn printed(monitor: &Monitor<MockSerialPort, Vec<u8>>) -> String {
    String::from_utf8_lossy(monitor.output()).into_owned()
}

/// USB descriptor as a Pico running the mixer firmware reports it.
pub fn pico_descriptor(device: &str) -> PortDescriptor {
    let mut port = PortDescriptor::new(device)
        .with_description("Pico")
        .with_usb_ids(0x2E8A, 0x000A);
    port.manufacturer = Some("Raspberry Pi".to_string());
    port.product = Some("Pico".to_string());
    port
}

/// A port that discovery must never pick on its own.
pub fn plain_descriptor(device: &str, description: &str) -> PortDescriptor {
    PortDescriptor::new(device)
        .with_description(description)
        .with_usb_ids(0x0403, 0x6001)
}
