//! Core traits for serial port abstraction.
//!
//! The streaming loop only talks to [`SerialPortAdapter`], so the real
//! `serialport` backend and the in-memory mock are interchangeable.

use super::error::PortError;
use std::time::Duration;

/// Baud rate the mixer firmware uses for its USB CDC link.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Read timeout applied when opening the port.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Parameters used to open a serial port.
///
/// Framing is always 8N1 without flow control, which is what the firmware's
/// CDC endpoint reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Read timeout.
    pub timeout: Duration,
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Trait for the serial operations the connection tester needs.
pub trait SerialPortAdapter: Send + std::fmt::Debug {
    /// Read bytes from the serial port into the provided buffer.
    ///
    /// Returns the number of bytes actually read.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Number of bytes waiting in the receive buffer.
    ///
    /// An error here usually means the device went away.
    fn bytes_to_read(&self) -> Result<usize, PortError>;

    /// Get the name/path of this serial port.
    fn name(&self) -> &str;

    /// Release the port.
    ///
    /// Called once by the owner before the adapter is dropped; the OS handle
    /// itself is released on drop.
    fn close(&mut self) -> Result<(), PortError> {
        Ok(())
    }
}
