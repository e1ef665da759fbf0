//! Mock serial port implementation for testing.
//!
//! Provides a `MockSerialPort` that stands in for the Pico without any
//! hardware. Clones share state, so a test can keep a handle while the
//! monitor owns the port and inspect it afterwards.

use super::error::PortError;
use super::traits::SerialPortAdapter;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Inner state of the mock port.
#[derive(Debug, Default)]
struct MockPortState {
    /// Queue of bytes to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// Whether the next read should time out.
    should_timeout: bool,
    /// Error kind the next read should fail with.
    read_error: Option<io::ErrorKind>,
    /// Whether the device has been "unplugged".
    disconnected: bool,
    /// Number of times `close` was called.
    close_count: usize,
    /// Timeout reported by simulated timeouts.
    timeout: Duration,
}

/// Mock serial port implementation for testing.
///
/// # Example
/// ```
/// use pico_mixer_tools::port::{MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.enqueue_read(b"{\"pot1\": 1, \"pot2\": 2, \"pot3\": 3}\n");
///
/// assert_eq!(port.bytes_to_read().unwrap(), 34);
///
/// let mut buffer = [0u8; 64];
/// let n = port.read_bytes(&mut buffer).unwrap();
/// assert_eq!(&buffer[..n], b"{\"pot1\": 1, \"pot2\": 2, \"pot3\": 3}\n");
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    /// The port name/identifier.
    name: String,
    /// Shared state.
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState {
                timeout: Duration::from_secs(1),
                ..Default::default()
            })),
        }
    }

    /// Enqueue bytes to be returned by subsequent read operations.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        self.state.lock().read_queue.extend(data);
    }

    /// Enqueue one line of text, appending the newline terminator.
    pub fn enqueue_line(&mut self, line: &str) {
        let mut state = self.state.lock();
        state.read_queue.extend(line.as_bytes());
        state.read_queue.push_back(b'\n');
    }

    /// Set whether the next read operation should time out.
    pub fn set_should_timeout(&mut self, should_timeout: bool) {
        self.state.lock().should_timeout = should_timeout;
    }

    /// Make the next read fail with an I/O error of the given kind.
    pub fn fail_next_read(&mut self, kind: io::ErrorKind) {
        self.state.lock().read_error = Some(kind);
    }

    /// Simulate the device being unplugged: polling the receive buffer fails.
    pub fn disconnect(&mut self) {
        self.state.lock().disconnected = true;
    }

    /// Number of times the port has been closed.
    pub fn close_count(&self) -> usize {
        self.state.lock().close_count
    }

    /// Get the number of bytes still queued.
    pub fn available_bytes(&self) -> usize {
        self.state.lock().read_queue.len()
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock();

        if state.should_timeout {
            state.should_timeout = false;
            return Err(PortError::timeout(state.timeout));
        }

        if let Some(kind) = state.read_error.take() {
            return Err(PortError::Io(io::Error::new(kind, "simulated read failure")));
        }

        let mut bytes_read = 0;
        for byte in buffer.iter_mut() {
            match state.read_queue.pop_front() {
                Some(queued) => {
                    *byte = queued;
                    bytes_read += 1;
                }
                None => break,
            }
        }

        if bytes_read == 0 {
            Err(PortError::Io(io::Error::new(
                io::ErrorKind::WouldBlock,
                "No data available",
            )))
        } else {
            Ok(bytes_read)
        }
    }

    fn bytes_to_read(&self) -> Result<usize, PortError> {
        let state = self.state.lock();
        if state.disconnected {
            return Err(PortError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "device disconnected",
            )));
        }
        // A pending failure must surface through a read, so report data.
        if state.should_timeout || state.read_error.is_some() {
            return Ok(state.read_queue.len().max(1));
        }
        Ok(state.read_queue.len())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn close(&mut self) -> Result<(), PortError> {
        self.state.lock().close_count += 1;
        Ok(())
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}
