//! Connection and streaming loop of the connection tester.
//!
//! The [`Monitor`] owns the port for its whole life and closes it exactly
//! once, whichever way the stream ends.

use crate::config::MonitorConfig;
use crate::port::{PortConfiguration, PortError, SerialPortAdapter, SyncSerialPort};
use crate::telemetry::{parse_line, LineOutcome};
use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Size of a single read from the port.
const READ_CHUNK: usize = 1024;

/// How the stream ended.
#[derive(Debug)]
pub enum StreamEnd {
    /// The operator pressed Ctrl+C.
    Interrupted,
    /// The port failed mid-stream.
    ConnectionLost(PortError),
}

/// Failure of a single poll.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The serial link failed; the stream cannot continue.
    #[error("{0}")]
    Connection(#[from] PortError),

    /// Writing to the terminal failed.
    #[error("Output error: {0}")]
    Output(#[from] io::Error),
}

/// Open `port_name` with the real `serialport` backend and report the result.
pub fn connect<W: Write>(
    port_name: &str,
    config: PortConfiguration,
    out: &mut W,
) -> io::Result<Option<SyncSerialPort>> {
    connect_with(port_name, config, out, SyncSerialPort::open)
}

/// Open a port through `open` and report the outcome to `out`.
///
/// A failure is reported with its cause and yields `None`; there is no retry.
pub fn connect_with<P, W, F>(
    port_name: &str,
    config: PortConfiguration,
    out: &mut W,
    open: F,
) -> io::Result<Option<P>>
where
    W: Write,
    F: FnOnce(&str, PortConfiguration) -> Result<P, PortError>,
{
    match open(port_name, config) {
        Ok(port) => {
            info!("Connected to {} at {} baud", port_name, config.baud_rate);
            writeln!(out, "✅ Connected to Pico on {}", port_name)?;
            writeln!(out, "Waiting for data...")?;
            writeln!(out)?;
            Ok(Some(port))
        }
        Err(e) => {
            warn!("Failed to open {}: {}", port_name, e);
            writeln!(out, "❌ Failed to connect to {}: {}", port_name, e)?;
            Ok(None)
        }
    }
}

/// Streaming loop over newline-delimited telemetry.
pub struct Monitor<P: SerialPortAdapter, W: Write> {
    port: Option<P>,
    out: W,
    poll_interval: Duration,
    newline_every: u64,
    max_line_len: usize,
    line_buffer: Vec<u8>,
    read_buffer: Vec<u8>,
    rendered: u64,
}

impl<P: SerialPortAdapter, W: Write> Monitor<P, W> {
    pub fn new(port: P, out: W, config: &MonitorConfig) -> Self {
        Self {
            port: Some(port),
            out,
            poll_interval: config.poll_interval(),
            newline_every: config.newline_every.max(1),
            max_line_len: config.max_line_len.max(1),
            line_buffer: Vec::new(),
            read_buffer: vec![0; READ_CHUNK],
            rendered: 0,
        }
    }

    /// Number of records rendered so far.
    pub fn rendered(&self) -> u64 {
        self.rendered
    }

    /// What has been written so far.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Whether the port has been released.
    pub fn is_closed(&self) -> bool {
        self.port.is_none()
    }

    /// Give back the output sink.
    pub fn into_output(mut self) -> W
    where
        W: Default,
    {
        self.close();
        std::mem::take(&mut self.out)
    }

    /// Poll the port once and handle every complete line that arrived.
    ///
    /// Timeouts are not errors. Does nothing once the port is closed.
    pub fn poll_once(&mut self) -> Result<(), MonitorError> {
        let Some(port) = self.port.as_mut() else {
            return Ok(());
        };

        let waiting = match port.bytes_to_read() {
            Ok(n) => n,
            Err(e) if e.is_timeout() => 0,
            Err(e) => return Err(e.into()),
        };
        if waiting == 0 {
            return Ok(());
        }

        let want = waiting.min(self.read_buffer.len());
        let n = match port.read_bytes(&mut self.read_buffer[..want]) {
            Ok(n) => n,
            Err(e) if e.is_timeout() => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        self.line_buffer.extend_from_slice(&self.read_buffer[..n]);

        self.drain_lines()?;
        Ok(())
    }

    fn drain_lines(&mut self) -> io::Result<()> {
        while let Some(pos) = memchr::memchr(b'\n', &self.line_buffer) {
            let line: Vec<u8> = self.line_buffer.drain(..=pos).collect();
            self.handle_line(&line)?;
        }

        if self.line_buffer.len() > self.max_line_len {
            warn!(
                "Flushing {} bytes without a line terminator as raw data",
                self.line_buffer.len()
            );
            let line = std::mem::take(&mut self.line_buffer);
            self.handle_line(&line)?;
        }
        Ok(())
    }

    /// Render one received line.
    pub fn handle_line(&mut self, raw: &[u8]) -> io::Result<()> {
        let text = String::from_utf8_lossy(raw);
        let line = text.trim();

        match parse_line(line) {
            LineOutcome::Reading(record) => {
                write!(self.out, "\r{}", record.status_line())?;
                self.out.flush()?;
                self.rendered += 1;
                if self.rendered % self.newline_every == 0 {
                    writeln!(self.out)?;
                }
            }
            LineOutcome::Malformed => {
                debug!("Non-JSON line: {:?}", line);
                writeln!(self.out, "Raw data received: {}", line)?;
            }
            LineOutcome::MissingField(field) => {
                debug!("Record without {}", field);
                writeln!(self.out, "Missing key in data: '{}' - Raw: {}", field, line)?;
            }
            LineOutcome::InvalidField(field) => {
                debug!("Record with bad {}", field);
                writeln!(self.out, "Invalid value for '{}' - Raw: {}", field, line)?;
            }
        }
        Ok(())
    }

    /// Release the port if it is still held. Later calls do nothing.
    pub fn close(&mut self) {
        if let Some(mut port) = self.port.take() {
            match port.close() {
                Ok(()) => info!("Closed {}", port.name()),
                Err(e) => warn!("Error while closing {}: {}", port.name(), e),
            }
        }
    }

    /// Stream until `shutdown` completes or the connection fails.
    ///
    /// `shutdown` is normally `tokio::signal::ctrl_c()`; it is checked before
    /// every idle sleep. The port is closed on every exit path.
    pub async fn run<F>(&mut self, shutdown: F) -> io::Result<StreamEnd>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        writeln!(self.out, "📊 Real-time potentiometer values:")?;
        writeln!(self.out, "   (Move your potentiometers to see values change)")?;
        writeln!(self.out, "   (Press Ctrl+C to exit)")?;
        writeln!(self.out)?;

        loop {
            match self.poll_once() {
                Ok(()) => {}
                Err(MonitorError::Connection(e)) => {
                    warn!("Connection lost: {}", e);
                    self.close();
                    writeln!(self.out, "\n❌ Connection error: {}", e)?;
                    writeln!(self.out, "Check if the Pico is still connected and try again.")?;
                    return Ok(StreamEnd::ConnectionLost(e));
                }
                Err(MonitorError::Output(e)) => {
                    self.close();
                    return Err(e);
                }
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    debug!("Interrupt received after {} record(s)", self.rendered);
                    writeln!(self.out, "\n\n👋 Disconnecting from Pico...")?;
                    self.close();
                    writeln!(self.out, "Connection closed. Goodbye!")?;
                    return Ok(StreamEnd::Interrupted);
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}

impl<P: SerialPortAdapter, W: Write> Drop for Monitor<P, W> {
    fn drop(&mut self) {
        self.close();
    }
}
