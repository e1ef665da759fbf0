//! Port abstraction layer for serial communication.
//!
//! Provides the adapter trait, the `serialport` backed implementation and a
//! mock used by the tests.

pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::PortError;
pub use mock::MockSerialPort;
pub use sync_port::SyncSerialPort;
pub use traits::*;
