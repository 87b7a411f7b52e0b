//! Serial transport for tiltwire sensor streams.
//!
//! Provides the byte source the frame decoder reads from:
//! - [`SerialConfig`] with the line settings the sensor firmware expects
//! - [`SerialStream`], an opened port implementing `Read + Write`
//! - [`available_ports`] for port discovery
//!
//! This is the lowest layer of tiltwire. It knows nothing about frames.

pub mod config;
pub mod error;
pub mod ports;
pub mod stream;

pub use serialport;

pub use config::{SerialConfig, DEFAULT_BAUD_RATE, DEFAULT_PORT, DEFAULT_READ_TIMEOUT};
pub use error::{Result, TransportError};
pub use ports::{available_ports, PortInfo, PortKind};
pub use stream::SerialStream;
