use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, StopBits};

/// Port the sensor board enumerates as on Linux (CDC-ACM).
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

/// Line rate of the sensor firmware.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// How long a read waits for bytes before reporting "nothing yet".
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Serial line settings.
///
/// Defaults to 115200 8N1 without flow control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Device path or name (e.g. `/dev/ttyACM0`, `COM3`).
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    /// Read timeout. Reads that see no data within this window return
    /// `ErrorKind::TimedOut`.
    pub read_timeout: Duration,
}

impl SerialConfig {
    /// Default line settings on the given port.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Self::default()
        }
    }

    /// Override the baud rate.
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Override the read timeout.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub(crate) fn builder(&self) -> serialport::SerialPortBuilder {
        serialport::new(&self.port, self.baud_rate)
            .data_bits(self.data_bits)
            .parity(self.parity)
            .stop_bits(self.stop_bits)
            .flow_control(self.flow_control)
            .timeout(self.read_timeout)
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}
