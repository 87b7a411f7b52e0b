use std::io::{Read, Write};

use crate::config::SerialConfig;
use crate::error::{Result, TransportError};

/// An opened serial port implementing `Read` and `Write`.
///
/// Reads block for at most the configured read timeout and then fail with
/// `ErrorKind::TimedOut`, which callers treat as "no bytes available yet".
pub struct SerialStream {
    inner: Box<dyn serialport::SerialPort>,
    port: String,
}

impl SerialStream {
    /// Open a port with the given line settings.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let inner = config.builder().open().map_err(|source| TransportError::Open {
            port: config.port.clone(),
            source,
        })?;

        tracing::info!(
            port = %config.port,
            baud_rate = config.baud_rate,
            "serial port opened"
        );

        Ok(Self {
            inner,
            port: config.port.clone(),
        })
    }
}

impl Read for SerialStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for SerialStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl Drop for SerialStream {
    fn drop(&mut self) {
        tracing::info!(port = %self.port, "serial port closed");
    }
}

impl std::fmt::Debug for SerialStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialStream")
            .field("port", &self.port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_port_reports_port_name() {
        let cfg = SerialConfig::new("/dev/tiltwire-does-not-exist");
        let err = SerialStream::open(&cfg).unwrap_err();

        assert!(matches!(&err, TransportError::Open { port, .. } if port == "/dev/tiltwire-does-not-exist"));
        assert!(err.to_string().contains("/dev/tiltwire-does-not-exist"));
    }
}
