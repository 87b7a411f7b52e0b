/// Errors that can occur in serial transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the specified port.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// Failed to list the serial ports on this host.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(serialport::Error),
}

impl TransportError {
    /// Whether the port exists but this user may not open it.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            TransportError::Open { source, .. } => {
                source.kind() == serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied)
            }
            TransportError::Enumerate(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
