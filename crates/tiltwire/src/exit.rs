use std::fmt;
use std::io;

use tiltwire_frame::FrameError;
use tiltwire_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    let code = if err.is_permission_denied() {
        PERMISSION_DENIED
    } else {
        TRANSPORT_ERROR
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::Transport(err) => transport_error(context, err),
        FrameError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        other if other.is_frame_level() => {
            CliError::new(DATA_INVALID, format!("{context}: {other}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_by_kind() {
        let err = io_error("read", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.code, PERMISSION_DENIED);
        assert!(err.message.starts_with("read: "));

        let err = io_error("read", io::Error::from(io::ErrorKind::TimedOut));
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn transport_errors_map_to_exit_codes() {
        let err = transport_error(
            "open failed",
            TransportError::Open {
                port: "/dev/tiltwire-missing".to_string(),
                source: tiltwire_transport::serialport::Error::new(
                    tiltwire_transport::serialport::ErrorKind::NoDevice,
                    "No such device",
                ),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert!(err.message.starts_with("open failed: "));
        assert!(err.message.contains("/dev/tiltwire-missing"));
    }

    #[test]
    fn frame_errors_map_to_exit_codes() {
        assert_eq!(
            frame_error("read", FrameError::ConnectionClosed).code,
            FAILURE
        );
        assert_eq!(
            frame_error("read", FrameError::MissingChecksum).code,
            DATA_INVALID
        );
        assert_eq!(
            frame_error("read", FrameError::Io(io::Error::other("boom"))).code,
            INTERNAL
        );
    }
}
