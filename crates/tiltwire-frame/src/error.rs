/// Errors that can occur while decoding frames or reading them from a stream.
///
/// The frame-level variants describe why a frame was dropped. The decoder
/// logs and counts them but never hands them to its caller; only the
/// stream-level variants escape from [`RecordReader`](crate::RecordReader).
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame body is not valid UTF-8 text.
    #[error("frame is not valid UTF-8")]
    NotUtf8,

    /// A checksummed frame has no separator before the checksum token.
    #[error("frame has no checksum field")]
    MissingChecksum,

    /// The payload does not split into exactly roll and pitch.
    #[error("expected 2 fields, found {found}")]
    FieldCount { found: usize },

    /// A roll or pitch field is not a decimal number.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    /// The checksum token is not a 16-bit hexadecimal value.
    #[error("invalid checksum token {0:?}")]
    InvalidChecksumToken(String),

    /// The checksum carried by the frame does not match its data.
    #[error("checksum mismatch (frame {expected:#06x}, computed {actual:#06x})")]
    ChecksumMismatch { expected: u16, actual: u16 },

    /// An I/O error occurred while reading from the stream.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport could not be opened or configured.
    #[error(transparent)]
    Transport(#[from] tiltwire_transport::TransportError),

    /// The stream reached end of file.
    #[error("connection closed")]
    ConnectionClosed,
}

impl FrameError {
    /// Whether this error describes a dropped frame rather than a stream failure.
    pub fn is_frame_level(&self) -> bool {
        !matches!(
            self,
            FrameError::Io(_) | FrameError::Transport(_) | FrameError::ConnectionClosed
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
