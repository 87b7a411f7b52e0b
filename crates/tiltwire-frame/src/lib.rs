//! Roll/pitch frame decoding for serial sensor streams.
//!
//! This is the core of tiltwire. The sensor sends one text frame per sample:
//! - A start marker byte `b`
//! - Roll and pitch as space-separated decimal numbers
//! - Optionally, a space and the CRC-16-CCITT of everything before it, in hex
//! - A two-byte `LF CR` terminator
//!
//! The link is noisy. Corrupt frames are dropped, the stream resynchronizes on
//! the next terminator, and frames split across reads are reassembled.

pub mod checksum;
pub mod codec;
pub mod decoder;
pub mod error;
#[cfg(feature = "async")]
pub mod framed;
pub mod reader;

pub use checksum::crc16_ccitt;
pub use codec::{
    decode_next, encode_frame, parse_frame, ChecksumMode, Record, Step, START_MARKER, TERMINATOR,
};
pub use decoder::{DecodeStats, DecoderConfig, FrameDecoder, DEFAULT_MAX_BUFFER_LEN};
pub use error::{FrameError, Result};
#[cfg(feature = "async")]
pub use framed::RecordCodec;
pub use reader::RecordReader;
