use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::checksum::crc16_ccitt;
use crate::error::{FrameError, Result};

/// Byte that opens every frame.
pub const START_MARKER: u8 = b'b';

/// Frame terminator: LF followed by CR.
pub const TERMINATOR: [u8; 2] = [b'\n', b'\r'];

/// One decoded orientation sample, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub roll: f64,
    pub pitch: f64,
}

impl Record {
    /// Create a new record.
    pub fn new(roll: f64, pitch: f64) -> Self {
        Self { roll, pitch }
    }
}

/// Which protocol variant the transmitter speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumMode {
    /// Frames end with a hex CRC-16-CCITT token. Current firmware.
    #[default]
    Enabled,
    /// Frames carry only roll and pitch. Early firmware.
    Disabled,
}

impl ChecksumMode {
    pub fn is_enabled(self) -> bool {
        self == ChecksumMode::Enabled
    }
}

/// Outcome of one scan over the buffer.
#[derive(Debug)]
pub enum Step {
    /// A frame decoded. `skipped` bytes of garbage preceded its start marker.
    Record { record: Record, skipped: usize },
    /// A delimited frame failed validation. `consumed` bytes were removed.
    Discarded { reason: FrameError, consumed: usize },
    /// No start marker preceded the terminator. `dropped` bytes were removed.
    Resync { dropped: usize },
}

/// Encode a record into the wire format.
///
/// Wire format:
/// ```text
/// b<roll> <pitch>[ <CRC16 hex>]\n\r
/// ```
/// The checksum covers everything from `b` through the pitch field.
pub fn encode_frame(record: &Record, mode: ChecksumMode, dst: &mut BytesMut) {
    let data = format!("b{} {}", record.roll, record.pitch);
    dst.reserve(data.len() + 5 + TERMINATOR.len());
    dst.put_slice(data.as_bytes());
    if mode.is_enabled() {
        let crc = crc16_ccitt(data.as_bytes());
        dst.put_slice(format!(" {crc:04X}").as_bytes());
    }
    dst.put_slice(&TERMINATOR);
}

/// Run one scan over `src`.
///
/// Returns `None` when `src` holds no terminator, leaving it untouched so a
/// partial frame can complete on the next read. Otherwise removes at least
/// the bytes up to and including the first terminator.
///
/// The start marker is only searched for before the terminator. When there is
/// none, everything through the terminator is garbage; if no marker exists in
/// the rest of the buffer either, the whole buffer is cleared, since nothing
/// in it can begin a frame.
pub fn decode_next(src: &mut BytesMut, mode: ChecksumMode) -> Option<Step> {
    let term = find_terminator(src)?;
    let end = term + TERMINATOR.len();

    match src[..term].iter().position(|&b| b == START_MARKER) {
        Some(start) => {
            let consumed = src.split_to(end);
            let step = match parse_frame(&consumed[start..], mode) {
                Ok(record) => Step::Record {
                    record,
                    skipped: start,
                },
                Err(reason) => Step::Discarded {
                    reason,
                    consumed: consumed.len(),
                },
            };
            Some(step)
        }
        None => {
            let dropped = if src[end..].contains(&START_MARKER) {
                src.advance(end);
                end
            } else {
                let len = src.len();
                src.clear();
                len
            };
            Some(Step::Resync { dropped })
        }
    }
}

/// Validate and parse one delimited frame, start marker through terminator.
pub fn parse_frame(frame: &[u8], mode: ChecksumMode) -> Result<Record> {
    let body = std::str::from_utf8(frame.trim_ascii()).map_err(|_| FrameError::NotUtf8)?;

    let data = match mode {
        ChecksumMode::Enabled => {
            let (data, token) = body.rsplit_once(' ').ok_or(FrameError::MissingChecksum)?;
            let expected = parse_checksum_token(token)?;
            let actual = crc16_ccitt(data.as_bytes());
            if expected != actual {
                return Err(FrameError::ChecksumMismatch { expected, actual });
            }
            data
        }
        ChecksumMode::Disabled => body,
    };

    let mut fields = data.split(' ');
    let (Some(roll), Some(pitch), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(FrameError::FieldCount {
            found: data.split(' ').count(),
        });
    };

    let roll = roll
        .strip_prefix(START_MARKER as char)
        .ok_or_else(|| FrameError::InvalidNumber(roll.to_string()))?;
    Ok(Record {
        roll: parse_number(roll)?,
        pitch: parse_number(pitch)?,
    })
}

fn parse_number(field: &str) -> Result<f64> {
    field
        .parse::<f64>()
        .map_err(|_| FrameError::InvalidNumber(field.to_string()))
}

fn parse_checksum_token(token: &str) -> Result<u16> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u16::from_str_radix(digits, 16).map_err(|_| FrameError::InvalidChecksumToken(token.to_string()))
}

fn find_terminator(src: &[u8]) -> Option<usize> {
    src.windows(TERMINATOR.len())
        .position(|window| window == TERMINATOR)
}
