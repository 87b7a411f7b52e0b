use bytes::{Buf, BytesMut};
use serde::Serialize;

use crate::codec::{decode_next, ChecksumMode, Record, Step, START_MARKER};
use crate::error::FrameError;

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Default cap on buffered bytes while waiting for a terminator.
pub const DEFAULT_MAX_BUFFER_LEN: usize = 4 * 1024;

/// Configuration for the frame decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Protocol variant. Default: checksummed.
    pub checksum: ChecksumMode,
    /// Maximum bytes held without a terminator. Default: 4 KiB.
    ///
    /// A real frame is a few dozen bytes, so this only trips when the
    /// transmitter stops sending terminators altogether.
    pub max_buffer_len: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            checksum: ChecksumMode::default(),
            max_buffer_len: DEFAULT_MAX_BUFFER_LEN,
        }
    }
}

/// Running counters of what the decoder did with its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecodeStats {
    /// Records emitted.
    pub records: u64,
    /// Frames dropped for bad structure or non-numeric fields.
    pub malformed: u64,
    /// Frames dropped because their checksum did not match.
    pub checksum_mismatch: u64,
    /// Frames dropped because their checksum token was not hex.
    pub bad_checksum_token: u64,
    /// Terminators seen with no start marker before them.
    pub resyncs: u64,
    /// Times the buffer was trimmed for exceeding `max_buffer_len`.
    pub overflows: u64,
    /// Bytes removed without producing a record.
    pub bytes_discarded: u64,
}

impl DecodeStats {
    /// Frames that were delimited but did not yield a record.
    pub fn dropped_frames(&self) -> u64 {
        self.malformed + self.checksum_mismatch + self.bad_checksum_token
    }

    /// Account for one scan step. Returns the record, if the step produced one.
    pub(crate) fn observe(&mut self, step: Step) -> Option<Record> {
        match step {
            Step::Record { record, skipped } => {
                if skipped > 0 {
                    tracing::trace!(skipped, "skipped bytes before start marker");
                }
                self.records += 1;
                self.bytes_discarded += skipped as u64;
                Some(record)
            }
            Step::Discarded { reason, consumed } => {
                tracing::debug!(%reason, consumed, "dropped frame");
                match reason {
                    FrameError::ChecksumMismatch { .. } => self.checksum_mismatch += 1,
                    FrameError::InvalidChecksumToken(_) => self.bad_checksum_token += 1,
                    _ => self.malformed += 1,
                }
                self.bytes_discarded += consumed as u64;
                None
            }
            Step::Resync { dropped } => {
                tracing::trace!(dropped, "no start marker before terminator, resynchronizing");
                self.resyncs += 1;
                self.bytes_discarded += dropped as u64;
                None
            }
        }
    }

    /// Apply the overflow guard to `buf`.
    ///
    /// Keeps the longest suffix that fits within `max` and begins with a
    /// start marker, otherwise clears. A `max` of zero disables the guard.
    pub(crate) fn limit(&mut self, buf: &mut BytesMut, max: usize) {
        if max == 0 || buf.len() <= max {
            return;
        }

        let len = buf.len();
        let window = len - max;
        let dropped = match buf[window..].iter().position(|&b| b == START_MARKER) {
            Some(offset) => {
                buf.advance(window + offset);
                window + offset
            }
            None => {
                buf.clear();
                len
            }
        };

        tracing::warn!(
            buffered = len,
            max,
            dropped,
            "no terminator within buffer limit, discarding"
        );
        self.overflows += 1;
        self.bytes_discarded += dropped as u64;
    }
}

/// Reassembles records from bytes as they arrive.
///
/// Feed it whatever the transport produced, in order; it keeps any partial
/// frame until its terminator arrives. Malformed frames and garbage are
/// dropped silently (logged at `debug`/`trace` and counted in [`stats`]).
///
/// [`stats`]: FrameDecoder::stats
#[derive(Debug)]
pub struct FrameDecoder {
    buf: BytesMut,
    config: DecoderConfig,
    stats: DecodeStats,
}

impl FrameDecoder {
    /// Create a decoder with default configuration.
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Create a decoder with explicit configuration.
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            stats: DecodeStats::default(),
        }
    }

    /// Append `chunk` and return every record it completed, in stream order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Record> {
        let mut records = Vec::new();
        self.push_with(chunk, |record| records.push(record));
        records
    }

    /// Append `chunk`, calling `on_record` for every record it completed.
    ///
    /// Returns the number of records emitted.
    pub fn push_with<F>(&mut self, chunk: &[u8], mut on_record: F) -> usize
    where
        F: FnMut(Record),
    {
        self.buf.extend_from_slice(chunk);

        let mut emitted = 0usize;
        while let Some(step) = decode_next(&mut self.buf, self.config.checksum) {
            if let Some(record) = self.stats.observe(step) {
                on_record(record);
                emitted += 1;
            }
        }

        self.stats.limit(&mut self.buf, self.config.max_buffer_len);
        emitted
    }

    /// Drop any buffered partial frame, e.g. after the transport reconnects.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Bytes currently held waiting for a terminator.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Counters accumulated since construction.
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Current decoder configuration.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Switch protocol variant for subsequent frames.
    pub fn set_checksum_mode(&mut self, mode: ChecksumMode) {
        self.config.checksum = mode;
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}
