use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_next, encode_frame, Record};
use crate::decoder::{DecodeStats, DecoderConfig};
use crate::error::FrameError;

/// `tokio_util` codec for the roll/pitch wire format.
///
/// Decodes with the same scan and resynchronization rules as
/// [`FrameDecoder`](crate::FrameDecoder), but over the buffer owned by
/// `FramedRead`.
#[derive(Debug, Default)]
pub struct RecordCodec {
    config: DecoderConfig,
    stats: DecodeStats,
}

impl RecordCodec {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            stats: DecodeStats::default(),
        }
    }

    /// Counters accumulated since construction.
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }
}

impl Decoder for RecordCodec {
    type Item = Record;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Record>, FrameError> {
        while let Some(step) = decode_next(src, self.config.checksum) {
            if let Some(record) = self.stats.observe(step) {
                return Ok(Some(record));
            }
        }
        self.stats.limit(src, self.config.max_buffer_len);
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Record>, FrameError> {
        if let Some(record) = self.decode(src)? {
            return Ok(Some(record));
        }
        if !src.is_empty() {
            tracing::debug!(bytes = src.len(), "dropping unterminated frame at end of stream");
            self.stats.bytes_discarded += src.len() as u64;
            src.clear();
        }
        Ok(None)
    }
}

impl Encoder<Record> for RecordCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Record, dst: &mut BytesMut) -> Result<(), FrameError> {
        encode_frame(&item, self.config.checksum, dst);
        Ok(())
    }
}
