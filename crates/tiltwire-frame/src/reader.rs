use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use tiltwire_transport::{SerialConfig, SerialStream};

use crate::codec::Record;
use crate::decoder::{DecoderConfig, FrameDecoder};
use crate::error::{FrameError, Result};

const READ_CHUNK_SIZE: usize = 1024;

/// Reads records from any `Read` stream.
///
/// Each [`poll`](RecordReader::poll) performs one read of whatever the
/// stream has available. A read that times out or would block is not an
/// error; it just yields no records.
pub struct RecordReader<T> {
    inner: T,
    decoder: FrameDecoder,
    pending: VecDeque<Record>,
}

impl<T: Read> RecordReader<T> {
    /// Create a new record reader with default decoder configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, DecoderConfig::default())
    }

    /// Create a new record reader with explicit decoder configuration.
    pub fn with_config(inner: T, config: DecoderConfig) -> Self {
        Self {
            inner,
            decoder: FrameDecoder::with_config(config),
            pending: VecDeque::new(),
        }
    }

    /// Read once and return the records completed by that read.
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn poll(&mut self) -> Result<Vec<Record>> {
        if self.pending.is_empty() {
            self.fill()?;
        }
        Ok(self.pending.drain(..).collect())
    }

    /// Read the next record, polling until one arrives.
    pub fn read_record(&mut self) -> Result<Record> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Ok(record);
            }
            self.fill()?;
        }
    }

    fn fill(&mut self) -> Result<usize> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let read = loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Ok(0)
                }
                Err(err) => return Err(FrameError::Io(err)),
            }
        };

        let pending = &mut self.pending;
        Ok(self
            .decoder
            .push_with(&chunk[..read], |record| pending.push_back(record)))
    }

    /// The decoder, for stats and buffered bytes.
    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    /// Mutably borrow the decoder.
    pub fn decoder_mut(&mut self) -> &mut FrameDecoder {
        &mut self.decoder
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl RecordReader<SerialStream> {
    /// Open a serial port and wrap it in a record reader.
    pub fn open(serial: &SerialConfig, config: DecoderConfig) -> Result<Self> {
        let stream = SerialStream::open(serial)?;
        Ok(Self::with_config(stream, config))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;

    use super::*;
    use crate::codec::{encode_frame, ChecksumMode};

    fn wire(records: &[Record]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        for record in records {
            encode_frame(record, ChecksumMode::Enabled, &mut buf);
        }
        buf.to_vec()
    }

    #[test]
    fn read_single_record() {
        let mut reader = RecordReader::new(Cursor::new(wire(&[Record::new(1.5, -2.5)])));
        let record = reader.read_record().unwrap();

        assert_eq!(record, Record::new(1.5, -2.5));
    }

    #[test]
    fn read_multiple_records_from_one_read() {
        let originals = [
            Record::new(1.0, 2.0),
            Record::new(3.0, 4.0),
            Record::new(5.0, 6.0),
        ];
        let mut reader = RecordReader::new(Cursor::new(wire(&originals)));

        let r1 = reader.read_record().unwrap();
        let r2 = reader.read_record().unwrap();
        let r3 = reader.read_record().unwrap();

        assert_eq!([r1, r2, r3], originals);
    }

    #[test]
    fn poll_returns_whole_batch() {
        let originals = [Record::new(1.0, 2.0), Record::new(3.0, 4.0)];
        let mut reader = RecordReader::new(Cursor::new(wire(&originals)));

        assert_eq!(reader.poll().unwrap(), originals.to_vec());
        assert!(matches!(reader.poll(), Err(FrameError::ConnectionClosed)));
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: wire(&[Record::new(-10.0, 10.0)]),
            pos: 0,
        };
        let mut reader = RecordReader::new(byte_reader);

        let record = reader.read_record().unwrap();
        assert_eq!(record, Record::new(-10.0, 10.0));
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = RecordReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_frame() {
        let mut reader = RecordReader::new(Cursor::new(b"b1.0 2.0 E4".to_vec()));
        let err = reader.read_record().unwrap_err();

        assert!(matches!(err, FrameError::ConnectionClosed));
        assert_eq!(reader.decoder().buffered(), b"b1.0 2.0 E4");
    }

    #[test]
    fn corrupt_frames_do_not_surface_as_errors() {
        let mut bytes = b"garbage\n\rb1.0 2.0 0000\n\r".to_vec();
        bytes.extend(wire(&[Record::new(9.0, 9.0)]));
        let mut reader = RecordReader::new(Cursor::new(bytes));

        assert_eq!(reader.read_record().unwrap(), Record::new(9.0, 9.0));
        assert_eq!(reader.decoder().stats().checksum_mismatch, 1);
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            if buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn timeout_yields_empty_poll() {
        let reader = StallThenData {
            stalls: 2,
            kind: ErrorKind::TimedOut,
            bytes: wire(&[Record::new(7.0, 8.0)]),
            pos: 0,
        };
        let mut framed = RecordReader::new(reader);

        assert!(framed.poll().unwrap().is_empty());
        assert!(framed.poll().unwrap().is_empty());
        assert_eq!(framed.poll().unwrap(), vec![Record::new(7.0, 8.0)]);
    }

    #[test]
    fn would_block_is_retried_by_read_record() {
        let reader = StallThenData {
            stalls: 3,
            kind: ErrorKind::WouldBlock,
            bytes: wire(&[Record::new(1.0, 1.0)]),
            pos: 0,
        };
        let mut framed = RecordReader::new(reader);

        assert_eq!(framed.read_record().unwrap(), Record::new(1.0, 1.0));
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = StallThenData {
            stalls: 1,
            kind: ErrorKind::Interrupted,
            bytes: wire(&[Record::new(8.0, 8.0)]),
            pos: 0,
        };
        let mut framed = RecordReader::new(reader);

        assert_eq!(framed.poll().unwrap(), vec![Record::new(8.0, 8.0)]);
    }

    #[test]
    fn other_io_errors_propagate() {
        let reader = StallThenData {
            stalls: 1,
            kind: ErrorKind::BrokenPipe,
            bytes: Vec::new(),
            pos: 0,
        };
        let mut framed = RecordReader::new(reader);

        let err = framed.poll().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    struct StallThenData {
        stalls: usize,
        kind: ErrorKind,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for StallThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.stalls > 0 {
                self.stalls -= 1;
                return Err(std::io::Error::from(self.kind));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut reader = RecordReader::new(cursor);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        reader
            .decoder_mut()
            .set_checksum_mode(ChecksumMode::Disabled);
        assert_eq!(reader.decoder().config().checksum, ChecksumMode::Disabled);
        let _inner = reader.into_inner();
    }

    #[test]
    fn open_missing_serial_port_fails() {
        let serial = SerialConfig::new("/dev/tiltwire-does-not-exist");
        let result = RecordReader::open(&serial, DecoderConfig::default());
        assert!(matches!(result, Err(FrameError::Transport(_))));
    }
}
