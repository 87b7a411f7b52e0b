//! Roll/pitch sensor stream decoding over serial links.
//!
//! tiltwire reads the text frames an orientation sensor streams over a serial
//! port, verifies them, and hands out `(roll, pitch)` records.
//!
//! # Crate Structure
//!
//! - [`transport`]: serial port configuration, opening and discovery
//! - [`frame`]: checksum, wire codec, resynchronizing decoder, record reader
//!
//! # Example
//!
//! ```
//! use tiltwire::frame::{FrameDecoder, Record};
//!
//! let mut decoder = FrameDecoder::new();
//! assert!(decoder.push(b"b1.0 2.0 E4").is_empty());
//! assert_eq!(decoder.push(b"B8\n\r"), vec![Record::new(1.0, 2.0)]);
//! ```

/// Re-export transport types.
pub mod transport {
    pub use tiltwire_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use tiltwire_frame::*;
}
