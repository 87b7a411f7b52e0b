//! Minimal serial monitor: prints every record a sensor sends.
//!
//! Run with:
//!   cargo run --example serial-monitor -- /dev/ttyACM0
//!
//! Without hardware, use a pty pair:
//!   socat -d -d pty,raw,echo=0 pty,raw,echo=0
//!   cargo run --features cli -- encode --roll 1.5 --pitch -3 --repeat 10 > /dev/pts/N

use tiltwire::frame::{DecoderConfig, FrameError, RecordReader};
use tiltwire::transport::{SerialConfig, DEFAULT_PORT};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_PORT.to_string());

    let mut reader = RecordReader::open(&SerialConfig::new(&port), DecoderConfig::default())?;
    eprintln!("Listening on {port}");

    loop {
        match reader.poll() {
            Ok(records) => {
                for record in records {
                    println!("roll={:>8.2} pitch={:>8.2}", record.roll, record.pitch);
                }
            }
            Err(FrameError::ConnectionClosed) => break,
            Err(e) => {
                eprintln!("Port error: {e}");
                break;
            }
        }
    }

    let stats = reader.decoder().stats();
    eprintln!(
        "{} records, {} dropped frames, {} resyncs",
        stats.records,
        stats.dropped_frames(),
        stats.resyncs
    );
    Ok(())
}
