use bytes::BytesMut;
use tiltwire_frame::{encode_frame, ChecksumMode, Record};

use crate::cmd::{Context, EncodeArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::print_raw;

pub fn run(args: EncodeArgs, ctx: &Context) -> CliResult<i32> {
    let record = Record::new(args.roll, args.pitch);
    let wire = encode_repeated(&record, ctx.decoder.checksum, args.repeat);
    tracing::debug!(bytes = wire.len(), frames = args.repeat, "encoded frames");
    print_raw(&wire);
    Ok(SUCCESS)
}

fn encode_repeated(record: &Record, mode: ChecksumMode, repeat: usize) -> BytesMut {
    let mut wire = BytesMut::new();
    for _ in 0..repeat {
        encode_frame(record, mode, &mut wire);
    }
    wire
}

#[cfg(test)]
mod tests {
    use tiltwire_frame::FrameDecoder;

    use super::*;

    #[test]
    fn repeated_frames_decode_back() {
        let record = Record::new(22.5, -7.75);
        let wire = encode_repeated(&record, ChecksumMode::Enabled, 3);

        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.push(&wire), vec![record; 3]);
    }

    #[test]
    fn zero_repeat_writes_nothing() {
        let wire = encode_repeated(&Record::new(1.0, 1.0), ChecksumMode::Disabled, 0);
        assert!(wire.is_empty());
    }
}
