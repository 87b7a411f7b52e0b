use std::fs::File;
use std::io::Read;

use tiltwire_frame::{FrameError, RecordReader};

use crate::cmd::{Context, DecodeArgs};
use crate::exit::{frame_error, io_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_record, print_stats};

pub fn run(args: DecodeArgs, ctx: &Context) -> CliResult<i32> {
    let (source, name): (Box<dyn Read>, String) = match &args.file {
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            (Box::new(file), path.display().to_string())
        }
        None => (Box::new(std::io::stdin()), "stdin".to_string()),
    };

    let mut reader = RecordReader::with_config(source, ctx.decoder.clone());
    loop {
        match reader.poll() {
            Ok(records) => {
                for record in &records {
                    print_record(record, &name, ctx.format);
                }
            }
            Err(FrameError::ConnectionClosed) => break,
            Err(err) => return Err(frame_error("read failed", err)),
        }
    }

    let stats = *reader.decoder().stats();
    let trailing = reader.decoder().buffered().len();
    tracing::info!(
        source = %name,
        records = stats.records,
        dropped = stats.dropped_frames(),
        resyncs = stats.resyncs,
        trailing,
        "decode finished"
    );

    if args.summary {
        print_stats(&stats, ctx.format);
    }

    if args.strict && (stats.dropped_frames() > 0 || stats.bytes_discarded > 0 || trailing > 0) {
        return Ok(DATA_INVALID);
    }
    Ok(SUCCESS)
}
