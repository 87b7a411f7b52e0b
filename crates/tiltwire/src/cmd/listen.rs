use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tiltwire_frame::{DecodeStats, RecordReader};
use tiltwire_transport::SerialConfig;

use crate::cmd::{Context, ListenArgs};
use crate::exit::{frame_error, CliError, CliResult, SUCCESS, TIMEOUT, USAGE};
use crate::output::print_record;

pub fn run(args: ListenArgs, ctx: &Context) -> CliResult<i32> {
    let idle_timeout = args.idle_timeout.as_deref().map(parse_duration).transpose()?;

    let serial = SerialConfig::new(&args.port).with_baud_rate(args.baud);
    let mut reader = RecordReader::open(&serial, ctx.decoder.clone())
        .map_err(|err| frame_error("open failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;
    let mut last_record = Instant::now();

    while running.load(Ordering::SeqCst) {
        let records = reader
            .poll()
            .map_err(|err| frame_error("receive failed", err))?;

        if records.is_empty() {
            if let Some(timeout) = idle_timeout {
                if last_record.elapsed() >= timeout {
                    log_stats(reader.decoder().stats());
                    return Err(CliError::new(
                        TIMEOUT,
                        format!("no records from {} within {timeout:?}", args.port),
                    ));
                }
            }
            continue;
        }
        last_record = Instant::now();

        for record in records {
            print_record(&record, &args.port, ctx.format);
            printed = printed.saturating_add(1);

            if let Some(count) = args.count {
                if printed >= count {
                    log_stats(reader.decoder().stats());
                    return Ok(SUCCESS);
                }
            }
        }
    }

    log_stats(reader.decoder().stats());
    Ok(SUCCESS)
}

fn log_stats(stats: &DecodeStats) {
    tracing::info!(
        records = stats.records,
        dropped = stats.dropped_frames(),
        resyncs = stats.resyncs,
        bytes_discarded = stats.bytes_discarded,
        "listen finished"
    );
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert_eq!(parse_duration("0s").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("bad").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("  ").unwrap_err().code, USAGE);
    }
}
