mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;
use tiltwire_frame::{ChecksumMode, DecoderConfig, DEFAULT_MAX_BUFFER_LEN};

use crate::cmd::{Command, Context};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "tiltwire", version, about = "Roll/pitch sensor stream tool")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    /// Speak the early firmware protocol, whose frames carry no checksum.
    #[arg(long, global = true, env = "TILTWIRE_NO_CHECKSUM")]
    no_checksum: bool,

    /// Maximum bytes buffered while waiting for a terminator (0 = unlimited).
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_BUFFER_LEN, global = true)]
    max_buffer: usize,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            checksum: if self.no_checksum {
                ChecksumMode::Disabled
            } else {
                ChecksumMode::Enabled
            },
            max_buffer_len: self.max_buffer,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let ctx = Context {
        format: cli.format.unwrap_or_else(OutputFormat::default_for_stdout),
        decoder: cli.decoder_config(),
    };
    let result = cmd::run(cli.command, &ctx);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listen_subcommand() {
        let cli = Cli::try_parse_from([
            "tiltwire",
            "listen",
            "/dev/ttyACM0",
            "--baud",
            "9600",
            "--count",
            "5",
        ])
        .expect("listen args should parse");

        assert!(matches!(cli.command, Command::Listen(ref args) if args.baud == 9600));
        assert_eq!(cli.decoder_config(), DecoderConfig::default());
    }

    #[test]
    fn no_checksum_selects_plain_protocol() {
        let cli = Cli::try_parse_from(["tiltwire", "decode", "--no-checksum"])
            .expect("decode args should parse");

        assert_eq!(cli.decoder_config().checksum, ChecksumMode::Disabled);
    }

    #[test]
    fn encode_accepts_negative_values() {
        let cli = Cli::try_parse_from(["tiltwire", "encode", "--roll", "-12.5", "--pitch", "3"])
            .expect("encode args should parse");

        assert!(matches!(cli.command, Command::Encode(ref args) if args.roll == -12.5));
    }

    #[test]
    fn encode_requires_both_angles() {
        let err = Cli::try_parse_from(["tiltwire", "encode", "--roll", "1"])
            .expect_err("missing pitch should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
