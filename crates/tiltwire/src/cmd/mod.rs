use clap::{Args, Subcommand};
use std::path::PathBuf;

use tiltwire_frame::DecoderConfig;
use tiltwire_transport::DEFAULT_BAUD_RATE;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod listen;
pub mod ports;
pub mod version;

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Context {
    pub format: OutputFormat,
    pub decoder: DecoderConfig,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read a serial port and print decoded records.
    Listen(ListenArgs),
    /// Decode a captured byte stream from a file or stdin.
    Decode(DecodeArgs),
    /// Write encoded frames to stdout.
    Encode(EncodeArgs),
    /// List serial ports on this host.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, ctx: &Context) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, ctx),
        Command::Decode(args) => decode::run(args, ctx),
        Command::Encode(args) => encode::run(args, ctx),
        Command::Ports(args) => ports::run(args, ctx),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Serial port to open (e.g. /dev/ttyACM0, COM3).
    pub port: String,
    /// Baud rate.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Exit after receiving N records.
    #[arg(long)]
    pub count: Option<usize>,
    /// Fail if no record arrives for this long (e.g. 5s, 500ms).
    #[arg(long)]
    pub idle_timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Capture file to decode. Reads stdin when omitted.
    pub file: Option<PathBuf>,
    /// Print decoder counters after the records.
    #[arg(long)]
    pub summary: bool,
    /// Exit with code 60 if any frame was dropped or any garbage skipped.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Roll angle.
    #[arg(long, allow_hyphen_values = true)]
    pub roll: f64,
    /// Pitch angle.
    #[arg(long, allow_hyphen_values = true)]
    pub pitch: f64,
    /// Number of copies of the frame to write.
    #[arg(long, default_value = "1")]
    pub repeat: usize,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
