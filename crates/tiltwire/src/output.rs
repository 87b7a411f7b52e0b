use std::io::{IsTerminal, Write};

use chrono::{Local, SecondsFormat};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tiltwire_frame::{DecodeStats, Record};
use tiltwire_transport::PortInfo;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    /// One console line per record: `HH:MM:SS Pitch: <p> Roll: <r>`.
    Log,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Log
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct RecordOutput<'a> {
    roll: f64,
    pitch: f64,
    source: &'a str,
    timestamp: String,
}

pub fn print_record(record: &Record, source: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = RecordOutput {
                roll: record.roll,
                pitch: record.pitch,
                source,
                timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TIME", "ROLL", "PITCH", "SOURCE"])
                .add_row(vec![
                    Local::now().format("%H:%M:%S").to_string(),
                    record.roll.to_string(),
                    record.pitch.to_string(),
                    source.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Log => {
            println!("{}", log_line(record, &Local::now().format("%H:%M:%S").to_string()));
        }
    }
}

/// Console line in the measurement log layout.
pub fn log_line(record: &Record, time: &str) -> String {
    format!("{time} Pitch: {} Roll: {}", record.pitch, record.roll)
}

pub fn print_stats(stats: &DecodeStats, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(stats).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COUNTER", "VALUE"]);
            for (name, value) in stats_rows(stats) {
                table.add_row(vec![name.to_string(), value.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Log => {
            let line = stats_rows(stats)
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{line}");
        }
    }
}

fn stats_rows(stats: &DecodeStats) -> [(&'static str, u64); 7] {
    [
        ("records", stats.records),
        ("malformed", stats.malformed),
        ("checksum_mismatch", stats.checksum_mismatch),
        ("bad_checksum_token", stats.bad_checksum_token),
        ("resyncs", stats.resyncs),
        ("overflows", stats.overflows),
        ("bytes_discarded", stats.bytes_discarded),
    ]
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    kind: &'a str,
    description: Option<String>,
}

pub fn print_ports(ports: &[PortInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<PortOutput<'_>> = ports
                .iter()
                .map(|port| PortOutput {
                    name: &port.name,
                    kind: port.kind.label(),
                    description: port_description(port),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "KIND", "DESCRIPTION"]);
            for port in ports {
                table.add_row(vec![
                    port.name.clone(),
                    port.kind.label().to_string(),
                    port_description(port).unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Log => {
            for port in ports {
                match port_description(port) {
                    Some(desc) => println!("{} ({}, {desc})", port.name, port.kind.label()),
                    None => println!("{} ({})", port.name, port.kind.label()),
                }
            }
        }
    }
}

fn port_description(port: &PortInfo) -> Option<String> {
    match &port.kind {
        tiltwire_transport::PortKind::Usb { vid, pid, product } => Some(match product {
            Some(product) => format!("{vid:04x}:{pid:04x} {product}"),
            None => format!("{vid:04x}:{pid:04x}"),
        }),
        _ => None,
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
