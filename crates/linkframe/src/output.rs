use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use linkframe_frame::{Corruption, ErrorCode, LinkStats};
use serde::Serialize;

const SCHEMA_BASE: &str = "https://schemas.3leaps.dev/linkframe/cli/v1";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    schema_id: String,
    error_code: &'a str,
    payload_size: usize,
    sub_frames: usize,
    wire_size: usize,
    wire: String,
}

pub fn print_encoded(wire: &[u8], payload_size: usize, sub_frames: usize, code: ErrorCode, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                schema_id: format!("{SCHEMA_BASE}/frame-encoded.schema.json"),
                error_code: code.name(),
                payload_size,
                sub_frames,
                wire_size: wire.len(),
                wire: hex::encode(wire),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["CODE", "PAYLOAD", "SUB-FRAMES", "WIRE", "HEX"]);
            table.add_row(vec![
                code.name().to_string(),
                payload_size.to_string(),
                sub_frames.to_string(),
                wire.len().to_string(),
                hex::encode(wire),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", hex::encode(wire)),
        OutputFormat::Raw => print_raw(wire),
    }
}

/// One deframer outcome as reported by `decode` and `listen`.
#[derive(Serialize)]
pub struct FrameRecord {
    pub index: usize,
    pub status: &'static str,
    pub payload_size: usize,
    pub payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl FrameRecord {
    pub fn done(index: usize, payload: &[u8]) -> Self {
        Self {
            index,
            status: "done",
            payload_size: payload.len(),
            payload: payload_preview(payload),
            reason: None,
        }
    }

    pub fn corrupt(index: usize, reason: &Corruption) -> Self {
        Self {
            index,
            status: "corrupt",
            payload_size: 0,
            payload: String::new(),
            reason: Some(reason.to_string()),
        }
    }
}

#[derive(Serialize)]
struct StatsOutput {
    frames_decoded: u64,
    frames_dropped: u64,
    checksum_mismatches: u64,
    malformed: u64,
    oversized: u64,
}

impl From<&LinkStats> for StatsOutput {
    fn from(stats: &LinkStats) -> Self {
        Self {
            frames_decoded: stats.frames_decoded,
            frames_dropped: stats.frames_dropped(),
            checksum_mismatches: stats.checksum_mismatches,
            malformed: stats.malformed,
            oversized: stats.oversized,
        }
    }
}

#[derive(Serialize)]
struct DecodedOutput<'a> {
    schema_id: String,
    error_code: &'a str,
    frames: &'a [FrameRecord],
    stats: StatsOutput,
    unconsumed: usize,
}

pub fn print_decoded(
    records: &[FrameRecord],
    payloads: &[u8],
    stats: &LinkStats,
    unconsumed: usize,
    code: ErrorCode,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = DecodedOutput {
                schema_id: format!("{SCHEMA_BASE}/frames-decoded.schema.json"),
                error_code: code.name(),
                frames: records,
                stats: StatsOutput::from(stats),
                unconsumed,
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["#", "STATUS", "SIZE", "PAYLOAD / REASON"]);
            for record in records {
                table.add_row(vec![
                    record.index.to_string(),
                    record.status.to_string(),
                    record.payload_size.to_string(),
                    record.reason.clone().unwrap_or_else(|| record.payload.clone()),
                ]);
            }
            println!("{table}");
            println!(
                "decoded={} dropped={} unconsumed={unconsumed}",
                stats.frames_decoded,
                stats.frames_dropped()
            );
        }
        OutputFormat::Pretty => {
            for record in records {
                print_record_pretty(record);
            }
        }
        OutputFormat::Raw => print_raw(payloads),
    }
}

pub fn print_record(record: &FrameRecord, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Table => {
            let mut table = new_table(vec!["#", "STATUS", "SIZE", "PAYLOAD"]);
            table.add_row(vec![
                record.index.to_string(),
                record.status.to_string(),
                record.payload_size.to_string(),
                record.payload.clone(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => print_record_pretty(record),
    }
}

fn print_record_pretty(record: &FrameRecord) {
    match &record.reason {
        Some(reason) => println!("#{} corrupt: {reason}", record.index),
        None => println!(
            "#{} done size={} payload={}",
            record.index, record.payload_size, record.payload
        ),
    }
}

#[derive(Serialize)]
struct ChecksumOutput<'a> {
    schema_id: String,
    size: usize,
    parity: u8,
    crc8: u8,
    selected: &'a str,
    selected_value: u8,
}

pub fn print_checksum(data: &[u8], code: ErrorCode, format: OutputFormat) {
    let parity = ErrorCode::Parity.compute(data);
    let crc8 = ErrorCode::Crc8.compute(data);
    match format {
        OutputFormat::Json => {
            let out = ChecksumOutput {
                schema_id: format!("{SCHEMA_BASE}/checksum.schema.json"),
                size: data.len(),
                parity,
                crc8,
                selected: code.name(),
                selected_value: code.compute(data),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["SIZE", "PARITY", "CRC8"]);
            table.add_row(vec![
                data.len().to_string(),
                parity.to_string(),
                format!("0x{crc8:02x}"),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("parity={parity} crc8=0x{crc8:02x}"),
        OutputFormat::Raw => print_raw(&[code.compute(data)]),
    }
}

#[derive(Serialize)]
pub struct SimulationReport {
    pub error_code: &'static str,
    pub frames_sent: u64,
    pub bytes_flipped: usize,
    pub frames_decoded: u64,
    pub frames_dropped: u64,
    pub undetected: u64,
}

pub fn print_simulation(report: &SimulationReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            let mut table = new_table(vec![
                "CODE", "SENT", "FLIPPED", "DECODED", "DROPPED", "UNDETECTED",
            ]);
            table.add_row(vec![
                report.error_code.to_string(),
                report.frames_sent.to_string(),
                report.bytes_flipped.to_string(),
                report.frames_decoded.to_string(),
                report.frames_dropped.to_string(),
                report.undetected.to_string(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => println!(
            "code={} sent={} flipped={} decoded={} dropped={} undetected={}",
            report.error_code,
            report.frames_sent,
            report.bytes_flipped,
            report.frames_decoded,
            report.frames_dropped,
            report.undetected
        ),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) if !text.chars().any(char::is_control) => text.to_string(),
        _ => format!("0x{}", hex::encode(payload)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_prefers_text() {
        assert_eq!(payload_preview(b"hello"), "hello");
        assert_eq!(payload_preview(&[0x00, 0xff]), "0x00ff");
        assert_eq!(payload_preview(b"a\nb"), "0x610a62");
    }

    #[test]
    fn corrupt_record_carries_reason() {
        let record = FrameRecord::corrupt(3, &Corruption::Malformed);
        assert_eq!(record.status, "corrupt");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"reason\""));

        let record = FrameRecord::done(0, b"ok");
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("reason"));
    }
}
