use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

const PREVIEW_LIMIT: usize = 64;

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
struct RecordOutput {
    index: u64,
    size: usize,
    payload: String,
}

/// Prints records as they are read. Table output is buffered until
/// [`RecordPrinter::finish`] so all rows share one table.
pub struct RecordPrinter {
    format: OutputFormat,
    table: Option<Table>,
}

impl RecordPrinter {
    pub fn new(format: OutputFormat) -> Self {
        let table = matches!(format, OutputFormat::Table).then(|| {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "SIZE", "PAYLOAD"]);
            table
        });
        Self { format, table }
    }

    pub fn push(&mut self, index: u64, payload: &[u8]) {
        match self.format {
            OutputFormat::Json => {
                let out = RecordOutput {
                    index,
                    size: payload.len(),
                    payload: payload_preview(payload, usize::MAX),
                };
                println!(
                    "{}",
                    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputFormat::Table => {
                if let Some(table) = self.table.as_mut() {
                    table.add_row(vec![
                        index.to_string(),
                        payload.len().to_string(),
                        payload_preview(payload, PREVIEW_LIMIT),
                    ]);
                }
            }
            OutputFormat::Pretty => {
                println!(
                    "record={} size={} payload={}",
                    index,
                    payload.len(),
                    payload_preview(payload, PREVIEW_LIMIT)
                );
            }
            OutputFormat::Raw => print_raw(payload),
        }
    }

    pub fn finish(self) {
        if let Some(table) = self.table {
            println!("{table}");
        }
    }
}

/// Print a flat summary: `out` for JSON, `fields` for everything else.
pub fn print_summary<T: Serialize>(out: &T, fields: &[(&str, String)], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (name, value) in fields {
                table.add_row(vec![name.to_string(), value.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (name, value) in fields {
                println!("{:<14} {}", format!("{name}:"), value);
            }
        }
        OutputFormat::Raw => {
            if let Some((_, value)) = fields.first() {
                println!("{value}");
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn payload_preview(payload: &[u8], limit: usize) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) if text.chars().count() <= limit => text.to_string(),
        Ok(text) => {
            let mut short: String = text.chars().take(limit).collect();
            short.push('…');
            short
        }
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}
