use std::io::Read;

use recordio_frame::{RecordReader, StopReason};
use serde::Serialize;
use tracing::warn;

use crate::cmd::{Context, StatArgs};
use crate::exit::{frame_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::print_summary;

#[derive(Serialize, Debug, PartialEq)]
struct StatOutput {
    path: String,
    layout: &'static str,
    records: u64,
    payload_bytes: u64,
    min_record: Option<usize>,
    max_record: Option<usize>,
    stop_reason: &'static str,
    clean: bool,
}

pub fn run(args: StatArgs, ctx: &Context) -> CliResult<i32> {
    let mut reader = RecordReader::open_with_config(&args.path, ctx.frame_config.clone())
        .map_err(|err| frame_error(&format!("failed opening {}", args.path.display()), err))?;

    let mut out = scan(&mut reader);
    out.path = args.path.display().to_string();
    out.layout = ctx.frame_config.layout.as_str();

    if !out.clean {
        warn!(
            path = %out.path,
            records = out.records,
            reason = out.stop_reason,
            "record file does not end cleanly"
        );
    }

    let size_range = match (out.min_record, out.max_record) {
        (Some(min), Some(max)) => format!("{min}..={max}"),
        _ => "-".to_string(),
    };
    print_summary(
        &out,
        &[
            ("records", out.records.to_string()),
            ("payload bytes", out.payload_bytes.to_string()),
            ("record sizes", size_range),
            ("stop reason", out.stop_reason.to_string()),
            ("layout", out.layout.to_string()),
            ("path", out.path.clone()),
        ],
        ctx.format,
    );

    Ok(if out.clean { SUCCESS } else { DATA_INVALID })
}

fn scan<R: Read>(reader: &mut RecordReader<R>) -> StatOutput {
    let mut min_record: Option<usize> = None;
    let mut max_record: Option<usize> = None;

    for record in reader.records() {
        let len = record.len();
        min_record = Some(min_record.map_or(len, |min| min.min(len)));
        max_record = Some(max_record.map_or(len, |max| max.max(len)));
    }

    let reason = reader.stop_reason().unwrap_or(StopReason::Exhausted);
    StatOutput {
        path: String::new(),
        layout: reader.config().layout.as_str(),
        records: reader.records_read(),
        payload_bytes: reader.bytes_read(),
        min_record,
        max_record,
        stop_reason: reason.as_str(),
        clean: reason.is_clean(),
    }
}
