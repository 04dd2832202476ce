use std::fs;
use std::io::Write;
use std::path::Path;

use recordio_frame::{FrameConfig, RecordWriter};
use recordio_message::{JsonCodec, WriteMessage};
use serde::Serialize;
use tracing::info;

use crate::cmd::{AppendArgs, Context};
use crate::exit::{frame_error, io_error, message_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::print_summary;

#[derive(Serialize)]
struct AppendOutput {
    path: String,
    layout: &'static str,
    records_appended: u64,
    bytes_appended: u64,
}

pub fn run(args: AppendArgs, ctx: &Context) -> CliResult<i32> {
    if args.data.is_empty() && args.json.is_empty() && args.file.is_empty() {
        return Err(CliError::new(
            USAGE,
            "nothing to append: pass --data, --json or --file",
        ));
    }

    let json = parse_json_records(&args.json)?;
    let files = read_file_records(&args.file)?;

    let mut writer = open_writer(&args.path, args.truncate, ctx.frame_config.clone())?;
    append_records(&mut writer, &args.data, &json, &files)?;

    let out = AppendOutput {
        path: args.path.display().to_string(),
        layout: ctx.frame_config.layout.as_str(),
        records_appended: writer.records_written(),
        bytes_appended: writer.bytes_written(),
    };
    writer
        .close()
        .map_err(|err| frame_error("close failed", err))?;

    info!(
        path = %out.path,
        records = out.records_appended,
        "appended records"
    );
    print_summary(
        &out,
        &[
            ("records", out.records_appended.to_string()),
            ("bytes", out.bytes_appended.to_string()),
            ("path", out.path.clone()),
            ("layout", out.layout.to_string()),
        ],
        ctx.format,
    );
    Ok(SUCCESS)
}

fn open_writer(
    path: &Path,
    truncate: bool,
    config: FrameConfig,
) -> CliResult<RecordWriter<std::io::BufWriter<fs::File>>> {
    let opened = if truncate {
        RecordWriter::create_with_config(path, config)
    } else {
        RecordWriter::append_with_config(path, config)
    };
    opened.map_err(|err| frame_error(&format!("failed opening {}", path.display()), err))
}

fn append_records<W: Write>(
    writer: &mut RecordWriter<W>,
    data: &[String],
    json: &[serde_json::Value],
    files: &[Vec<u8>],
) -> CliResult<()> {
    for record in data {
        writer
            .write_record(record.as_bytes())
            .map_err(|err| frame_error("append failed", err))?;
    }
    for value in json {
        writer
            .write_message(value, &JsonCodec)
            .map_err(|err| message_error("append failed", err))?;
    }
    for contents in files {
        writer
            .write_record(contents)
            .map_err(|err| frame_error("append failed", err))?;
    }
    Ok(())
}

fn parse_json_records(inputs: &[String]) -> CliResult<Vec<serde_json::Value>> {
    inputs
        .iter()
        .map(|text| {
            serde_json::from_str(text)
                .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")))
        })
        .collect()
}

fn read_file_records(paths: &[std::path::PathBuf]) -> CliResult<Vec<Vec<u8>>> {
    paths
        .iter()
        .map(|path| {
            fs::read(path)
                .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use recordio_frame::RecordReader;

    use super::*;

    #[test]
    fn records_are_appended_data_then_json_then_files() {
        let mut writer = RecordWriter::new(Vec::new());
        let json = parse_json_records(&["{ \"a\" : 1 }".to_string()]).unwrap();
        append_records(
            &mut writer,
            &["ABC".to_string(), String::new()],
            &json,
            &[b"file".to_vec()],
        )
        .unwrap();

        let mut reader = RecordReader::new(Cursor::new(writer.into_inner()));
        let records: Vec<Vec<u8>> = reader.records().map(|r| r.to_vec()).collect();
        assert_eq!(
            records,
            vec![
                b"ABC".to_vec(),
                Vec::new(),
                br#"{"a":1}"#.to_vec(),
                b"file".to_vec()
            ]
        );
    }

    #[test]
    fn invalid_json_is_a_usage_error() {
        let err = parse_json_records(&["{nope".to_string()]).unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
