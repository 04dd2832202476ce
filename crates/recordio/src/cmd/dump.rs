use std::io::Read;

use recordio_frame::{FrameError, RecordReader};

use crate::cmd::{Context, DumpArgs};
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::RecordPrinter;

pub fn run(args: DumpArgs, ctx: &Context) -> CliResult<i32> {
    let mut reader = RecordReader::open_with_config(&args.path, ctx.frame_config.clone())
        .map_err(|err| frame_error(&format!("failed opening {}", args.path.display()), err))?;

    let mut printer = RecordPrinter::new(ctx.format);
    let result = dump_records(&mut reader, args.limit, |index, payload| {
        printer.push(index, payload)
    });
    printer.finish();

    result.map_err(|err| {
        frame_error(
            &format!("record {} unreadable", reader.records_read()),
            err,
        )
    })?;
    Ok(SUCCESS)
}

/// Feed records to `emit` until the stream ends or `limit` is reached.
///
/// A clean end of stream is success; any other stop is returned.
fn dump_records<R: Read>(
    reader: &mut RecordReader<R>,
    limit: Option<u64>,
    mut emit: impl FnMut(u64, &[u8]),
) -> Result<(), FrameError> {
    let mut buf = Vec::new();
    let mut index = 0u64;
    while limit.is_none_or(|limit| index < limit) {
        match reader.read_record_into(&mut buf) {
            Ok(_) => emit(index, &buf),
            Err(FrameError::EndOfStream) => return Ok(()),
            Err(err) => return Err(err),
        }
        index += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use recordio_frame::RecordWriter;

    use super::*;

    fn wire(payloads: &[&[u8]]) -> Vec<u8> {
        let mut writer = RecordWriter::new(Vec::new());
        for payload in payloads {
            writer.write_record(payload).unwrap();
        }
        writer.into_inner()
    }

    #[test]
    fn dumps_all_records_in_order() {
        let mut reader = RecordReader::new(Cursor::new(wire(&[b"ABC", b"", b"DEFG"])));
        let mut seen = Vec::new();
        dump_records(&mut reader, None, |i, p| seen.push((i, p.to_vec()))).unwrap();

        assert_eq!(
            seen,
            vec![(0, b"ABC".to_vec()), (1, Vec::new()), (2, b"DEFG".to_vec())]
        );
    }

    #[test]
    fn limit_stops_early_without_error() {
        let mut reader = RecordReader::new(Cursor::new(wire(&[b"a", b"b", b"c"])));
        let mut count = 0;
        dump_records(&mut reader, Some(2), |_, _| count += 1).unwrap();
        assert_eq!(count, 2);
        assert!(!reader.is_stopped());
    }

    #[test]
    fn corruption_is_reported_after_good_records() {
        let mut bytes = wire(&[b"good"]);
        bytes.extend_from_slice(&[0xAA; 16]);
        let mut reader = RecordReader::new(Cursor::new(bytes));

        let mut count = 0;
        let err = dump_records(&mut reader, None, |_, _| count += 1).unwrap_err();
        assert_eq!(count, 1);
        assert!(matches!(err, FrameError::InvalidMagic { .. }));
    }
}
