use std::io::Cursor;

use proptest::prelude::*;
use recordio_frame::{
    FrameConfig, FrameError, FrameLayout, RecordReader, RecordWriter, StopReason, MAGIC,
};

fn layout_strategy() -> impl Strategy<Value = FrameLayout> {
    prop_oneof![Just(FrameLayout::Native), Just(FrameLayout::Portable)]
}

fn write_all(payloads: &[Vec<u8>], config: &FrameConfig) -> Vec<u8> {
    let mut writer = RecordWriter::with_config(Vec::new(), config.clone());
    for payload in payloads {
        writer.write_record(payload).unwrap();
    }
    writer.into_inner()
}

#[test]
fn abc_empty_defg_scenario() {
    let mut writer = RecordWriter::new(Vec::new());
    writer.write_record(b"ABC").unwrap();
    writer.write_record(b"").unwrap();
    writer.write_record(b"DEFG").unwrap();
    let wire = writer.into_inner();

    let mut reader = RecordReader::new(Cursor::new(wire));
    let mut text = Vec::new();
    reader.read_record_into(&mut text).unwrap();
    assert_eq!(text, b"ABC");
    reader.read_record_into(&mut text).unwrap();
    assert!(text.is_empty());
    reader.read_record_into(&mut text).unwrap();
    assert_eq!(text, b"DEFG");

    let fourth = reader.read_record_into(&mut text).unwrap_err();
    assert!(fourth.is_end_of_records());
    assert!(matches!(fourth, FrameError::EndOfStream));
}

#[test]
fn sentinel_is_checked_before_anything_else() {
    let mut wire = (MAGIC ^ 1).to_ne_bytes().to_vec();
    wire.extend_from_slice(&[0xFF; 32]);

    let mut reader = RecordReader::new(Cursor::new(wire));
    assert!(reader.read_record().is_err());
    assert_eq!(reader.stop_reason(), Some(StopReason::InvalidMagic));
    assert_eq!(reader.into_inner().position(), 4);
}

proptest! {
    #[test]
    fn prop_payload_sequences_roundtrip(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..512), 0..24),
        layout in layout_strategy(),
    ) {
        let config = FrameConfig { layout, ..FrameConfig::default() };
        let wire = write_all(&payloads, &config);

        let mut reader = RecordReader::with_config(Cursor::new(wire), config);
        let read: Vec<Vec<u8>> = reader.records().map(|record| record.to_vec()).collect();

        prop_assert_eq!(read, payloads);
        prop_assert_eq!(reader.stop_reason(), Some(StopReason::Exhausted));
    }

    #[test]
    fn prop_truncation_never_yields_a_partial_record(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..64), 1..8),
        cut in any::<prop::sample::Index>(),
    ) {
        let config = FrameConfig::default();
        let wire = write_all(&payloads, &config);
        let keep = cut.index(wire.len());

        let mut reader = RecordReader::new(Cursor::new(wire[..keep].to_vec()));
        let read: Vec<Vec<u8>> = reader.records().map(|record| record.to_vec()).collect();

        prop_assert!(read.len() <= payloads.len());
        prop_assert_eq!(&read[..], &payloads[..read.len()]);
        prop_assert!(reader.is_stopped());
    }
}
