//! Magic-prefixed, length-framed binary records over sequential byte streams.
//!
//! Every record is framed with:
//! - A 4-byte magic number (`0x3ed7230a`) confirming frame alignment
//! - A payload length (native `usize` or 8-byte little-endian, per [`FrameLayout`])
//! - Exactly `length` payload bytes
//!
//! Records are appended with [`RecordWriter`] and read back, strictly in the
//! order written, with [`RecordReader`]. There is no index, checksum or
//! resynchronization: the first frame that fails to read ends the stream.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{decode_frame, encode_frame, FrameConfig, FrameLayout, MAGIC, MAGIC_SIZE};
pub use error::{FrameError, FrameSection, Result, StopReason};
pub use reader::{RecordReader, Records};
pub use writer::RecordWriter;
