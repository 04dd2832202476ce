//! Append-only binary record files with magic-number framing.
//!
//! recordio writes discrete, arbitrary-length records to a sequential file and
//! reads them back in the order written. Each record carries a magic sentinel
//! and a length prefix; a reader stops at the first frame that fails either
//! check.
//!
//! # Crate Structure
//!
//! - [`frame`]: Frame format, record writer and reader, fixed-size records
//! - [`message`]: Serialized message records (behind `message` feature)

/// Re-export frame types.
pub mod frame {
    pub use recordio_frame::*;
}

/// Re-export message types (requires `message` feature).
#[cfg(feature = "message")]
pub mod message {
    pub use recordio_message::*;
}

pub use recordio_frame::{FrameConfig, FrameError, FrameLayout, RecordReader, RecordWriter};
