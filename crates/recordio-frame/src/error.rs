use std::fmt;

/// Part of a frame that was being read when the source ran dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSection {
    Magic,
    Length,
    Payload,
}

impl fmt::Display for FrameSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameSection::Magic => "magic",
            FrameSection::Length => "length",
            FrameSection::Payload => "payload",
        };
        f.write_str(name)
    }
}

/// Why a reader stopped producing frames.
///
/// Only [`StopReason::Exhausted`] describes a clean end of data. Every reason
/// ends reading the same way; the distinction is kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source ended exactly on a frame boundary.
    Exhausted,
    /// A frame boundary did not start with the magic sentinel.
    InvalidMagic,
    /// The source ended in the middle of a frame.
    Truncated,
    /// A fixed-size read found a frame of a different length.
    SizeMismatch,
    /// A frame announced a payload above the configured limit.
    PayloadTooLarge,
    /// The source reported an I/O error.
    Io,
}

impl StopReason {
    /// True when the source simply ran out of frames.
    pub fn is_clean(self) -> bool {
        self == StopReason::Exhausted
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::Exhausted => "exhausted",
            StopReason::InvalidMagic => "invalid-magic",
            StopReason::Truncated => "truncated",
            StopReason::SizeMismatch => "size-mismatch",
            StopReason::PayloadTooLarge => "payload-too-large",
            StopReason::Io => "io",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while writing or reading records.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The source has no more frames.
    #[error("end of record stream")]
    EndOfStream,

    /// The frame boundary does not carry the magic sentinel.
    #[error("invalid record magic (expected {expected:#010x}, found {found:#010x})")]
    InvalidMagic { expected: i32, found: i32 },

    /// The source ended before a complete frame was read.
    #[error("truncated record {section} ({actual} of {expected} bytes)")]
    Truncated {
        section: FrameSection,
        expected: usize,
        actual: usize,
    },

    /// The frame length does not match the fixed record size being read.
    #[error("record size mismatch (expected {expected} bytes, frame holds {actual})")]
    SizeMismatch { expected: usize, actual: u64 },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: u64, max: usize },

    /// An I/O error occurred while reading or writing records.
    #[error("record I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The reader already stopped; no further frames are available.
    #[error("record reader stopped ({0})")]
    Stopped(StopReason),
}

impl FrameError {
    /// True for every outcome that means "no further frame available".
    ///
    /// Clean exhaustion and corruption are both end-of-records: a reader never
    /// produces another frame after one of these.
    pub fn is_end_of_records(&self) -> bool {
        self.stop_reason().is_some()
    }

    /// The reader stop reason this error corresponds to, if any.
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            FrameError::EndOfStream => Some(StopReason::Exhausted),
            FrameError::InvalidMagic { .. } => Some(StopReason::InvalidMagic),
            FrameError::Truncated { .. } => Some(StopReason::Truncated),
            FrameError::SizeMismatch { .. } => Some(StopReason::SizeMismatch),
            FrameError::PayloadTooLarge { .. } => Some(StopReason::PayloadTooLarge),
            FrameError::Io(_) => Some(StopReason::Io),
            FrameError::Stopped(reason) => Some(*reason),
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
