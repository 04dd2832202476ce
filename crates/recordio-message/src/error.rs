use recordio_frame::FrameError;

/// Errors that can occur while writing or reading message records.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// Record-level error.
    #[error("record error: {0}")]
    Frame(#[from] FrameError),

    /// The message could not be serialized.
    #[error("failed to encode {codec} message: {message}")]
    Encode {
        codec: &'static str,
        message: String,
    },

    /// The record payload could not be parsed as a message.
    #[error("failed to decode {codec} message: {message}")]
    Decode {
        codec: &'static str,
        message: String,
    },
}

impl MessageError {
    /// True when the underlying reader has no further frame.
    ///
    /// A decode failure is not end-of-records: the frame was consumed whole
    /// and the next record is still readable.
    pub fn is_end_of_records(&self) -> bool {
        matches!(self, MessageError::Frame(err) if err.is_end_of_records())
    }
}

pub type Result<T> = std::result::Result<T, MessageError>;
