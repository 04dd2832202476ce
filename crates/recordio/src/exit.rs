use std::fmt;
use std::io;

use recordio_frame::FrameError;
use recordio_message::MessageError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const NOT_FOUND: i32 = 51;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => NOT_FOUND,
        io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::InvalidMagic { .. }
        | FrameError::Truncated { .. }
        | FrameError::SizeMismatch { .. }
        | FrameError::PayloadTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::EndOfStream | FrameError::Stopped(_) => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}

pub fn message_error(context: &str, err: MessageError) -> CliError {
    match err {
        MessageError::Frame(err) => frame_error(context, err),
        MessageError::Encode { .. } | MessageError::Decode { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}
