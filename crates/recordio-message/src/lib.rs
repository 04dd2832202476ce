//! Serialized message records on top of recordio framing.
//!
//! Serialize a message with a [`MessageCodec`] and append it as one record;
//! read a record back and parse it with the same codec. The framing itself
//! never looks inside the payload.
//!
//! Codecs:
//! - [`JsonCodec`] (`json` feature, on by default)
//! - [`BincodeCodec`] (`bincode` feature, on by default)

pub mod codec;
pub mod error;
pub mod record;

#[cfg(feature = "bincode")]
pub use codec::BincodeCodec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use codec::MessageCodec;
pub use error::{MessageError, Result};
pub use record::{ReadMessage, WriteMessage};
