use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Turns messages into record payloads and back.
///
/// Implement this to plug any self-describing serialization into the
/// message record path.
pub trait MessageCodec {
    /// Short codec name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Serialize a message into a record payload.
    fn encode<M: Serialize + ?Sized>(&self, message: &M) -> Result<Vec<u8>>;

    /// Parse a record payload into a message.
    fn decode<M: DeserializeOwned>(&self, payload: &[u8]) -> Result<M>;
}

/// JSON payloads via `serde_json`.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl MessageCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<M: Serialize + ?Sized>(&self, message: &M) -> Result<Vec<u8>> {
        serde_json::to_vec(message).map_err(|err| crate::MessageError::Encode {
            codec: self.name(),
            message: err.to_string(),
        })
    }

    fn decode<M: DeserializeOwned>(&self, payload: &[u8]) -> Result<M> {
        serde_json::from_slice(payload).map_err(|err| crate::MessageError::Decode {
            codec: self.name(),
            message: err.to_string(),
        })
    }
}

/// Compact binary payloads via `bincode`.
#[cfg(feature = "bincode")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

#[cfg(feature = "bincode")]
impl MessageCodec for BincodeCodec {
    fn name(&self) -> &'static str {
        "bincode"
    }

    fn encode<M: Serialize + ?Sized>(&self, message: &M) -> Result<Vec<u8>> {
        bincode::serialize(message).map_err(|err| crate::MessageError::Encode {
            codec: self.name(),
            message: err.to_string(),
        })
    }

    fn decode<M: DeserializeOwned>(&self, payload: &[u8]) -> Result<M> {
        bincode::deserialize(payload).map_err(|err| crate::MessageError::Decode {
            codec: self.name(),
            message: err.to_string(),
        })
    }
}
