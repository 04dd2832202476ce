use std::io::{Read, Write};

use recordio_frame::{RecordReader, RecordWriter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::codec::MessageCodec;
use crate::error::Result;

/// Append serialized messages as records.
pub trait WriteMessage {
    /// Serialize `message` with `codec` and append it as one record.
    fn write_message<M, C>(&mut self, message: &M, codec: &C) -> Result<()>
    where
        M: Serialize + ?Sized,
        C: MessageCodec;
}

/// Read records back as messages.
pub trait ReadMessage {
    /// Read the next record and parse it with `codec`.
    ///
    /// A parse failure consumes the record but leaves the reader usable.
    fn read_message<M, C>(&mut self, codec: &C) -> Result<M>
    where
        M: DeserializeOwned,
        C: MessageCodec;
}

impl<W: Write> WriteMessage for RecordWriter<W> {
    fn write_message<M, C>(&mut self, message: &M, codec: &C) -> Result<()>
    where
        M: Serialize + ?Sized,
        C: MessageCodec,
    {
        let payload = codec.encode(message)?;
        self.write_record(&payload)?;
        Ok(())
    }
}

impl<R: Read> ReadMessage for RecordReader<R> {
    fn read_message<M, C>(&mut self, codec: &C) -> Result<M>
    where
        M: DeserializeOwned,
        C: MessageCodec,
    {
        let payload = self.read_record()?;
        codec.decode(&payload).inspect_err(|err| {
            debug!(error = %err, len = payload.len(), "record is not a valid message");
        })
    }
}
