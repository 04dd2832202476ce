use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use bytemuck::Pod;
use bytes::BytesMut;
use tracing::debug;

use crate::codec::{encode_frame, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Appends records to any `Write` sink.
///
/// Pass `&mut W` to keep ownership of the sink, or `W` to hand it over and
/// release it with [`RecordWriter::close`].
pub struct RecordWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
    records_written: u64,
    bytes_written: u64,
}

impl<T: Write> RecordWriter<T> {
    /// Create a new record writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new record writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            records_written: 0,
            bytes_written: 0,
        }
    }

    /// Append one record.
    ///
    /// A sink failure part-way through leaves a partial frame on the stream;
    /// nothing is rolled back.
    pub fn write_record(&mut self, payload: &[u8]) -> Result<()> {
        self.config.check_payload_size(payload.len() as u64)?;

        self.buf.clear();
        encode_frame(payload, self.config.layout, &mut self.buf);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::Io(ErrorKind::WriteZero.into())),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.records_written += 1;
        self.bytes_written += payload.len() as u64;

        if self.config.flush_each_record {
            self.flush()?;
        }
        Ok(())
    }

    /// Append the byte image of a plain-data value as one record.
    pub fn write_pod<P: Pod>(&mut self, value: &P) -> Result<()> {
        self.write_record(bytemuck::bytes_of(value))
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Flush and release the sink. No further records can be written.
    pub fn close(mut self) -> Result<()> {
        self.flush()?;
        debug!(
            records = self.records_written,
            bytes = self.bytes_written,
            "record writer closed"
        );
        Ok(())
    }

    /// Number of records appended so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Total payload bytes appended so far (headers excluded).
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner sink without flushing.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current record writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl RecordWriter<BufWriter<File>> {
    /// Create (or truncate) a record file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with_config(path, FrameConfig::default())
    }

    /// Create (or truncate) a record file with explicit configuration.
    pub fn create_with_config(path: impl AsRef<Path>, config: FrameConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!(?path, layout = config.layout.as_str(), "created record file");
        Ok(Self::with_config(BufWriter::new(file), config))
    }

    /// Open a record file for appending, creating it if missing.
    pub fn append(path: impl AsRef<Path>) -> Result<Self> {
        Self::append_with_config(path, FrameConfig::default())
    }

    /// Open a record file for appending with explicit configuration.
    pub fn append_with_config(path: impl AsRef<Path>, config: FrameConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!(?path, layout = config.layout.as_str(), "opened record file for append");
        Ok(Self::with_config(BufWriter::new(file), config))
    }
}
