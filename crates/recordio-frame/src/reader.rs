use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::iter::FusedIterator;
use std::mem::size_of;
use std::path::Path;

use bytemuck::Pod;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::codec::{FrameConfig, MAGIC, MAGIC_SIZE};
use crate::error::{FrameError, FrameSection, Result, StopReason};

/// Payload buffers start no larger than this and grow as bytes arrive, so a
/// corrupt length cannot force a huge allocation up front.
const MAX_PREALLOCATION: usize = 64 * 1024;

const MAX_LENGTH_WIDTH: usize = size_of::<u64>();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Ready,
    Stopped(StopReason),
}

/// Reads records, in the order written, from any `Read` source.
///
/// The first failed read stops the reader for good: the frame format has no
/// way to resynchronize, so every later call reports
/// [`FrameError::Stopped`] without touching the source.
pub struct RecordReader<T> {
    inner: T,
    config: FrameConfig,
    state: ReaderState,
    records_read: u64,
    bytes_read: u64,
}

impl<T: Read> RecordReader<T> {
    /// Create a new record reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new record reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            config,
            state: ReaderState::Ready,
            records_read: 0,
            bytes_read: 0,
        }
    }

    /// Read the next record into a freshly allocated buffer.
    pub fn read_record(&mut self) -> Result<Bytes> {
        let mut payload = Vec::new();
        self.read_record_into(&mut payload)?;
        Ok(Bytes::from(payload))
    }

    /// Read the next record into caller-owned storage, returning its length.
    ///
    /// `buf` is cleared first and its capacity reused. On failure it is left
    /// empty.
    pub fn read_record_into(&mut self, buf: &mut Vec<u8>) -> Result<usize> {
        buf.clear();
        self.guarded(|reader| {
            let len = reader.read_header()?;
            let len = usize::try_from(len).map_err(|_| FrameError::PayloadTooLarge {
                size: len,
                max: usize::MAX,
            })?;
            if let Err(err) = reader.read_payload(len, buf) {
                buf.clear();
                return Err(err);
            }
            Ok(len)
        })
    }

    /// Read the next record as a plain-data value.
    ///
    /// Unlike [`read_record`](Self::read_record), the frame length must equal
    /// `size_of::<P>()` exactly; any other length is a
    /// [`FrameError::SizeMismatch`] and stops the reader.
    pub fn read_pod<P: Pod>(&mut self) -> Result<P> {
        self.guarded(|reader| {
            let expected = size_of::<P>();
            let len = reader.read_header()?;
            if len != expected as u64 {
                return Err(FrameError::SizeMismatch {
                    expected,
                    actual: len,
                });
            }

            let mut value: P = bytemuck::Zeroable::zeroed();
            let dst = bytemuck::bytes_of_mut(&mut value);
            let read = read_full(&mut reader.inner, dst)?;
            if read < expected {
                return Err(FrameError::Truncated {
                    section: FrameSection::Payload,
                    expected,
                    actual: read,
                });
            }
            reader.bytes_read += expected as u64;
            Ok(value)
        })
    }

    /// Read the next plain-data record into `dst`. `dst` is untouched on failure.
    pub fn read_pod_into<P: Pod>(&mut self, dst: &mut P) -> Result<()> {
        *dst = self.read_pod()?;
        Ok(())
    }

    /// Read plain-data records until no frame remains.
    ///
    /// Check [`stop_reason`](Self::stop_reason) afterwards to tell a clean end
    /// from corruption.
    pub fn read_all_pods<P: Pod>(&mut self) -> Vec<P> {
        let mut values = Vec::new();
        while let Ok(value) = self.read_pod::<P>() {
            values.push(value);
        }
        values
    }

    /// Iterate over the remaining records until the reader stops.
    pub fn records(&mut self) -> Records<'_, T> {
        Records { reader: self }
    }

    /// Why the reader stopped, or `None` while frames may still follow.
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            ReaderState::Ready => None,
            ReaderState::Stopped(reason) => Some(reason),
        }
    }

    /// True once a read has failed.
    pub fn is_stopped(&self) -> bool {
        self.stop_reason().is_some()
    }

    /// Release the source. No further records can be read.
    pub fn close(self) {
        debug!(
            records = self.records_read,
            bytes = self.bytes_read,
            stop = ?self.stop_reason(),
            "record reader closed"
        );
    }

    /// Number of records read so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Total payload bytes read so far (headers excluded).
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current record reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    fn guarded<V>(&mut self, read: impl FnOnce(&mut Self) -> Result<V>) -> Result<V> {
        if let ReaderState::Stopped(reason) = self.state {
            return Err(FrameError::Stopped(reason));
        }

        match read(self) {
            Ok(value) => {
                self.records_read += 1;
                Ok(value)
            }
            Err(err) => {
                self.stop(&err);
                Err(err)
            }
        }
    }

    fn stop(&mut self, err: &FrameError) {
        let reason = err.stop_reason().unwrap_or(StopReason::Io);
        self.state = ReaderState::Stopped(reason);
        if reason.is_clean() {
            debug!(records = self.records_read, "record stream exhausted");
        } else {
            warn!(
                error = %err,
                records = self.records_read,
                "record stream stopped"
            );
        }
    }

    /// Read and validate magic and length, returning the payload length.
    fn read_header(&mut self) -> Result<u64> {
        let layout = self.config.layout;

        let mut magic = [0u8; MAGIC_SIZE];
        let read = read_full(&mut self.inner, &mut magic)?;
        if read == 0 {
            return Err(FrameError::EndOfStream);
        }
        if read < MAGIC_SIZE {
            return Err(FrameError::Truncated {
                section: FrameSection::Magic,
                expected: MAGIC_SIZE,
                actual: read,
            });
        }

        let found = layout.decode_magic(magic);
        if found != MAGIC {
            return Err(FrameError::InvalidMagic {
                expected: MAGIC,
                found,
            });
        }

        let width = layout.length_width();
        let mut raw = [0u8; MAX_LENGTH_WIDTH];
        let read = read_full(&mut self.inner, &mut raw[..width])?;
        if read < width {
            return Err(FrameError::Truncated {
                section: FrameSection::Length,
                expected: width,
                actual: read,
            });
        }

        let len = layout.decode_length(&raw[..width]);
        self.config.check_payload_size(len)?;
        Ok(len)
    }

    fn read_payload(&mut self, len: usize, dst: &mut Vec<u8>) -> Result<()> {
        dst.reserve(len.min(MAX_PREALLOCATION));
        let read = (&mut self.inner).take(len as u64).read_to_end(dst)?;
        if read < len {
            return Err(FrameError::Truncated {
                section: FrameSection::Payload,
                expected: len,
                actual: read,
            });
        }
        self.bytes_read += len as u64;
        Ok(())
    }
}

impl RecordReader<BufReader<File>> {
    /// Open a record file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, FrameConfig::default())
    }

    /// Open a record file for reading with explicit configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: FrameConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!(?path, layout = config.layout.as_str(), "opened record file");
        Ok(Self::with_config(BufReader::new(file), config))
    }
}

/// Iterator over the records of a [`RecordReader`].
///
/// Ends at the first frame that cannot be read; the reader's
/// [`stop_reason`](RecordReader::stop_reason) says why.
pub struct Records<'a, T> {
    reader: &'a mut RecordReader<T>,
}

impl<T: Read> Iterator for Records<'_, T> {
    type Item = Bytes;

    fn next(&mut self) -> Option<Bytes> {
        self.reader.read_record().ok()
    }
}

impl<T: Read> FusedIterator for Records<'_, T> {}

/// Fill `buf` from `src`, stopping early only at end of data.
fn read_full<R: Read>(src: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
