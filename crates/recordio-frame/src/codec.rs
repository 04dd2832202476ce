use std::mem::size_of;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Sentinel written at the start of every frame.
pub const MAGIC: i32 = 0x3ed7230a;

/// Size of the magic field in bytes.
pub const MAGIC_SIZE: usize = size_of::<i32>();

/// Byte order and length width of the frame header.
///
/// `Native` reproduces the host's in-memory representation: a native-endian
/// `i32` magic followed by a native-endian `usize` length. Files written this
/// way only read back on hosts with the same word width and byte order.
///
/// `Portable` fixes the header to a little-endian `i32` magic and a
/// little-endian `u64` length. It is a separate, incompatible format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameLayout {
    #[default]
    Native,
    Portable,
}

impl FrameLayout {
    /// Width of the length field in bytes.
    pub const fn length_width(self) -> usize {
        match self {
            FrameLayout::Native => size_of::<usize>(),
            FrameLayout::Portable => size_of::<u64>(),
        }
    }

    /// Total header size (magic + length).
    pub const fn header_size(self) -> usize {
        MAGIC_SIZE + self.length_width()
    }

    /// The magic sentinel as it appears on the wire.
    pub fn magic_bytes(self) -> [u8; MAGIC_SIZE] {
        match self {
            FrameLayout::Native => MAGIC.to_ne_bytes(),
            FrameLayout::Portable => MAGIC.to_le_bytes(),
        }
    }

    pub fn decode_magic(self, raw: [u8; MAGIC_SIZE]) -> i32 {
        match self {
            FrameLayout::Native => i32::from_ne_bytes(raw),
            FrameLayout::Portable => i32::from_le_bytes(raw),
        }
    }

    /// Decode a length field. `raw` must hold exactly `length_width()` bytes.
    pub fn decode_length(self, raw: &[u8]) -> u64 {
        match self {
            FrameLayout::Native => {
                let mut buf = [0u8; size_of::<usize>()];
                buf.copy_from_slice(raw);
                usize::from_ne_bytes(buf) as u64
            }
            FrameLayout::Portable => {
                let mut buf = [0u8; size_of::<u64>()];
                buf.copy_from_slice(raw);
                u64::from_le_bytes(buf)
            }
        }
    }

    fn put_length(self, len: usize, dst: &mut BytesMut) {
        match self {
            FrameLayout::Native => dst.put_slice(&len.to_ne_bytes()),
            FrameLayout::Portable => dst.put_u64_le(len as u64),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FrameLayout::Native => "native",
            FrameLayout::Portable => "portable",
        }
    }
}

/// Configuration shared by record readers and writers.
#[derive(Debug, Clone, Default)]
pub struct FrameConfig {
    /// Header layout. Readers and writers of one stream must agree.
    pub layout: FrameLayout,
    /// Optional cap on payload size. Default: unlimited.
    pub max_payload_size: Option<usize>,
    /// Flush the sink after every record instead of only on `flush`/`close`.
    pub flush_each_record: bool,
}

impl FrameConfig {
    /// Reject a payload length above the configured limit.
    pub fn check_payload_size(&self, size: u64) -> Result<()> {
        match self.max_payload_size {
            Some(max) if size > max as u64 => Err(FrameError::PayloadTooLarge { size, max }),
            _ => Ok(()),
        }
    }
}

/// Encode one frame into `dst`.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────────────┬─────────────────┐
/// │ Magic (4B)   │ Length               │ Payload         │
/// │ 0x3ed7230a   │ (usize native or     │ (Length bytes)  │
/// │              │  8B LE, per layout)  │                 │
/// └──────────────┴──────────────────────┴─────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], layout: FrameLayout, dst: &mut BytesMut) {
    dst.reserve(layout.header_size() + payload.len());
    dst.put_slice(&layout.magic_bytes());
    layout.put_length(payload.len(), dst);
    dst.put_slice(payload);
}

/// Decode one frame from an in-memory buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, config: &FrameConfig) -> Result<Option<Bytes>> {
    let layout = config.layout;
    if src.len() < MAGIC_SIZE {
        return Ok(None);
    }

    let mut magic = [0u8; MAGIC_SIZE];
    magic.copy_from_slice(&src[..MAGIC_SIZE]);
    let found = layout.decode_magic(magic);
    if found != MAGIC {
        return Err(FrameError::InvalidMagic {
            expected: MAGIC,
            found,
        });
    }

    let header = layout.header_size();
    if src.len() < header {
        return Ok(None);
    }

    let payload_len = layout.decode_length(&src[MAGIC_SIZE..header]);
    config.check_payload_size(payload_len)?;
    let payload_len = usize::try_from(payload_len).map_err(|_| FrameError::PayloadTooLarge {
        size: payload_len,
        max: usize::MAX,
    })?;

    if src.len() - header < payload_len {
        return Ok(None);
    }

    src.advance(header);
    Ok(Some(src.split_to(payload_len).freeze()))
}
