//! Type-length-value framing for the compressed stream region.

use std::io::{self, Read, Write};

use crate::error::FrameError;
use crate::varint::{read_byte, read_uvarint, write_uvarint};

/// First two decompressed bytes of every stream.
pub const MAGIC: [u8; 2] = *b"AB";

/// Frame tags understood by the reader.
///
/// `Version` is a legacy tag emitted by older producers; readers accept and
/// skip it, current writers never emit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FrameTag {
    /// Payload is a schema descriptor blob.
    FileDescriptor = 1,
    /// Payload is the UTF-8 type name applied to subsequent message frames.
    DescriptorName = 2,
    /// Payload is one codec-serialized message.
    Message = 3,
    /// Legacy producer version marker.
    Version = 4,
}

impl FrameTag {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(FrameTag::FileDescriptor),
            2 => Some(FrameTag::DescriptorName),
            3 => Some(FrameTag::Message),
            4 => Some(FrameTag::Version),
            _ => None,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One decoded frame.
///
/// The tag is carried raw so the caller owns the unknown-tag decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub tag: u8,
    pub payload: Vec<u8>,
}

/// Write one frame: tag byte, varint payload length, payload bytes.
///
/// No padding, no checksum.
pub fn write_frame(w: &mut impl Write, tag: FrameTag, payload: &[u8]) -> io::Result<()> {
    write_raw_frame(w, tag.as_u8(), payload)
}

/// [`write_frame`] with an arbitrary tag byte.
pub fn write_raw_frame(w: &mut impl Write, tag: u8, payload: &[u8]) -> io::Result<()> {
    w.write_all(&[tag])?;
    write_uvarint(w, payload.len() as u64)?;
    w.write_all(payload)
}

/// Read one frame.
///
/// Returns `Ok(None)` when the source is exhausted before the tag byte — the
/// clean end expected at a frame boundary.  Exhaustion after the tag byte is
/// [`FrameError::Truncated`]: a partially written frame is never valid
/// stream termination.
pub fn read_frame(r: &mut impl Read) -> Result<Option<RawFrame>, FrameError> {
    let Some(tag) = read_byte(r)? else {
        return Ok(None);
    };

    let len = read_uvarint(r)?;
    let len = usize::try_from(len).map_err(|_| FrameError::MalformedLength)?;

    // Grow with the data actually present instead of trusting the declared
    // length, so a corrupt length cannot trigger a huge up-front allocation.
    let mut payload = Vec::with_capacity(len.min(64 * 1024));
    let took = r.take(len as u64).read_to_end(&mut payload)?;
    if took < len {
        return Err(FrameError::Truncated);
    }

    Ok(Some(RawFrame { tag, payload }))
}
