//! Unsigned LEB128 varints used for frame length fields.

use std::io::{self, Read, Write};

use crate::error::FrameError;

/// Longest accepted encoding of a `u64`, matching the ten-byte limit of the
/// reference encoding.
const MAX_VARINT_LEN: u32 = 10;

/// Write `value` as an unsigned LEB128 varint.
pub fn write_uvarint(w: &mut impl Write, mut value: u64) -> io::Result<()> {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            return w.write_all(&[byte]);
        }
        w.write_all(&[byte | 0x80])?;
    }
}

/// Read an unsigned LEB128 varint.
///
/// Non-minimal encodings are accepted.  Encodings longer than ten bytes or
/// overflowing a `u64` fail with [`FrameError::MalformedLength`]; end of
/// input mid-varint is [`FrameError::Truncated`].
pub fn read_uvarint(r: &mut impl Read) -> Result<u64, FrameError> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT_LEN {
        let byte = read_byte(r)?.ok_or(FrameError::Truncated)?;
        let shift = 7 * i;
        if shift == 63 && byte & 0x7f > 1 {
            return Err(FrameError::MalformedLength);
        }
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(FrameError::MalformedLength)
}

/// Read a single byte, or `None` at end of input.
pub(crate) fn read_byte(r: &mut impl Read) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match r.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
