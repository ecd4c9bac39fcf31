//! Frame-level codec and decoder contracts for `pbzstream`.
//!
//! A pbz stream is, after decompression, a two-byte magic header followed by
//! tag/length/payload frames with unsigned LEB128 length fields.  This crate
//! provides the frame codec ([`read_frame`] / [`write_frame`]), the frame
//! tag and magic constants, and the [`MessageCodec`] trait that connects the
//! stream layer to a concrete message encoding.

mod codec;
mod error;
mod frame;
mod varint;

pub use codec::MessageCodec;
pub use error::{CodecError, FrameError};
pub use frame::{FrameTag, MAGIC, RawFrame, read_frame, write_frame, write_raw_frame};
pub use varint::{read_uvarint, write_uvarint};
