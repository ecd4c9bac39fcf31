//! Error types for the stream writer and reader.

use std::io;

use pbzstream_core::{CodecError, FrameError};

/// Errors produced by [`PbzWriter`](crate::PbzWriter).
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The schema descriptor file could not be read.
    #[error("failed to read descriptor file {path}: {source}")]
    SchemaRead {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The destination file could not be created.
    #[error("failed to create {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: io::Error,
    },

    /// I/O failure while writing to the compressed sink.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Schema registration or message serialization failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors produced by [`PbzReader`](crate::PbzReader).
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The stream file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    /// I/O failure while reading from the compressed source.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The first two decompressed bytes did not match the magic header.
    #[error("invalid magic header: {found:02x?}")]
    BadMagic { found: [u8; 2] },

    /// The stream ended partway through a frame.
    #[error("stream ended inside a frame")]
    Truncated,

    /// A frame length varint was malformed.
    #[error("malformed frame length")]
    MalformedLength,

    /// A frame carried a tag the reader does not understand.
    #[error("unknown frame tag {tag}")]
    UnknownFrameTag { tag: u8 },

    /// A descriptor-name frame payload was not valid UTF-8.
    #[error("descriptor name is not valid UTF-8")]
    BadTypeName,

    /// A descriptor-name frame referenced a type absent from every
    /// registered schema.
    #[error("unknown message type '{type_name}'")]
    UnknownType { type_name: String },

    /// A message frame appeared before any descriptor-name frame.
    #[error("message frame without a preceding descriptor name")]
    NoPendingType,

    /// Schema registration or message decoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The reader already failed; the terminal error was returned by an
    /// earlier call to [`read`](crate::PbzReader::read).
    #[error("reader is in a failed state")]
    Poisoned,
}

impl From<FrameError> for ReadError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Io(e) => ReadError::Io(e),
            FrameError::Truncated => ReadError::Truncated,
            FrameError::MalformedLength => ReadError::MalformedLength,
        }
    }
}
