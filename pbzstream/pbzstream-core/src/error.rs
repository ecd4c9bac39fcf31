//! Error types for the frame codec and message codec seams.

use std::io;

/// Error from frame-level encoding and decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// I/O failure on the underlying transport.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The stream ended after a frame's tag byte but before its length and
    /// payload were complete.  Distinct from a clean end at a frame boundary.
    #[error("stream ended inside a frame")]
    Truncated,

    /// A length varint was longer than ten bytes, overflowed `u64`, or
    /// decoded to a length this platform cannot represent.
    #[error("malformed frame length")]
    MalformedLength,
}

/// Error returned by [`MessageCodec`](crate::MessageCodec) implementations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A schema blob could not be parsed, or it conflicts with an earlier
    /// registration.
    #[error("failed to register schema: {source}")]
    SchemaParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A type name did not resolve against any registered schema.
    #[error("unknown message type '{type_name}'")]
    UnknownType { type_name: String },

    /// Message serialization failed.
    #[error("failed to encode message of type '{type_name}': {source}")]
    Encode {
        type_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Message payload bytes could not be decoded.
    #[error("failed to decode message of type '{type_name}': {source}")]
    Decode {
        type_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
