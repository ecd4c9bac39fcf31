//! Streaming container for sequences of schema-typed protobuf messages.
//!
//! A pbz file is a gzip stream whose decompressed content is a two-byte
//! magic header followed by tag/length/payload frames.  The first frame
//! embeds the writer's schema descriptor set, and a type-name frame precedes
//! each run of equally-typed messages, so a reader can decode files produced
//! with schemas unknown at its build time.
//!
//! [`PbzWriter`] and [`PbzReader`] are the sequential state machines; the
//! [`concurrent`] module wraps them in channel-driven worker threads with
//! cooperative cancellation.

pub mod concurrent;
mod error;
mod reader;
mod writer;

pub use error::{ReadError, WriteError};
pub use pbzstream_core as core;
#[cfg(feature = "protobuf")]
pub use pbzstream_protobuf as protobuf;
pub use reader::PbzReader;
pub use writer::PbzWriter;
