//! Sequential stream writer.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use pbzstream_core::{FrameTag, MAGIC, MessageCodec, write_frame, write_raw_frame};

use crate::error::WriteError;

/// Writes schema-typed messages to a gzip-compressed, self-describing
/// stream.
///
/// The magic header and one `FileDescriptor` frame carrying the schema blob
/// are written up front.  Each [`write`](Self::write) then emits a
/// `DescriptorName` frame only when the message type differs from the
/// previous one, followed by the message frame itself.  Frames land in call
/// order; the only buffering is the gzip encoder's own.
#[derive(Debug)]
pub struct PbzWriter<C: MessageCodec, W: Write> {
    sink: GzEncoder<W>,
    codec: C,
    last_type: Option<String>,
}

impl<C: MessageCodec> PbzWriter<C, File> {
    /// Create (or truncate) `path` and write the stream prologue, embedding
    /// the `FileDescriptorSet` read from `descriptor_path`.
    ///
    /// A failure part-way through leaves a truncated file behind; no
    /// rollback is attempted.
    pub fn create(
        path: impl AsRef<Path>,
        descriptor_path: impl AsRef<Path>,
        codec: C,
    ) -> Result<Self, WriteError> {
        let descriptor_path = descriptor_path.as_ref();
        let blob = fs::read(descriptor_path).map_err(|source| WriteError::SchemaRead {
            path: descriptor_path.display().to_string(),
            source,
        })?;

        let path = path.as_ref();
        let file = File::create(path).map_err(|source| WriteError::Create {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_writer(file, &blob, codec)
    }

    /// Finish the stream and close the file.
    pub fn close(self) -> Result<(), WriteError> {
        self.finish().map(drop)
    }
}

impl<C: MessageCodec, W: Write> PbzWriter<C, W> {
    /// Wrap `writer` in the compression envelope and write the prologue:
    /// magic header plus one `FileDescriptor` frame carrying `schema_blob`.
    ///
    /// The blob is also registered into `codec`, so messages built from the
    /// same schema are immediately writable.
    pub fn from_writer(writer: W, schema_blob: &[u8], mut codec: C) -> Result<Self, WriteError> {
        codec.register_schema(schema_blob)?;

        let mut sink = GzEncoder::new(writer, Compression::default());
        sink.write_all(&MAGIC)?;
        write_frame(&mut sink, FrameTag::FileDescriptor, schema_blob)?;

        Ok(Self {
            sink,
            codec,
            last_type: None,
        })
    }

    /// Write one message, preceded by a `DescriptorName` frame whenever the
    /// message's type name differs from the previously written one.
    pub fn write(&mut self, message: &C::Message) -> Result<(), WriteError> {
        let type_name = self.codec.type_name(message);
        if self.last_type.as_deref() != Some(type_name.as_str()) {
            write_frame(&mut self.sink, FrameTag::DescriptorName, type_name.as_bytes())?;
            self.last_type = Some(type_name);
        }

        let payload = self.codec.encode(message)?;
        write_frame(&mut self.sink, FrameTag::Message, &payload)?;
        Ok(())
    }

    /// Write one frame with an arbitrary tag byte.  Escape hatch for
    /// application-defined extension frames; readers skip tags they were
    /// built to ignore and fail on the rest.
    pub fn write_raw(&mut self, tag: u8, payload: &[u8]) -> Result<(), WriteError> {
        write_raw_frame(&mut self.sink, tag, payload)?;
        Ok(())
    }

    /// Push buffered compressed output toward the destination without
    /// finishing the stream.
    pub fn flush(&mut self) -> Result<(), WriteError> {
        self.sink.flush()?;
        Ok(())
    }

    /// Finish the compression envelope and return the underlying sink.
    ///
    /// Consuming `self` makes writing after close a compile-time error.
    /// Dropping a writer without calling this still finishes the envelope,
    /// but swallows any error doing so.
    pub fn finish(self) -> Result<W, WriteError> {
        Ok(self.sink.finish()?)
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }
}
