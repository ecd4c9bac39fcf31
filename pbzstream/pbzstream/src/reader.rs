//! Sequential stream reader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use pbzstream_core::{FrameTag, MAGIC, MessageCodec, read_frame};

use crate::error::ReadError;

#[derive(Debug)]
enum ReaderState {
    ReadFrames,
    Done,
    Failed,
}

/// Reads schema-typed messages back from a gzip-compressed, self-describing
/// stream.
///
/// The magic header is validated at construction.  Each
/// [`read`](Self::read) call consumes frames until one message can be
/// yielded: `FileDescriptor` frames register their schema blob into the
/// codec, `DescriptorName` frames set the pending type applied to subsequent
/// `Message` frames, and legacy `Version` frames are skipped.
#[derive(Debug)]
pub struct PbzReader<C: MessageCodec, R: Read> {
    source: BufReader<GzDecoder<R>>,
    codec: C,
    pending_type: Option<String>,
    state: ReaderState,
}

impl<C: MessageCodec> PbzReader<C, File> {
    /// Open the stream at `path` and validate its magic header.
    pub fn open(path: impl AsRef<Path>, codec: C) -> Result<Self, ReadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReadError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file, codec)
    }
}

impl<C: MessageCodec, R: Read> PbzReader<C, R> {
    /// Wrap `reader` in the decompression envelope and validate the magic
    /// header.
    pub fn from_reader(reader: R, codec: C) -> Result<Self, ReadError> {
        let mut source = BufReader::new(GzDecoder::new(reader));

        let mut magic = [0u8; 2];
        source.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(ReadError::BadMagic { found: magic });
        }

        Ok(Self {
            source,
            codec,
            pending_type: None,
            state: ReaderState::ReadFrames,
        })
    }

    /// Read the next message.
    ///
    /// Returns `Ok(None)` at a clean end of stream, and keeps doing so on
    /// every later call.  After any error the reader is failed: the terminal
    /// error is returned once, and later calls return
    /// [`ReadError::Poisoned`].
    pub fn read(&mut self) -> Result<Option<C::Message>, ReadError> {
        match self.state {
            ReaderState::Done => return Ok(None),
            ReaderState::Failed => return Err(ReadError::Poisoned),
            ReaderState::ReadFrames => {}
        }

        match self.advance() {
            Ok(Some(message)) => Ok(Some(message)),
            Ok(None) => {
                self.state = ReaderState::Done;
                Ok(None)
            }
            Err(err) => {
                self.state = ReaderState::Failed;
                Err(err)
            }
        }
    }

    /// Consume frames until a message is yielded or the stream ends.
    fn advance(&mut self) -> Result<Option<C::Message>, ReadError> {
        loop {
            let Some(frame) = read_frame(&mut self.source)? else {
                return Ok(None);
            };

            match FrameTag::from_u8(frame.tag) {
                Some(FrameTag::FileDescriptor) => {
                    self.codec.register_schema(&frame.payload)?;
                }
                Some(FrameTag::DescriptorName) => {
                    let name =
                        String::from_utf8(frame.payload).map_err(|_| ReadError::BadTypeName)?;
                    if !self.codec.contains_type(&name) {
                        return Err(ReadError::UnknownType { type_name: name });
                    }
                    self.pending_type = Some(name);
                }
                Some(FrameTag::Message) => {
                    // Kept, not cleared: the pending type covers the whole
                    // run of message frames until the next name frame.
                    let type_name = self.pending_type.as_ref().ok_or(ReadError::NoPendingType)?;
                    let message = self.codec.decode(type_name, &frame.payload)?;
                    return Ok(Some(message));
                }
                Some(FrameTag::Version) => {}
                None => {
                    return Err(ReadError::UnknownFrameTag { tag: frame.tag });
                }
            }
        }
    }

    /// Release the decompression envelope and the underlying handle.
    /// Callable from any state; dropping the reader is equivalent.
    pub fn close(self) {}

    /// Release the decompression envelope and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.source.into_inner().into_inner()
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }
}

/// Lazily yields decoded messages.  Iteration ends at a clean end of stream
/// or after the first error has been yielded.
impl<C: MessageCodec, R: Read> Iterator for PbzReader<C, R> {
    type Item = Result<C::Message, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read() {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) => None,
            Err(ReadError::Poisoned) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
