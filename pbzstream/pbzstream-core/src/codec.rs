//! Codec trait connecting the stream layer to a concrete message encoding.

use crate::error::CodecError;

/// Serialization seam used by the stream writer and reader.
///
/// Implementations own the type registry populated from schema blobs
/// embedded in the stream; `pbzstream-protobuf` provides the protobuf
/// implementation over a descriptor pool.
pub trait MessageCodec {
    /// Concrete message type produced and consumed by this codec.
    type Message;

    /// Parse a schema descriptor blob and make the type names it defines
    /// resolvable.  Registering a byte-identical blob again is a no-op.
    fn register_schema(&mut self, blob: &[u8]) -> Result<(), CodecError>;

    /// Whether `type_name` resolves against a registered schema.
    fn contains_type(&self, type_name: &str) -> bool;

    /// Fully-qualified type name of a message.
    fn type_name(&self, message: &Self::Message) -> String;

    /// Serialize a message to its wire bytes.
    fn encode(&self, message: &Self::Message) -> Result<Vec<u8>, CodecError>;

    /// Construct a fresh instance of `type_name` and decode `payload` into
    /// it.
    fn decode(&self, type_name: &str, payload: &[u8]) -> Result<Self::Message, CodecError>;
}
