//! Protobuf [`MessageCodec`] implementation for pbz streams.
//!
//! Messages are handled reflectively as [`DynamicMessage`]s, so a reader can
//! decode types it was never compiled against, using only the
//! `FileDescriptorSet` embedded in the stream.  The [`TypeRegistry`] wraps a
//! [`prost_reflect::DescriptorPool`] and maps fully-qualified type names to
//! message descriptors.

mod registry;

use pbzstream_core::{CodecError, MessageCodec};
use prost::Message as _;
use prost_reflect::{DescriptorPool, DynamicMessage, ReflectMessage as _};

pub use registry::TypeRegistry;

/// Codec that serializes [`DynamicMessage`]s with the protobuf wire format.
#[derive(Debug, Default, Clone)]
pub struct ProtobufCodec {
    registry: TypeRegistry,
}

impl ProtobufCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a codec over an existing registry.
    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self { registry }
    }

    /// Build a codec whose registry starts from `pool`.
    pub fn with_pool(pool: DescriptorPool) -> Self {
        Self {
            registry: TypeRegistry::from_pool(pool),
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }
}

impl MessageCodec for ProtobufCodec {
    type Message = DynamicMessage;

    fn register_schema(&mut self, blob: &[u8]) -> Result<(), CodecError> {
        self.registry.register_schema(blob)
    }

    fn contains_type(&self, type_name: &str) -> bool {
        self.registry.contains(type_name)
    }

    fn type_name(&self, message: &DynamicMessage) -> String {
        message.descriptor().full_name().to_string()
    }

    fn encode(&self, message: &DynamicMessage) -> Result<Vec<u8>, CodecError> {
        Ok(message.encode_to_vec())
    }

    fn decode(&self, type_name: &str, payload: &[u8]) -> Result<DynamicMessage, CodecError> {
        let descriptor = self.registry.resolve(type_name)?;
        DynamicMessage::decode(descriptor, payload).map_err(|e| CodecError::Decode {
            type_name: type_name.to_string(),
            source: Box::new(e),
        })
    }
}
