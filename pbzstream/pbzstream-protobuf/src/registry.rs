//! Instance-scoped registry mapping type names to message descriptors.

use std::collections::HashSet;

use pbzstream_core::CodecError;
use prost_reflect::{DescriptorPool, DynamicMessage, MessageDescriptor};

/// Registry of message types populated from serialized `FileDescriptorSet`
/// blobs.
///
/// Deliberately instance-scoped rather than process-wide: two readers fed
/// conflicting schemas never interfere through shared state.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    pool: DescriptorPool,
    registered: HashSet<Vec<u8>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry over an existing descriptor pool, e.g. one seeded
    /// with compiled-in descriptors.
    pub fn from_pool(pool: DescriptorPool) -> Self {
        Self {
            pool,
            registered: HashSet::new(),
        }
    }

    /// Register every type defined by a serialized `FileDescriptorSet`.
    ///
    /// Registering a byte-identical blob again is a no-op.  A blob that
    /// redefines an already-registered name with different contents is
    /// rejected with [`CodecError::SchemaParse`]; the earlier definition
    /// stays in effect.
    pub fn register_schema(&mut self, blob: &[u8]) -> Result<(), CodecError> {
        if self.registered.contains(blob) {
            return Ok(());
        }
        self.pool
            .decode_file_descriptor_set(blob)
            .map_err(|e| CodecError::SchemaParse {
                source: Box::new(e),
            })?;
        self.registered.insert(blob.to_vec());
        Ok(())
    }

    /// Resolve a fully-qualified type name to its descriptor.
    ///
    /// The descriptor acts as the constructor: [`TypeRegistry::new_message`]
    /// builds a zero-valued mutable instance from it.
    pub fn resolve(&self, type_name: &str) -> Result<MessageDescriptor, CodecError> {
        self.pool
            .get_message_by_name(type_name)
            .ok_or_else(|| CodecError::UnknownType {
                type_name: type_name.to_string(),
            })
    }

    /// Whether `type_name` resolves.
    pub fn contains(&self, type_name: &str) -> bool {
        self.pool.get_message_by_name(type_name).is_some()
    }

    /// Construct an empty instance of the named type.
    pub fn new_message(&self, type_name: &str) -> Result<DynamicMessage, CodecError> {
        Ok(DynamicMessage::new(self.resolve(type_name)?))
    }

    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }
}
