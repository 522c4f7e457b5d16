//! Serializer for checkpoints (checkpoint <-> bytes).
//!
//! Used by persistent Checkpointer implementations.

use super::{Checkpoint, CheckpointError};

/// Serializes and deserializes checkpoints for durable storage.
///
/// Used by persistent Checkpointer implementations (e.g. SqliteSaver). MemorySaver
/// stores `Checkpoint` values directly and does not use a Serializer.
pub trait Serializer: Send + Sync {
    fn serialize(&self, checkpoint: &Checkpoint) -> Result<Vec<u8>, CheckpointError>;
    fn deserialize(&self, bytes: &[u8]) -> Result<Checkpoint, CheckpointError>;
}

/// JSON-based serializer.
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, checkpoint: &Checkpoint) -> Result<Vec<u8>, CheckpointError> {
        serde_json::to_vec(checkpoint).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Checkpoint, CheckpointError> {
        serde_json::from_slice(bytes).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }
}
