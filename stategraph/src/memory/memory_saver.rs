//! In-memory checkpointer (MemorySaver).
//!
//! Keyed by thread id in a `DashMap`: writes to one thread id are atomic, writes to
//! different thread ids proceed in parallel on separate shards.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{Checkpoint, CheckpointError, Checkpointer};

/// In-memory checkpointer. Not persistent; for dev and tests.
///
/// **Interaction**: Used as `Arc<dyn Checkpointer>` in `StateGraph::compile_with_checkpointer`.
#[derive(Debug, Default)]
pub struct MemorySaver {
    inner: DashMap<String, Checkpoint>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of threads with a stored checkpoint.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl Checkpointer for MemorySaver {
    async fn put(&self, thread_id: &str, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        if thread_id.is_empty() {
            return Err(CheckpointError::ThreadIdRequired);
        }
        self.inner.insert(thread_id.to_string(), checkpoint.clone());
        Ok(())
    }

    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        if thread_id.is_empty() {
            return Err(CheckpointError::ThreadIdRequired);
        }
        Ok(self.inner.get(thread_id).map(|entry| entry.value().clone()))
    }
}
