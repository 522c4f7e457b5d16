//! Checkpointer trait and CheckpointError.
//!
//! Two-method contract keyed by thread id. Each `put` supersedes the previous
//! checkpoint of that thread; nothing is deleted by the engine.

use async_trait::async_trait;

use super::Checkpoint;

/// Error type for checkpoint operations.
///
/// Used by Checkpointer::put, get and by Serializer.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("thread_id required")]
    ThreadIdRequired,
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("storage: {0}")]
    Storage(String),
}

/// Saves and loads the latest checkpoint per thread id.
///
/// Implementations must make operations on one thread id atomic with respect to each
/// other; operations on different thread ids are independent.
/// Implementations: [`MemorySaver`](super::MemorySaver), `SqliteSaver` (feature `sqlite`).
///
/// **Interaction**: Injected at compile via `StateGraph::compile_with_checkpointer`;
/// `GraphRun` reads once at start and writes after every committed step when
/// `RunnableConfig::thread_id` is set.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Stores `checkpoint` as the latest for `thread_id`, replacing any previous one.
    async fn put(&self, thread_id: &str, checkpoint: &Checkpoint) -> Result<(), CheckpointError>;

    /// Latest checkpoint for `thread_id`, or `None` if the thread has none.
    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>, CheckpointError>;
}
