//! Run config: recursion limit and thread id.
//!
//! Passed to `CompiledStateGraph::stream` / `invoke`; the run driver supplies it.

/// Config for a single run.
///
/// `recursion_limit` is required: cycles are allowed in a graph, so only this bound
/// guarantees termination. There is deliberately no `Default`.
///
/// **Interaction**: Consumed by `CompiledStateGraph::stream` to build the run's
/// `ExecutionContext`; `thread_id` keys the `Checkpointer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnableConfig {
    /// Maximum number of node steps a run (or resumed lineage) may take.
    pub recursion_limit: usize,
    /// Identifies the checkpoint lineage. Without it nothing is read or written.
    pub thread_id: Option<String>,
}

impl RunnableConfig {
    pub fn new(recursion_limit: usize) -> Self {
        Self {
            recursion_limit,
            thread_id: None,
        }
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }
}
