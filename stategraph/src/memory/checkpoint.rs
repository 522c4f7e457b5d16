//! Checkpoint: immutable snapshot of a run between steps.

use serde::{Deserialize, Serialize};

use crate::state::State;

/// Snapshot `{thread_id, state, next_node, step}` written after every successful step.
///
/// `next_node` is the node that would run next; `None` means the run reached `END`
/// (or halted), so the lineage is finished and a new run on the same thread starts
/// again from the entry point with this state as its base.
///
/// **Interaction**: Produced by `GraphRun`; persisted through [`Checkpointer::put`](super::Checkpointer::put);
/// read back once at run start via [`Checkpointer::get`](super::Checkpointer::get).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub thread_id: String,
    pub state: State,
    pub next_node: Option<String>,
    pub step: usize,
}

impl Checkpoint {
    pub fn new(
        thread_id: impl Into<String>,
        state: State,
        next_node: Option<String>,
        step: usize,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            state,
            next_node,
            step,
        }
    }

    /// True when the checkpointed run reached `END`.
    pub fn is_finished(&self) -> bool {
        self.next_node.is_none()
    }
}
