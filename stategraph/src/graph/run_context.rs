//! Per-run execution context.
//!
//! Holds current state, current node pointer, step counter, recursion limit and
//! thread id. Owned by exactly one `GraphRun`; never shared between runs.

use crate::memory::RunnableConfig;
use crate::state::State;

use super::NodeId;

#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub(crate) state: State,
    /// Node to run on the next step; `None` once `END` is reached.
    pub(crate) current: Option<NodeId>,
    pub(crate) step: usize,
    pub(crate) recursion_limit: usize,
    pub(crate) thread_id: Option<String>,
}

impl ExecutionContext {
    pub(crate) fn new(state: State, config: &RunnableConfig) -> Self {
        Self {
            state,
            current: None,
            step: 0,
            recursion_limit: config.recursion_limit,
            thread_id: config.thread_id.clone(),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Number of committed steps (including steps restored from a checkpoint).
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }
}
