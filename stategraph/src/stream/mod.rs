//! Streaming types for graph runs.
//!
//! A run yields one [`StepEvent`] per committed step: the partial update the node
//! returned (the delta) plus where the run goes next. Used by `GraphRun::next_step`
//! and `GraphRun::into_stream`.

use serde::Serialize;

use crate::state::StateUpdate;

/// One committed step of a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepEvent {
    /// Step counter after this step (first step is 1; resumed runs continue the count).
    pub step: usize,
    /// Node that produced the update.
    pub node: String,
    /// The partial update that was merged.
    pub update: StateUpdate,
    /// Node scheduled next; `None` when the run reached `END`.
    pub next: Option<String>,
    /// True when the node returned a halt signal.
    pub halted: bool,
}

impl StepEvent {
    /// True when this is the last step of the run.
    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }
}
