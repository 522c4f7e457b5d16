//! Logging utilities for graph execution.
//!
//! Structured `tracing` events for run start/finish, node execution and resume.

use crate::error::GraphError;

use super::NodeKind;

/// Log run start. `thread_id` is empty when the run is not checkpointed.
pub fn log_run_start(thread_id: Option<&str>, recursion_limit: usize) {
    tracing::info!(
        thread_id = thread_id.unwrap_or(""),
        recursion_limit,
        "Starting graph run"
    );
}

/// Log a resume from an unfinished checkpoint.
pub fn log_resume(thread_id: &str, node: &str, step: usize) {
    tracing::info!(thread_id, node, step, "Resuming graph run from checkpoint");
}

/// Log that a resumed run discarded the caller's new input.
pub fn log_input_ignored<'a>(thread_id: &str, keys: impl Iterator<Item = &'a str>) {
    let keys = keys.collect::<Vec<_>>().join(",");
    tracing::warn!(thread_id, keys = %keys, "Input ignored: resuming unfinished checkpoint");
}

/// Log node execution start.
pub fn log_node_start(node: &str, kind: NodeKind, step: usize) {
    tracing::debug!(node, ?kind, step, "Starting node execution");
}

/// Log a committed step: state merged, next node resolved.
pub fn log_step_complete(node: &str, step: usize, next: Option<&str>) {
    tracing::debug!(node, step, next = next.unwrap_or("__end__"), "Step committed");
}

/// Log run completion.
pub fn log_run_complete(thread_id: Option<&str>, steps: usize) {
    tracing::info!(thread_id = thread_id.unwrap_or(""), steps, "Graph run complete");
}

/// Log run failure.
pub fn log_run_error(thread_id: Option<&str>, steps: usize, error: &GraphError) {
    tracing::error!(
        thread_id = thread_id.unwrap_or(""),
        steps,
        %error,
        "Graph run failed"
    );
}
