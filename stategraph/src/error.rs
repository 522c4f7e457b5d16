//! Run-time error types.
//!
//! [`GraphError`] is the terminal value of a failed run; [`NodeError`] is what node
//! implementations return; [`SchemaViolation`] describes an update that does not fit
//! the state schema. Build-time problems are reported separately as
//! [`CompilationError`](crate::graph::CompilationError).

use thiserror::Error;

use crate::memory::CheckpointError;

/// Error returned by a node invocation.
///
/// The engine never retries a failed node; the error is wrapped in
/// [`GraphError::Node`] and ends the run.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Execution failed with a message (e.g. the external collaborator call failed).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// An embedded sub-graph ended in `FAILED`.
    #[error("sub-graph failed: {0}")]
    Subgraph(#[source] Box<GraphError>),
}

impl NodeError {
    /// Shorthand for [`NodeError::ExecutionFailed`].
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }
}

/// An update that is inconsistent with the declared state schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    /// The update names a key the schema does not declare.
    #[error("unknown state key `{0}`")]
    UnknownKey(String),

    /// An `Append` key received (or holds) something other than a sequence.
    #[error("state key `{0}` uses append policy but value is not a sequence")]
    NotASequence(String),

    /// The node wrote a key outside its declared write-set.
    #[error("node `{node}` wrote undeclared key `{key}`")]
    UndeclaredWrite { node: String, key: String },
}

/// Terminal error of a run. A run that yields this transitions to `FAILED`;
/// its last committed state stays available through `GraphRun::final_state`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("schema violation: {0}")]
    SchemaViolation(#[from] SchemaViolation),

    /// A router produced a label that is absent from its destination table.
    #[error("routing error: router on `{node}` returned unmapped label `{label}`")]
    Routing { node: String, label: String },

    #[error("recursion limit of {limit} steps exceeded")]
    RecursionLimitExceeded { limit: usize },

    /// The node invocation itself failed; `source` is propagated unmodified.
    #[error("node `{node}` failed: {source}")]
    Node {
        node: String,
        #[source]
        source: NodeError,
    },

    #[error("checkpoint: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// The stored checkpoint points at a node this graph does not have.
    #[error("checkpoint resumes at unknown node `{0}`")]
    ResumeTarget(String),
}
