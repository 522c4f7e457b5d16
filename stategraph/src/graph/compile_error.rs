//! Graph compilation diagnostics.
//!
//! `StateGraph::compile` validates the whole graph and reports every problem at once.
//! Only [`Diagnostic::UnreachableNode`] is a warning; any other diagnostic prevents a
//! compiled graph from being produced.

use thiserror::Error;

/// One finding of compile-time validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// `add_node` was called twice with the same name.
    #[error("duplicate node name: {0}")]
    DuplicateNodeName(String),

    /// A node was registered under `START` or `END`.
    #[error("reserved node name: {0}")]
    ReservedNodeName(String),

    /// An edge or route table references a node that was never added
    /// (including `END` used as a source and `START` as a destination).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// A router declares a label its destination table does not map.
    #[error("router on `{node}` can return `{label}` but the table has no destination for it")]
    UnmappedRoute { node: String, label: String },

    /// No edge leaves `START`.
    #[error("graph has no entry point (no edge from START)")]
    MissingEntry,

    /// A node (or START) has more than one outgoing edge definition.
    #[error("node `{0}` has more than one outgoing edge; compose them into one router")]
    MultipleOutgoing(String),

    /// A node reachable from the entry has no outgoing edge.
    #[error("node `{0}` is reachable but has no outgoing edge")]
    NoOutgoingEdge(String),

    /// A node declares a write to a key the schema does not have.
    #[error("node `{node}` declares write to unknown state key `{key}`")]
    UnknownStateKey { node: String, key: String },

    /// A node cannot be reached from the entry point (warning only).
    #[error("node `{0}` is unreachable from START")]
    UnreachableNode(String),
}

impl Diagnostic {
    /// False only for warnings.
    pub fn is_error(&self) -> bool {
        !matches!(self, Diagnostic::UnreachableNode(_))
    }
}

/// Error returned by `StateGraph::compile` when any diagnostic is an error.
///
/// Carries every diagnostic found (warnings included), in discovery order.
#[derive(Debug, Clone, Error)]
#[error("graph compilation failed: {}", summary(.diagnostics))]
pub struct CompilationError {
    diagnostics: Vec<Diagnostic>,
}

fn summary(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .filter(|d| d.is_error())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CompilationError {
    pub(crate) fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Error diagnostics only (warnings filtered out).
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn contains(&self, diagnostic: &Diagnostic) -> bool {
        self.diagnostics.contains(diagnostic)
    }
}
