//! Graph node trait: one unit of work in a StateGraph.
//!
//! Receives a read-only view of the state and returns a partial update, or a
//! control signal asking the engine to stop. Used by `StateGraph` and
//! `CompiledStateGraph`.

use async_trait::async_trait;

use crate::error::NodeError;
use crate::state::{State, StateUpdate};

use super::CompiledStateGraph;

/// Capability tag of a node. The engine treats both the same way; the tag is
/// reported in logs and in the rendered graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Returns without awaiting anything external.
    Sync,
    /// May await I/O (external call, sub-graph run).
    Suspending,
}

/// What a node hands back to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOutput {
    /// Merge this update, then follow the node's outgoing edge.
    Update(StateUpdate),
    /// Merge this update, then end the run (`DONE`) without consulting edges.
    Halt(StateUpdate),
}

impl NodeOutput {
    pub fn update(&self) -> &StateUpdate {
        match self {
            NodeOutput::Update(u) | NodeOutput::Halt(u) => u,
        }
    }
}

impl From<StateUpdate> for NodeOutput {
    fn from(update: StateUpdate) -> Self {
        NodeOutput::Update(update)
    }
}

/// One step in a graph: state view in, partial update (or halt) out.
///
/// Nodes never see `&mut State`; the engine owns the state and merges the
/// returned update according to the schema.
///
/// **Interaction**: Registered via `StateGraph::add_node`; invoked by `GraphRun`,
/// optionally wrapped by a `NodeMiddleware`.
#[async_trait]
pub trait Node: Send + Sync {
    async fn run(&self, state: &State) -> Result<NodeOutput, NodeError>;

    fn kind(&self) -> NodeKind {
        NodeKind::Suspending
    }

    /// Keys this node may write. `None` means any declared key.
    ///
    /// Checked against the schema at compile time and against each update at run time.
    fn writes(&self) -> Option<Vec<String>> {
        None
    }

    /// The embedded graph when this node is a sub-graph adapter.
    fn subgraph(&self) -> Option<&CompiledStateGraph> {
        None
    }
}

/// Node backed by a synchronous closure.
///
/// ```
/// use stategraph::{FnNode, NodeOutput, State, StateUpdate};
///
/// let node = FnNode::new(|state: &State| {
///     let q = state.get_str("question").unwrap_or_default().to_uppercase();
///     Ok(NodeOutput::Update(StateUpdate::new().set("question", q)))
/// })
/// .with_writes(["question"]);
/// # let _ = node;
/// ```
pub struct FnNode<F> {
    f: F,
    writes: Option<Vec<String>>,
}

impl<F> FnNode<F>
where
    F: Fn(&State) -> Result<NodeOutput, NodeError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f, writes: None }
    }

    /// Declares the write-set (see [`Node::writes`]).
    pub fn with_writes<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.writes = Some(keys.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl<F> Node for FnNode<F>
where
    F: Fn(&State) -> Result<NodeOutput, NodeError> + Send + Sync,
{
    async fn run(&self, state: &State) -> Result<NodeOutput, NodeError> {
        (self.f)(state)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Sync
    }

    fn writes(&self) -> Option<Vec<String>> {
        self.writes.clone()
    }
}
