//! Sub-graph node: runs a whole compiled graph as one step of a parent graph.
//!
//! The parent state is mapped into the child's input, the child runs to completion
//! under its own recursion limit, and the child's final state is mapped back into a
//! parent update. The child never sees or mutates the parent state directly, and its
//! internal steps count as a single parent step.

use async_trait::async_trait;

use crate::error::NodeError;
use crate::memory::RunnableConfig;
use crate::state::{State, StateUpdate};

use super::{CompiledStateGraph, Node, NodeKind, NodeOutput};

type Mapping = Box<dyn Fn(&State) -> StateUpdate + Send + Sync>;

/// Adapter wrapping a [`CompiledStateGraph`] as a [`Node`].
///
/// ```
/// use std::sync::Arc;
/// use stategraph::{FnNode, NodeOutput, State, StateGraph, StateSchema, StateUpdate, SubgraphNode, END, START};
///
/// let mut child = StateGraph::new(StateSchema::new().replace("topic").replace("draft"));
/// child.add_node("write", Arc::new(FnNode::new(|s: &State| {
///     let draft = format!("notes on {}", s.get_str("topic").unwrap_or_default());
///     Ok(NodeOutput::Update(StateUpdate::new().set("draft", draft)))
/// })));
/// child.add_edge(START, "write").add_edge("write", END);
///
/// let node = SubgraphNode::new(
///     child.compile().unwrap(),
///     10,
///     |parent: &State| StateUpdate::new().set("topic", parent.get("question").cloned().unwrap_or_default()),
///     |child: &State| StateUpdate::new().set("answer", child.get("draft").cloned().unwrap_or_default()),
/// )
/// .with_writes(["answer"]);
/// # let _ = node;
/// ```
pub struct SubgraphNode {
    graph: CompiledStateGraph,
    recursion_limit: usize,
    to_child: Mapping,
    to_parent: Mapping,
    writes: Option<Vec<String>>,
}

impl SubgraphNode {
    /// `to_child` builds the child's input from the parent state; `to_parent` builds the
    /// parent update from the child's final state.
    pub fn new<C, P>(
        graph: CompiledStateGraph,
        recursion_limit: usize,
        to_child: C,
        to_parent: P,
    ) -> Self
    where
        C: Fn(&State) -> StateUpdate + Send + Sync + 'static,
        P: Fn(&State) -> StateUpdate + Send + Sync + 'static,
    {
        Self {
            graph,
            recursion_limit,
            to_child: Box::new(to_child),
            to_parent: Box::new(to_parent),
            writes: None,
        }
    }

    pub fn with_writes<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.writes = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }
}

#[async_trait]
impl Node for SubgraphNode {
    async fn run(&self, state: &State) -> Result<NodeOutput, NodeError> {
        let input = (self.to_child)(state);
        let config = RunnableConfig::new(self.recursion_limit);
        let child_state = self
            .graph
            .invoke(input, config)
            .await
            .map_err(|e| NodeError::Subgraph(Box::new(e)))?;
        Ok(NodeOutput::Update((self.to_parent)(&child_state)))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Suspending
    }

    fn writes(&self) -> Option<Vec<String>> {
        self.writes.clone()
    }

    fn subgraph(&self) -> Option<&CompiledStateGraph> {
        Some(&self.graph)
    }
}
