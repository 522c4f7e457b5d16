//! Compiled state graph: immutable, cheap to clone, shareable across runs.
//!
//! Built by `StateGraph::compile` (or a `compile_with_*` variant). Nodes and their
//! outgoing edges live in one dense vector indexed by `NodeId`. Each call to `stream`
//! creates an independent `GraphRun`; the only thing runs share is the checkpointer.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::error::{GraphError, NodeError};
use crate::memory::{Checkpoint, Checkpointer, RunnableConfig};
use crate::state::{State, StateSchema, StateUpdate};

use super::compile_error::Diagnostic;
use super::edge::{Edge, NodeId};
use super::node::{Node, NodeOutput};
use super::node_middleware::NodeMiddleware;
use super::run::GraphRun;

pub(crate) struct NodeEntry {
    pub(crate) name: String,
    pub(crate) node: Arc<dyn Node>,
    /// Declared write-set; `None` = any schema key.
    pub(crate) writes: Option<HashSet<String>>,
    pub(crate) edge: Edge,
}

pub(crate) struct GraphInner {
    pub(crate) schema: StateSchema,
    pub(crate) nodes: Vec<NodeEntry>,
    pub(crate) index: HashMap<String, NodeId>,
    pub(crate) entry: Edge,
    pub(crate) checkpointer: Option<Arc<dyn Checkpointer>>,
    pub(crate) middleware: Option<Arc<dyn NodeMiddleware>>,
    pub(crate) warnings: Vec<Diagnostic>,
}

impl GraphInner {
    pub(crate) fn entry_of(&self, id: NodeId) -> &NodeEntry {
        &self.nodes[id.0]
    }

    /// Invokes one node, through the middleware when one is attached.
    pub(crate) async fn invoke_node(
        &self,
        entry: &NodeEntry,
        state: &State,
    ) -> Result<NodeOutput, NodeError> {
        let call = entry.node.run(state);
        match &self.middleware {
            Some(middleware) => middleware.around_run(&entry.name, state, call).await,
            None => call.await,
        }
    }
}

/// Compiled graph: immutable structure, supports `stream` and `invoke`.
///
/// Created by `StateGraph::compile()` or `compile_with_checkpointer()`. When a
/// checkpointer is attached and the run config has a `thread_id`, every committed
/// step is checkpointed and a later run on the same thread resumes from it.
#[derive(Clone)]
pub struct CompiledStateGraph {
    pub(crate) inner: Arc<GraphInner>,
}

impl CompiledStateGraph {
    pub(crate) fn from_inner(inner: GraphInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Starts a run. Nothing executes until the returned `GraphRun` is pulled.
    ///
    /// `input` is merged into the schema's initial state (or into the state of a
    /// finished checkpoint on the same thread). When an unfinished checkpoint exists for
    /// `config.thread_id`, the run resumes from it and `input` is ignored.
    pub fn stream(&self, input: StateUpdate, config: RunnableConfig) -> GraphRun {
        GraphRun::new(self.clone(), input, config)
    }

    /// Runs to `DONE` and returns the final state, or the terminal error of a `FAILED` run.
    pub async fn invoke(
        &self,
        input: StateUpdate,
        config: RunnableConfig,
    ) -> Result<State, GraphError> {
        self.stream(input, config).run_to_end().await
    }

    /// Latest checkpoint for `thread_id`; `None` without a checkpointer.
    pub async fn get_state(&self, thread_id: &str) -> Result<Option<Checkpoint>, GraphError> {
        match &self.inner.checkpointer {
            Some(checkpointer) => Ok(checkpointer.get(thread_id).await?),
            None => Ok(None),
        }
    }

    pub fn schema(&self) -> &StateSchema {
        &self.inner.schema
    }

    /// Node names in registration order (which is also `NodeId` order).
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.inner.nodes.iter().map(|n| n.name.as_str())
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.inner.index.get(name).copied()
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.inner.nodes.get(id.0).map(|n| n.name.as_str())
    }

    /// Warnings found at compile time (unreachable nodes).
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.inner.warnings
    }

    pub fn checkpointer(&self) -> Option<&Arc<dyn Checkpointer>> {
        self.inner.checkpointer.as_ref()
    }
}

impl fmt::Debug for CompiledStateGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledStateGraph")
            .field("nodes", &self.node_names().collect::<Vec<_>>())
            .field("checkpointer", &self.inner.checkpointer.is_some())
            .field("middleware", &self.inner.middleware.is_some())
            .finish()
    }
}
