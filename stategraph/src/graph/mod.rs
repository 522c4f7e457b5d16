//! State graph: nodes, static and conditional edges, compile and run.
//!
//! Build a [`StateGraph`] over a [`StateSchema`](crate::state::StateSchema), add nodes and
//! edges, then `compile()` into an immutable [`CompiledStateGraph`]. Each
//! [`stream`](CompiledStateGraph::stream) call creates a [`GraphRun`] that executes one node
//! per pull and yields the partial update of every committed step.

mod compile_error;
mod compiled;
mod edge;
mod logging;
mod mermaid;
mod node;
mod node_middleware;
mod router;
mod run;
mod run_context;
mod state_graph;
mod subgraph;

pub use compile_error::{CompilationError, Diagnostic};
pub use compiled::CompiledStateGraph;
pub use edge::NodeId;
pub use node::{FnNode, Node, NodeKind, NodeOutput};
pub use node_middleware::{NodeFuture, NodeMiddleware};
pub use router::{FnRouter, Router};
pub use run::{GraphRun, RunStatus};
pub use run_context::ExecutionContext;
pub use state_graph::{StateGraph, END, START};
pub use subgraph::SubgraphNode;
