//! # stategraph
//!
//! A graph orchestration runtime. Workflows are directed graphs of nodes that read a
//! shared, schema-declared state and return partial updates; edges (static or routed on
//! state) pick the next node. Cycles are allowed and bounded by a per-run recursion
//! limit. Runs are pull-driven streams of per-step deltas, can be checkpointed per thread
//! and resumed, and whole graphs can be embedded as a single node of another graph.
//!
//! ## Design Principles
//!
//! - **Schema-declared state**: every key has a merge policy (`Replace` or `Append`);
//!   updates touching undeclared keys are rejected, and a merge applies fully or not at all.
//! - **Validate at compile**: `StateGraph::compile` reports every structural problem at
//!   once; a compiled graph is immutable and shareable.
//! - **Route on committed state**: routers see the state after the node's update is merged.
//! - **Lazy runs**: nothing executes ahead of the consumer; one pull, one node.
//!
//! ## Main Modules
//!
//! - [`state`]: `StateSchema`, `MergePolicy`, `State`, `StateUpdate`.
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `Router`, `GraphRun`, `SubgraphNode`.
//! - [`memory`]: `Checkpointer`, `MemorySaver`, optional `SqliteSaver`, `RunnableConfig`.
//! - [`stream`]: `StepEvent`, the per-step delta yielded by a run.
//! - [`error`]: `GraphError`, `NodeError`, `SchemaViolation`.
//!
//! ## Features
//!
//! - `sqlite` (default): persistent checkpointer backed by a SQLite file.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use stategraph::{
//!     FnNode, FnRouter, NodeOutput, RunnableConfig, State, StateGraph, StateSchema,
//!     StateUpdate, END, START,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let schema = StateSchema::new()
//!     .replace_with_default("draft", 0)
//!     .append("notes");
//!
//! let mut graph = StateGraph::new(schema);
//! graph.add_node("write", Arc::new(FnNode::new(|s: &State| {
//!     let draft = s.get_i64("draft").unwrap_or(0) + 1;
//!     Ok(NodeOutput::Update(
//!         StateUpdate::new().set("draft", draft).append("notes", [format!("draft {}", draft)]),
//!     ))
//! })));
//! graph.add_edge(START, "write");
//! graph.add_conditional_edges(
//!     "write",
//!     Arc::new(FnRouter::new(["again", "done"], |s: &State| {
//!         if s.get_i64("draft").unwrap_or(0) < 3 { "again".to_string() } else { "done".to_string() }
//!     })),
//!     [("again", "write"), ("done", END)],
//! );
//!
//! let compiled = graph.compile().unwrap();
//! let out = compiled
//!     .invoke(StateUpdate::new(), RunnableConfig::new(10))
//!     .await
//!     .unwrap();
//! assert_eq!(out.get_i64("draft"), Some(3));
//! assert_eq!(out.get_seq("notes").len(), 3);
//! # }
//! ```

pub mod error;
pub mod graph;
pub mod memory;
pub mod state;
pub mod stream;

pub use error::{GraphError, NodeError, SchemaViolation};
pub use graph::{
    CompilationError, CompiledStateGraph, Diagnostic, ExecutionContext, FnNode, FnRouter,
    GraphRun, Node, NodeFuture, NodeId, NodeKind, NodeMiddleware, NodeOutput, Router,
    RunStatus, StateGraph, SubgraphNode, END, START,
};
pub use memory::{
    Checkpoint, CheckpointError, Checkpointer, JsonSerializer, MemorySaver, RunnableConfig,
    Serializer,
};
#[cfg(feature = "sqlite")]
pub use memory::SqliteSaver;
pub use state::{MergePolicy, State, StateSchema, StateUpdate};
pub use stream::StepEvent;
