//! Node middleware: wraps every node invocation of a compiled graph.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::state::State;

use super::NodeOutput;

/// The pending node invocation handed to middleware.
pub type NodeFuture<'a> = Pin<Box<dyn Future<Output = Result<NodeOutput, NodeError>> + Send + 'a>>;

/// Wraps each node invocation (logging, timing, tracing spans).
///
/// `inner` is the node's pending invocation; await it to run the node. Whatever is
/// returned is what the engine merges and routes on.
///
/// **Interaction**: Attached via `StateGraph::compile_with_middleware`; called by `GraphRun`
/// once per step.
#[async_trait]
pub trait NodeMiddleware: Send + Sync {
    async fn around_run<'a>(
        &'a self,
        node: &'a str,
        state: &'a State,
        inner: NodeFuture<'a>,
    ) -> Result<NodeOutput, NodeError>;
}
