//! Logging middleware that traces node enter/exit around each node invocation.

use async_trait::async_trait;

use stategraph::{NodeError, NodeFuture, NodeMiddleware, NodeOutput, State};

/// Middleware that logs node enter/exit around each node invocation.
///
/// Emits `tracing` debug events so that step output on stdout stays clean; enable with
/// `--verbose` or `RUST_LOG=stategraph_cli=debug`.
pub struct LoggingMiddleware;

#[async_trait]
impl NodeMiddleware for LoggingMiddleware {
    async fn around_run<'a>(
        &'a self,
        node: &'a str,
        state: &'a State,
        inner: NodeFuture<'a>,
    ) -> Result<NodeOutput, NodeError> {
        tracing::debug!(node, keys = state.iter().count(), "node enter");
        let result = inner.await;
        match &result {
            Ok(output) => tracing::debug!(
                node,
                update = %output.update().to_json(),
                halted = matches!(output, NodeOutput::Halt(_)),
                "node exit"
            ),
            Err(e) => tracing::warn!(node, error = %e, "node failed"),
        }
        result
    }
}
