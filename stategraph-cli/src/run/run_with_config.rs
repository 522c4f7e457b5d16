//! Builds the configured topology, streams the run, reports each step.

use stategraph::{CompiledStateGraph, RunnableConfig, State, StepEvent};

use crate::config::{Error, RunConfig};
use crate::middleware::WithNodeLogging;

use super::build_checkpointer;

/// Runs the configured topology on `question` and returns the final state.
///
/// The graph is compiled with a checkpointer when `config.thread_id` is set, so an
/// interrupted thread resumes where it stopped, and with
/// [`LoggingMiddleware`](crate::LoggingMiddleware) when `config.verbose` is set.
/// `on_step` sees every committed step in order; a run error is returned after the
/// steps that did commit.
pub async fn run_with_config<F>(
    config: &RunConfig,
    question: &str,
    mut on_step: F,
) -> Result<State, Error>
where
    F: FnMut(&StepEvent),
{
    let compiled = compile_topology(config)?;

    let mut runnable = RunnableConfig::new(config.recursion_limit);
    if let Some(thread_id) = config.thread_id() {
        runnable = runnable.with_thread_id(thread_id);
    }
    tracing::info!(
        topology = config.topology.name(),
        recursion_limit = config.recursion_limit,
        thread_id = config.thread_id().unwrap_or(""),
        "run"
    );

    let mut run = compiled.stream(config.topology.input(question), runnable);
    while let Some(event) = run.next_step().await {
        on_step(&event?);
    }
    Ok(run.state().clone())
}

/// Compiles the configured topology: checkpointer per thread id, node logging per verbose.
pub(crate) fn compile_topology(config: &RunConfig) -> Result<CompiledStateGraph, Error> {
    let checkpointer = build_checkpointer(config)?;
    let graph = config.topology.graph()?;
    let compiled = match (config.verbose, checkpointer) {
        (true, checkpointer) => graph.compile_with_node_logging(checkpointer)?,
        (false, Some(cp)) => graph.compile_with_checkpointer(cp)?,
        (false, None) => graph.compile()?,
    };
    Ok(compiled)
}
