//! Execution engine: a pull-driven, step-wise interpreter over a compiled graph.
//!
//! A `GraphRun` does no work until `next_step` is awaited, and exactly one node step
//! per call. Dropping the run (or just not pulling again) is how a consumer stops it.
//!
//! Each step:
//! 1. fail with `RecursionLimitExceeded` if the limit is already used up;
//! 2. invoke the current node with a view of the state;
//! 3. check the update against the node's write-set and merge it (all-or-nothing);
//! 4. resolve the outgoing edge against the post-merge state;
//! 5. checkpoint `{state, next, step}` when a thread id and checkpointer are present;
//! 6. commit and yield the delta.
//!
//! A failure in 2–5 leaves the previous state in place and ends the run.

use futures::Stream;

use crate::error::{GraphError, SchemaViolation};
use crate::memory::{Checkpoint, RunnableConfig};
use crate::state::{State, StateUpdate};
use crate::stream::StepEvent;

use super::edge::Target;
use super::logging::{
    log_input_ignored, log_node_start, log_resume, log_run_complete, log_run_error,
    log_run_start, log_step_complete,
};
use super::{CompiledStateGraph, ExecutionContext, NodeOutput, START};

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Created, nothing executed yet.
    Ready,
    /// A step is in progress.
    Running,
    /// A step was yielded; waiting for the consumer to pull the next one.
    Suspended,
    /// Reached `END` (or a node halted).
    Done,
    /// Ended with an error; the last committed state is kept.
    Failed,
}

/// One in-flight run of a compiled graph.
///
/// Yields one [`StepEvent`] per committed step through [`next_step`](GraphRun::next_step)
/// (or [`into_stream`](GraphRun::into_stream)); a failed run yields its error once,
/// then nothing. Not restartable: start a new run (or resume via checkpoint) instead.
pub struct GraphRun {
    graph: CompiledStateGraph,
    ctx: ExecutionContext,
    input: Option<StateUpdate>,
    status: RunStatus,
}

impl GraphRun {
    pub(crate) fn new(graph: CompiledStateGraph, input: StateUpdate, config: RunnableConfig) -> Self {
        let initial = graph.inner.schema.initial_state();
        Self {
            ctx: ExecutionContext::new(initial, &config),
            graph,
            input: Some(input),
            status: RunStatus::Ready,
        }
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    /// Current (last committed) state.
    pub fn state(&self) -> &State {
        &self.ctx.state
    }

    /// Final state once the run is `Done` or `Failed`.
    pub fn final_state(&self) -> Option<&State> {
        match self.status {
            RunStatus::Done | RunStatus::Failed => Some(&self.ctx.state),
            _ => None,
        }
    }

    /// Committed steps so far.
    pub fn step(&self) -> usize {
        self.ctx.step
    }

    /// Name of the node the next pull will run.
    pub fn next_node(&self) -> Option<&str> {
        self.ctx
            .current
            .and_then(|id| self.graph.node_name(id))
    }

    /// Executes at most one step and returns its delta.
    ///
    /// `None` once the run is `Done` or after a failure has been returned.
    pub async fn next_step(&mut self) -> Option<Result<StepEvent, GraphError>> {
        if matches!(self.status, RunStatus::Done | RunStatus::Failed) {
            return None;
        }
        let starting = self.status == RunStatus::Ready;
        self.status = RunStatus::Running;
        if starting {
            log_run_start(self.ctx.thread_id(), self.ctx.recursion_limit);
            if let Err(e) = self.start().await {
                return Some(Err(self.fail(e)));
            }
        }
        match self.advance().await {
            Ok(Some(event)) => {
                if event.is_terminal() {
                    self.finish();
                } else {
                    self.status = RunStatus::Suspended;
                }
                Some(Ok(event))
            }
            Ok(None) => {
                self.finish();
                None
            }
            Err(e) => Some(Err(self.fail(e))),
        }
    }

    /// Pulls until the run ends. Returns the final state or the terminal error.
    pub async fn run_to_end(mut self) -> Result<State, GraphError> {
        while let Some(item) = self.next_step().await {
            item?;
        }
        Ok(self.ctx.state)
    }

    /// The run as a lazy `Stream` of step deltas.
    pub fn into_stream(self) -> impl Stream<Item = Result<StepEvent, GraphError>> + Send {
        futures::stream::unfold(self, |mut run| async move {
            let item = run.next_step().await?;
            Some((item, run))
        })
    }

    fn finish(&mut self) {
        self.status = RunStatus::Done;
        log_run_complete(self.ctx.thread_id(), self.ctx.step);
    }

    fn fail(&mut self, error: GraphError) -> GraphError {
        self.status = RunStatus::Failed;
        log_run_error(self.ctx.thread_id(), self.ctx.step, &error);
        error
    }

    /// Selects the first node: resume target of an unfinished checkpoint, otherwise the
    /// entry edge evaluated on the initial state. Checkpointed state is restored through
    /// the schema, so a checkpoint written by another graph fails with a schema violation.
    async fn start(&mut self) -> Result<(), GraphError> {
        let graph = self.graph.inner.clone();
        let input = self.input.take().unwrap_or_default();
        let mut base = graph.schema.initial_state();

        if let (Some(checkpointer), Some(thread_id)) = (&graph.checkpointer, self.ctx.thread_id.clone()) {
            if let Some(checkpoint) = checkpointer.get(&thread_id).await? {
                match checkpoint.next_node {
                    Some(name) => {
                        let id = graph
                            .index
                            .get(&name)
                            .copied()
                            .ok_or_else(|| GraphError::ResumeTarget(name.clone()))?;
                        let state = graph.schema.restore(checkpoint.state)?;
                        log_resume(&thread_id, &name, checkpoint.step);
                        if !input.is_empty() {
                            log_input_ignored(&thread_id, input.keys());
                        }
                        self.ctx.state = state;
                        self.ctx.step = checkpoint.step;
                        self.ctx.current = Some(id);
                        return Ok(());
                    }
                    None => base = graph.schema.restore(checkpoint.state)?,
                }
            }
        }

        let state = graph.schema.merge(&base, &input)?;
        let first = graph.entry.resolve(START, &state)?;
        self.ctx.state = state;
        self.ctx.current = first.node();
        Ok(())
    }

    async fn advance(&mut self) -> Result<Option<StepEvent>, GraphError> {
        let Some(id) = self.ctx.current else {
            return Ok(None);
        };
        if self.ctx.step >= self.ctx.recursion_limit {
            return Err(GraphError::RecursionLimitExceeded {
                limit: self.ctx.recursion_limit,
            });
        }

        let graph = self.graph.inner.clone();
        let entry = graph.entry_of(id);
        let step = self.ctx.step + 1;
        log_node_start(&entry.name, entry.node.kind(), step);

        let output = graph
            .invoke_node(entry, &self.ctx.state)
            .await
            .map_err(|source| GraphError::Node {
                node: entry.name.clone(),
                source,
            })?;
        let (update, halted) = match output {
            NodeOutput::Update(update) => (update, false),
            NodeOutput::Halt(update) => (update, true),
        };

        if let Some(writes) = &entry.writes {
            if let Some(key) = update.keys().find(|k| !writes.contains(*k)) {
                return Err(SchemaViolation::UndeclaredWrite {
                    node: entry.name.clone(),
                    key: key.to_string(),
                }
                .into());
            }
        }
        let state = graph.schema.merge(&self.ctx.state, &update)?;
        let next = if halted {
            Target::End
        } else {
            entry.edge.resolve(&entry.name, &state)?
        };
        let next_name = next.node().map(|n| graph.entry_of(n).name.clone());

        if let (Some(checkpointer), Some(thread_id)) = (&graph.checkpointer, self.ctx.thread_id()) {
            let checkpoint = Checkpoint::new(thread_id, state.clone(), next_name.clone(), step);
            checkpointer.put(thread_id, &checkpoint).await?;
        }

        self.ctx.state = state;
        self.ctx.step = step;
        self.ctx.current = next.node();
        log_step_complete(&entry.name, step, next_name.as_deref());

        Ok(Some(StepEvent {
            step,
            node: entry.name.clone(),
            update,
            next: next_name,
            halted,
        }))
    }
}
