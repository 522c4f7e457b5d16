//! State graph builder: schema + nodes + static/conditional edges.
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` and
//! `add_conditional_edges(from, router, table)` using `START` and `END` for graph
//! entry/exit, then `compile` (or a `compile_with_*` variant) to get a
//! `CompiledStateGraph`. Compilation validates everything up front and turns names
//! into dense indices; no name lookup happens while a run is stepping.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::memory::Checkpointer;
use crate::state::StateSchema;

use super::compile_error::{CompilationError, Diagnostic};
use super::compiled::{CompiledStateGraph, GraphInner, NodeEntry};
use super::edge::{Edge, NodeId, Target};
use super::node::Node;
use super::node_middleware::NodeMiddleware;
use super::router::Router;

/// Sentinel for graph entry: use as `from` in `add_edge(START, first_node)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to` in `add_edge(last_node, END)` or in a route table.
pub const END: &str = "__end__";

enum EdgeDef {
    Static(String),
    Conditional {
        router: Arc<dyn Router>,
        table: Vec<(String, String)>,
    },
}

/// State graph under construction.
///
/// Each node has exactly one outgoing edge: static, or conditional through one router.
/// Cycles are allowed; termination is bounded by `RunnableConfig::recursion_limit`.
///
/// **Interaction**: Accepts `Arc<dyn Node>` and `Arc<dyn Router>`; produces
/// `CompiledStateGraph`. Checkpointer and middleware are passed at compile time only.
pub struct StateGraph {
    schema: StateSchema,
    nodes: Vec<(String, Arc<dyn Node>)>,
    edges: Vec<(String, EdgeDef)>,
}

impl StateGraph {
    /// Creates an empty graph over `schema`.
    pub fn new(schema: StateSchema) -> Self {
        Self {
            schema,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a node. Names must be unique; duplicates are reported by `compile`.
    pub fn add_node(&mut self, name: impl Into<String>, node: Arc<dyn Node>) -> &mut Self {
        self.nodes.push((name.into(), node));
        self
    }

    /// Adds a static edge. Use `START` for the entry and `END` for exit.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push((from.into(), EdgeDef::Static(to.into())));
        self
    }

    /// Sugar for `add_edge(START, node)`.
    pub fn set_entry_point(&mut self, node: impl Into<String>) -> &mut Self {
        self.add_edge(START, node)
    }

    /// Adds a conditional edge: after `from` runs, `router` picks a label from the
    /// post-merge state and `table` maps it to the destination (a node or `END`).
    ///
    /// With `from == START` this is a conditional entry point evaluated on the initial state.
    pub fn add_conditional_edges<I, L, T>(
        &mut self,
        from: impl Into<String>,
        router: Arc<dyn Router>,
        table: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: Into<String>,
    {
        let table = table
            .into_iter()
            .map(|(label, to)| (label.into(), to.into()))
            .collect();
        self.edges
            .push((from.into(), EdgeDef::Conditional { router, table }));
        self
    }

    /// Builds the executable graph.
    ///
    /// Returns `CompilationError` carrying every diagnostic when any of them is an error.
    /// Unreachable nodes are only warnings: they are logged and kept in
    /// `CompiledStateGraph::warnings`.
    pub fn compile(self) -> Result<CompiledStateGraph, CompilationError> {
        self.compile_internal(None, None)
    }

    /// Builds the executable graph with a checkpointer. Runs whose config has a
    /// `thread_id` write a checkpoint after every step and resume from it.
    pub fn compile_with_checkpointer(
        self,
        checkpointer: Arc<dyn Checkpointer>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        self.compile_internal(Some(checkpointer), None)
    }

    /// Builds the executable graph with node middleware wrapped around every node invocation.
    pub fn compile_with_middleware(
        self,
        middleware: Arc<dyn NodeMiddleware>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        self.compile_internal(None, Some(middleware))
    }

    /// Builds the executable graph with both checkpointer and node middleware.
    pub fn compile_with_checkpointer_and_middleware(
        self,
        checkpointer: Arc<dyn Checkpointer>,
        middleware: Arc<dyn NodeMiddleware>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        self.compile_internal(Some(checkpointer), Some(middleware))
    }

    fn compile_internal(
        self,
        checkpointer: Option<Arc<dyn Checkpointer>>,
        middleware: Option<Arc<dyn NodeMiddleware>>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        let mut diagnostics = Vec::new();

        let mut index: HashMap<String, NodeId> = HashMap::new();
        let mut registered: Vec<(String, Arc<dyn Node>)> = Vec::new();
        for (name, node) in self.nodes {
            if name == START || name == END {
                diagnostics.push(Diagnostic::ReservedNodeName(name));
                continue;
            }
            if index.contains_key(&name) {
                diagnostics.push(Diagnostic::DuplicateNodeName(name));
                continue;
            }
            index.insert(name.clone(), NodeId(registered.len()));
            registered.push((name, node));
        }

        for (name, node) in &registered {
            for key in node.writes().unwrap_or_default() {
                if !self.schema.contains(&key) {
                    diagnostics.push(Diagnostic::UnknownStateKey {
                        node: name.clone(),
                        key,
                    });
                }
            }
        }

        let mut outgoing: HashMap<String, Edge> = HashMap::new();
        let mut reported_multiple: HashSet<String> = HashSet::new();
        for (from, def) in self.edges {
            if from != START && !index.contains_key(&from) {
                diagnostics.push(Diagnostic::NodeNotFound(from));
                continue;
            }
            let edge = match def {
                EdgeDef::Static(to) => match lookup(&index, &to) {
                    Some(target) => Edge::Static(target),
                    None => {
                        diagnostics.push(Diagnostic::NodeNotFound(to));
                        continue;
                    }
                },
                EdgeDef::Conditional { router, table } => {
                    let labels: BTreeSet<&str> = table.iter().map(|(l, _)| l.as_str()).collect();
                    for label in router.labels() {
                        if !labels.contains(label.as_str()) {
                            diagnostics.push(Diagnostic::UnmappedRoute {
                                node: from.clone(),
                                label,
                            });
                        }
                    }
                    drop(labels);
                    let mut mapped = BTreeMap::new();
                    let mut dangling = false;
                    for (label, to) in table {
                        match lookup(&index, &to) {
                            Some(target) => {
                                mapped.insert(label, target);
                            }
                            None => {
                                diagnostics.push(Diagnostic::NodeNotFound(to));
                                dangling = true;
                            }
                        }
                    }
                    if dangling {
                        continue;
                    }
                    Edge::Conditional {
                        router,
                        table: mapped,
                    }
                }
            };
            if outgoing.contains_key(&from) {
                if reported_multiple.insert(from.clone()) {
                    diagnostics.push(Diagnostic::MultipleOutgoing(from));
                }
                continue;
            }
            outgoing.insert(from, edge);
        }

        let entry = outgoing.remove(START);
        match &entry {
            None => diagnostics.push(Diagnostic::MissingEntry),
            Some(entry) => {
                let mut reachable = vec![false; registered.len()];
                let mut queue: VecDeque<NodeId> = targets(entry).collect();
                while let Some(id) = queue.pop_front() {
                    if reachable[id.0] {
                        continue;
                    }
                    reachable[id.0] = true;
                    let name = &registered[id.0].0;
                    match outgoing.get(name) {
                        Some(edge) => queue.extend(targets(edge)),
                        None => diagnostics.push(Diagnostic::NoOutgoingEdge(name.clone())),
                    }
                }
                for (i, (name, _)) in registered.iter().enumerate() {
                    if !reachable[i] {
                        diagnostics.push(Diagnostic::UnreachableNode(name.clone()));
                    }
                }
            }
        }

        let entry = match entry {
            Some(entry) if !diagnostics.iter().any(Diagnostic::is_error) => entry,
            _ => return Err(CompilationError::new(diagnostics)),
        };

        for warning in &diagnostics {
            tracing::warn!(%warning, "graph compiled with warning");
        }

        let nodes = registered
            .into_iter()
            .map(|(name, node)| {
                // Only unreachable nodes can lack an edge; if one ever runs (resume from a
                // foreign checkpoint) its step ends the run.
                let edge = outgoing
                    .remove(&name)
                    .unwrap_or(Edge::Static(Target::End));
                let writes = node.writes().map(|keys| keys.into_iter().collect());
                NodeEntry {
                    name,
                    node,
                    writes,
                    edge,
                }
            })
            .collect();

        Ok(CompiledStateGraph::from_inner(GraphInner {
            schema: self.schema,
            nodes,
            index,
            entry,
            checkpointer,
            middleware,
            warnings: diagnostics,
        }))
    }
}

fn lookup(index: &HashMap<String, NodeId>, to: &str) -> Option<Target> {
    if to == END {
        Some(Target::End)
    } else {
        index.get(to).copied().map(Target::Node)
    }
}

fn targets(edge: &Edge) -> Box<dyn Iterator<Item = NodeId> + '_> {
    match edge {
        Edge::Static(target) => Box::new(target.node().into_iter()),
        Edge::Conditional { table, .. } => Box::new(table.values().filter_map(|t| t.node())),
    }
}
