//! Compiled edge table: targets and outgoing edges referenced by dense node index.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::GraphError;
use crate::state::State;

use super::Router;

/// Stable index of a node inside a compiled graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Destination of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Node(NodeId),
    End,
}

impl Target {
    pub(crate) fn node(self) -> Option<NodeId> {
        match self {
            Target::Node(id) => Some(id),
            Target::End => None,
        }
    }
}

/// The single outgoing edge of a node (or of START).
#[derive(Clone)]
pub(crate) enum Edge {
    Static(Target),
    Conditional {
        router: Arc<dyn Router>,
        table: BTreeMap<String, Target>,
    },
}

impl Edge {
    /// Resolves the destination against `state` (the post-merge state of the source node).
    pub(crate) fn resolve(&self, source: &str, state: &State) -> Result<Target, GraphError> {
        match self {
            Edge::Static(target) => Ok(*target),
            Edge::Conditional { router, table } => {
                let label = router.route(state);
                table
                    .get(&label)
                    .copied()
                    .ok_or_else(|| GraphError::Routing {
                        node: source.to_string(),
                        label,
                    })
            }
        }
    }
}
