//! Reference topologies run by the CLI.
//!
//! Every node is a deterministic fixture (keyword matching over a small in-memory
//! corpus, templated drafts) so runs are reproducible without external services.

mod adaptive_rag;
mod hierarchical;
mod plan_execute;
mod reflection;

use clap::ValueEnum;
use stategraph::{CompilationError, StateGraph, StateUpdate};

/// Which graph to build and run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Topology {
    /// Conditional entry, retrieve → grade → generate with query rewrite and web fallback.
    AdaptiveRag,
    /// generate ↔ reflect until the draft has been critiqued enough.
    Reflection,
    /// Supervisor over a research team and a writing team, each its own sub-graph.
    Hierarchical,
    /// planner → agent ↔ replan until the plan is used up.
    PlanExecute,
}

impl Topology {
    pub fn name(self) -> &'static str {
        match self {
            Topology::AdaptiveRag => "adaptive-rag",
            Topology::Reflection => "reflection",
            Topology::Hierarchical => "hierarchical",
            Topology::PlanExecute => "plan-execute",
        }
    }

    /// Uncompiled graph, so callers can choose how to compile it.
    ///
    /// Fails only when a nested team graph does not compile.
    pub fn graph(self) -> Result<StateGraph, CompilationError> {
        match self {
            Topology::AdaptiveRag => Ok(adaptive_rag::graph()),
            Topology::Reflection => Ok(reflection::graph()),
            Topology::Hierarchical => hierarchical::graph(),
            Topology::PlanExecute => Ok(plan_execute::graph()),
        }
    }

    /// Initial input for a run driven by `question`.
    pub fn input(self, question: &str) -> StateUpdate {
        match self {
            Topology::AdaptiveRag => adaptive_rag::input(question),
            Topology::Reflection => reflection::input(question),
            Topology::Hierarchical => hierarchical::input(question),
            Topology::PlanExecute => plan_execute::input(question),
        }
    }

    /// Mermaid diagram of the compiled topology.
    pub fn mermaid(self) -> Result<String, CompilationError> {
        Ok(self.graph()?.compile()?.draw_mermaid())
    }
}

impl std::str::FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Topology as ValueEnum>::from_str(s, true)
    }
}

/// Lowercase words of at least three letters, without common stop words.
pub(crate) fn keywords(text: &str) -> Vec<String> {
    const STOP: &[&str] = &[
        "the", "and", "are", "for", "how", "what", "with", "about", "does", "why", "who", "when",
        "this", "that", "which", "from", "into", "can", "you", "tell", "explain",
    ];
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|w| w.len() >= 3 && !STOP.contains(&w.as_str()))
        .collect()
}
