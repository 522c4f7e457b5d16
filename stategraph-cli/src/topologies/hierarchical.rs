//! Hierarchical teams: a top-level supervisor delegates to two team sub-graphs.
//!
//! Each team is a compiled graph with its own state; the parent only sees what the
//! team's exit mapping hands back.

use std::sync::Arc;

use serde_json::Value;
use stategraph::{
    CompilationError, CompiledStateGraph, FnNode, FnRouter, Node, NodeOutput, Router, State,
    StateGraph, StateSchema, StateUpdate, SubgraphNode, END, START,
};

/// Recursion limit of each team run.
const TEAM_RECURSION_LIMIT: usize = 10;

pub(super) fn input(task: &str) -> StateUpdate {
    StateUpdate::new().set("task", task)
}

fn route_on_next(labels: &[&'static str]) -> Arc<dyn Router> {
    Arc::new(FnRouter::new(labels.to_vec(), |s: &State| {
        s.get_str("next").unwrap_or("FINISH").to_string()
    }))
}

/// search → supervisor → scrape → supervisor → FINISH
fn research_team() -> Result<CompiledStateGraph, CompilationError> {
    let schema = StateSchema::new()
        .replace("query")
        .append("findings")
        .replace("next");
    let mut team = StateGraph::new(schema);
    team.add_node(
        "supervisor",
        Arc::new(FnNode::new(|s: &State| {
            let next = match s.get_seq("findings").len() {
                0 => "search",
                1 => "scrape",
                _ => "FINISH",
            };
            Ok(NodeOutput::Update(StateUpdate::new().set("next", next)))
        })),
    );
    team.add_node(
        "search",
        Arc::new(FnNode::new(|s: &State| {
            let query = s.get_str("query").unwrap_or_default();
            Ok(NodeOutput::Update(
                StateUpdate::new().append("findings", [format!("search hits for '{}'", query)]),
            ))
        })),
    );
    team.add_node(
        "scrape",
        Arc::new(FnNode::new(|s: &State| {
            let query = s.get_str("query").unwrap_or_default();
            Ok(NodeOutput::Update(
                StateUpdate::new().append("findings", [format!("page notes on '{}'", query)]),
            ))
        })),
    );
    team.add_edge(START, "supervisor")
        .add_edge("search", "supervisor")
        .add_edge("scrape", "supervisor");
    team.add_conditional_edges(
        "supervisor",
        route_on_next(&["search", "scrape", "FINISH"]),
        [("search", "search"), ("scrape", "scrape"), ("FINISH", END)],
    );
    team.compile()
}

/// outline → write
fn writing_team() -> Result<CompiledStateGraph, CompilationError> {
    let schema = StateSchema::new()
        .replace("notes")
        .replace("outline")
        .replace("document");
    let mut team = StateGraph::new(schema);
    team.add_node(
        "outline",
        Arc::new(FnNode::new(|s: &State| {
            let sections = s.get_seq("notes").len().max(1);
            Ok(NodeOutput::Update(
                StateUpdate::new().set("outline", format!("{} section(s) + summary", sections)),
            ))
        })),
    );
    team.add_node(
        "write",
        Arc::new(FnNode::new(|s: &State| {
            let notes: Vec<&str> = s.get_seq("notes").iter().filter_map(Value::as_str).collect();
            let document = format!(
                "Report ({}): {}",
                s.get_str("outline").unwrap_or_default(),
                notes.join("; ")
            );
            Ok(NodeOutput::Update(StateUpdate::new().set("document", document)))
        })),
    );
    team.add_edge(START, "outline")
        .add_edge("outline", "write")
        .add_edge("write", END);
    team.compile()
}

/// Fails only if a team graph does not compile.
pub(super) fn graph() -> Result<StateGraph, CompilationError> {
    let schema = StateSchema::new()
        .replace("task")
        .replace("next")
        .replace_with_default("research", serde_json::json!([]))
        .replace("document");
    let mut graph = StateGraph::new(schema);

    let research: Arc<dyn Node> = Arc::new(
        SubgraphNode::new(
            research_team()?,
            TEAM_RECURSION_LIMIT,
            |p: &State| StateUpdate::new().set("query", p.get_str("task").unwrap_or_default()),
            |c: &State| StateUpdate::new().set("research", c.get_seq("findings").to_vec()),
        )
        .with_writes(["research"]),
    );
    let writing: Arc<dyn Node> = Arc::new(
        SubgraphNode::new(
            writing_team()?,
            TEAM_RECURSION_LIMIT,
            |p: &State| StateUpdate::new().set("notes", p.get_seq("research").to_vec()),
            |c: &State| {
                StateUpdate::new().set("document", c.get("document").cloned().unwrap_or_default())
            },
        )
        .with_writes(["document"]),
    );

    graph.add_node(
        "supervisor",
        Arc::new(
            FnNode::new(|s: &State| {
                let next = if s.get_seq("research").is_empty() {
                    "research_team"
                } else if s.get("document").map_or(true, Value::is_null) {
                    "writing_team"
                } else {
                    "FINISH"
                };
                Ok(NodeOutput::Update(StateUpdate::new().set("next", next)))
            })
            .with_writes(["next"]),
        ),
    );
    graph
        .add_node("research_team", research)
        .add_node("writing_team", writing);

    graph
        .add_edge(START, "supervisor")
        .add_edge("research_team", "supervisor")
        .add_edge("writing_team", "supervisor");
    graph.add_conditional_edges(
        "supervisor",
        route_on_next(&["research_team", "writing_team", "FINISH"]),
        [
            ("research_team", "research_team"),
            ("writing_team", "writing_team"),
            ("FINISH", END),
        ],
    );
    Ok(graph)
}
