//! Reflection: a writer drafts, a reviewer critiques, repeat until enough rounds.

use std::sync::Arc;

use stategraph::{FnNode, FnRouter, NodeOutput, State, StateGraph, StateSchema, StateUpdate, END, START};

/// The loop ends once the conversation holds more than this many messages.
const MAX_MESSAGES: usize = 6;

pub(super) fn input(request: &str) -> StateUpdate {
    StateUpdate::new()
        .set("request", request)
        .append("messages", [request])
}

fn drafts(state: &State) -> usize {
    state
        .get_seq("messages")
        .iter()
        .filter(|m| m.as_str().map_or(false, |s| s.starts_with("Draft")))
        .count()
}

pub(super) fn graph() -> StateGraph {
    let schema = StateSchema::new().replace("request").append("messages");
    let mut graph = StateGraph::new(schema);

    graph.add_node(
        "generate",
        Arc::new(
            FnNode::new(|s: &State| {
                let request = s.get_str("request").unwrap_or_default();
                let version = drafts(s) + 1;
                let draft = if version == 1 {
                    format!("Draft v1: a short essay on {}", request)
                } else {
                    format!(
                        "Draft v{}: a revised essay on {} addressing {} critique(s)",
                        version,
                        request,
                        version - 1
                    )
                };
                Ok(NodeOutput::Update(StateUpdate::new().append("messages", [draft])))
            })
            .with_writes(["messages"]),
        ),
    );
    graph.add_node(
        "reflect",
        Arc::new(
            FnNode::new(|s: &State| {
                let critique = format!(
                    "Critique of v{}: add depth, concrete examples and a stronger conclusion",
                    drafts(s)
                );
                Ok(NodeOutput::Update(
                    StateUpdate::new().append("messages", [critique]),
                ))
            })
            .with_writes(["messages"]),
        ),
    );

    graph.add_edge(START, "generate").add_edge("reflect", "generate");
    graph.add_conditional_edges(
        "generate",
        Arc::new(FnRouter::new(["reflect", "end"], |s: &State| {
            if s.get_seq("messages").len() > MAX_MESSAGES {
                "end".to_string()
            } else {
                "reflect".to_string()
            }
        })),
        [("reflect", "reflect"), ("end", END)],
    );
    graph
}
