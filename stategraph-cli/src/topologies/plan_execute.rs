//! Plan-and-execute: a planner writes a step list, an agent executes the head step, a
//! replanner drops it and either hands the rest back to the agent or answers.

use std::sync::Arc;

use serde_json::Value;
use stategraph::{
    FnNode, FnRouter, NodeError, NodeOutput, State, StateGraph, StateSchema, StateUpdate, END,
    START,
};

use super::keywords;

/// Research steps the planner emits before the closing summary.
const MAX_RESEARCH_STEPS: usize = 2;

pub(super) fn input(question: &str) -> StateUpdate {
    StateUpdate::new().set("input", question)
}

fn plan(state: &State) -> Vec<Value> {
    state.get_seq("plan").to_vec()
}

pub(super) fn graph() -> StateGraph {
    let schema = StateSchema::new()
        .replace("input")
        .replace_with_default("plan", Value::Array(Vec::new()))
        .append("past_steps")
        .replace("response");
    let mut graph = StateGraph::new(schema);

    graph.add_node(
        "planner",
        Arc::new(
            FnNode::new(|s: &State| {
                let mut steps: Vec<String> = keywords(s.get_str("input").unwrap_or_default())
                    .into_iter()
                    .take(MAX_RESEARCH_STEPS)
                    .map(|k| format!("Research {}", k))
                    .collect();
                steps.push("Summarize findings".to_string());
                Ok(NodeOutput::Update(StateUpdate::new().set("plan", steps)))
            })
            .with_writes(["plan"]),
        ),
    );
    graph.add_node(
        "agent",
        Arc::new(
            FnNode::new(|s: &State| {
                let task = plan(s)
                    .first()
                    .and_then(Value::as_str)
                    .map(String::from)
                    .ok_or_else(|| NodeError::failed("plan is empty"))?;
                Ok(NodeOutput::Update(
                    StateUpdate::new().append("past_steps", [format!("{}: done", task)]),
                ))
            })
            .with_writes(["past_steps"]),
        ),
    );
    graph.add_node(
        "replan",
        Arc::new(
            FnNode::new(|s: &State| {
                let rest: Vec<Value> = plan(s).into_iter().skip(1).collect();
                if !rest.is_empty() {
                    return Ok(NodeOutput::Update(StateUpdate::new().set("plan", rest)));
                }
                let done: Vec<&str> = s
                    .get_seq("past_steps")
                    .iter()
                    .filter_map(Value::as_str)
                    .collect();
                let response = format!("Completed {} step(s): {}", done.len(), done.join("; "));
                Ok(NodeOutput::Update(
                    StateUpdate::new()
                        .set("plan", Value::Array(Vec::new()))
                        .set("response", response),
                ))
            })
            .with_writes(["plan", "response"]),
        ),
    );

    graph
        .add_edge(START, "planner")
        .add_edge("planner", "agent")
        .add_edge("agent", "replan");
    graph.add_conditional_edges(
        "replan",
        Arc::new(FnRouter::new(["continue", "end"], |s: &State| {
            if s.get_str("response").is_some() {
                "end".to_string()
            } else {
                "continue".to_string()
            }
        })),
        [("continue", "agent"), ("end", END)],
    );
    graph
}
