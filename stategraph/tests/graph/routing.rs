//! Conditional routing: post-merge decisions, unmapped labels, no partial merges.

use serde_json::json;
use stategraph::{
    GraphError, RunStatus, RunnableConfig, StateGraph, StateSchema, StateUpdate, END, START,
};

use crate::common::{fixed_router, incr_node, set_node, threshold_router};

/// **Scenario**: The router sees the update of the node it leaves, not the state before it.
#[tokio::test]
async fn router_sees_post_merge_state() {
    let mut graph = StateGraph::new(StateSchema::new().replace_with_default("n", 0).replace("path"));
    graph
        .add_node("bump", incr_node("n"))
        .add_node("low", set_node("path", json!("low")))
        .add_node("high", set_node("path", json!("high")));
    graph.add_edge(START, "bump");
    // n is 0 before bump and 1 after; bound 1 routes to `high` only on the merged state.
    graph.add_conditional_edges("bump", threshold_router("n", 1), [("below", "low"), ("done", "high")]);
    graph.add_edge("low", END).add_edge("high", END);

    let out = graph
        .compile()
        .unwrap()
        .invoke(StateUpdate::new(), RunnableConfig::new(5))
        .await
        .unwrap();
    assert_eq!(out.get_str("path"), Some("high"));
}

/// **Scenario**: A label outside the table fails with Routing every time; the node's update
/// is not merged and no step is counted.
#[tokio::test]
async fn unmapped_label_fails_without_partial_merge() {
    let mut graph = StateGraph::new(StateSchema::new().replace("x"));
    graph.add_node("a", set_node("x", json!("written")));
    graph.add_edge(START, "a");
    // Declares only `ok` (so it compiles) but returns `surprise` at run time.
    graph.add_conditional_edges("a", fixed_router(&["ok"], "surprise"), [("ok", END)]);
    let compiled = graph.compile().unwrap();

    for _ in 0..3 {
        let mut run = compiled.stream(StateUpdate::new().set("x", "input"), RunnableConfig::new(5));
        match run.next_step().await {
            Some(Err(GraphError::Routing { node, label })) => {
                assert_eq!(node, "a");
                assert_eq!(label, "surprise");
            }
            other => panic!("expected Routing error, got {:?}", other),
        }
        assert_eq!(run.status(), RunStatus::Failed);
        assert_eq!(run.step(), 0);
        assert_eq!(run.final_state().unwrap().get_str("x"), Some("input"));
    }
}

/// **Scenario**: The same input always takes the same path.
#[tokio::test]
async fn routing_is_deterministic() {
    let mut graph = StateGraph::new(StateSchema::new().replace_with_default("n", 0));
    graph.add_node("loop", incr_node("n"));
    graph.add_edge(START, "loop");
    graph.add_conditional_edges("loop", threshold_router("n", 3), [("below", "loop"), ("done", END)]);
    let compiled = graph.compile().unwrap();

    let mut paths = Vec::new();
    for _ in 0..2 {
        let mut run = compiled.stream(StateUpdate::new(), RunnableConfig::new(10));
        let mut path = Vec::new();
        while let Some(event) = run.next_step().await {
            let event = event.unwrap();
            path.push((event.node, event.next));
        }
        paths.push(path);
    }
    assert_eq!(paths[0], paths[1]);
    assert_eq!(paths[0].len(), 3);
}
