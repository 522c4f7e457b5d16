//! Hierarchical composition: a compiled graph embedded as one node of another.

use std::sync::Arc;

use serde_json::json;
use stategraph::{
    CompiledStateGraph, FnNode, GraphError, NodeError, NodeOutput, RunnableConfig, State,
    StateGraph, StateSchema, StateUpdate, SubgraphNode, END, START,
};

use crate::common::{incr_node, threshold_router};

/// Child that overwrites `secret` and echoes `shared` into `reply`.
fn echo_child() -> CompiledStateGraph {
    let schema = StateSchema::new()
        .replace("shared")
        .replace("secret")
        .replace("reply");
    let mut child = StateGraph::new(schema);
    child.add_node(
        "echo",
        Arc::new(FnNode::new(|s: &State| {
            let shared = s.get("shared").cloned().unwrap_or_default();
            Ok(NodeOutput::Update(
                StateUpdate::new()
                    .set("secret", "child-secret")
                    .set("shared", "child-shared")
                    .set("reply", shared),
            ))
        })),
    );
    child.add_edge(START, "echo").add_edge("echo", END);
    child.compile().unwrap()
}

/// **Scenario**: Keys the child writes reach the parent only through the parent mapping;
/// same-named parent keys stay untouched.
#[tokio::test]
async fn child_writes_do_not_leak_into_parent() {
    let adapter = SubgraphNode::new(
        echo_child(),
        5,
        |p: &State| StateUpdate::new().set("shared", p.get("shared").cloned().unwrap_or_default()),
        |c: &State| StateUpdate::new().set("result", c.get("reply").cloned().unwrap_or_default()),
    )
    .with_writes(["result"]);

    let schema = StateSchema::new()
        .replace("shared")
        .replace("secret")
        .replace("result");
    let mut parent = StateGraph::new(schema);
    parent.add_node("team", Arc::new(adapter));
    parent.add_edge(START, "team").add_edge("team", END);

    let out = parent
        .compile()
        .unwrap()
        .invoke(
            StateUpdate::new()
                .set("shared", "from-parent")
                .set("secret", "parent-secret"),
            RunnableConfig::new(3),
        )
        .await
        .unwrap();

    assert_eq!(out.get_str("result"), Some("from-parent"));
    assert_eq!(out.get_str("shared"), Some("from-parent"));
    assert_eq!(out.get_str("secret"), Some("parent-secret"));
}

/// **Scenario**: A child failure fails the parent step as a Node error wrapping the child's.
#[tokio::test]
async fn child_failure_surfaces_as_node_error() {
    let mut child = StateGraph::new(StateSchema::new().replace_with_default("n", 0));
    child.add_node("spin", incr_node("n"));
    child.add_edge(START, "spin");
    child.add_conditional_edges("spin", threshold_router("n", 100), [("below", "spin"), ("done", END)]);

    let adapter = SubgraphNode::new(
        child.compile().unwrap(),
        2,
        |_p: &State| StateUpdate::new(),
        |_c: &State| StateUpdate::new(),
    );
    let mut parent = StateGraph::new(StateSchema::new().replace("x"));
    parent.add_node("team", Arc::new(adapter));
    parent.add_edge(START, "team").add_edge("team", END);

    let mut run = parent
        .compile()
        .unwrap()
        .stream(StateUpdate::new().set("x", json!(1)), RunnableConfig::new(5));
    match run.next_step().await {
        Some(Err(GraphError::Node {
            node,
            source: NodeError::Subgraph(inner),
        })) => {
            assert_eq!(node, "team");
            assert!(matches!(*inner, GraphError::RecursionLimitExceeded { limit: 2 }));
        }
        other => panic!("expected sub-graph failure, got {:?}", other),
    }
    assert_eq!(run.step(), 0);
    assert_eq!(run.state().get_i64("x"), Some(1));
}
