//! StateGraph compile failure cases: unknown nodes, unmapped routes, missing entry.

use serde_json::json;
use stategraph::{Diagnostic, StateGraph, StateSchema, END, START};

use crate::common::{fixed_router, set_node};

#[tokio::test]
async fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::new(StateSchema::new().replace("x"));
    graph.add_node("a", set_node("x", json!(1)));
    graph.add_edge(START, "a").add_edge("a", "missing");

    let err = graph.compile().unwrap_err();
    assert!(err.contains(&Diagnostic::NodeNotFound("missing".into())));
}

#[tokio::test]
async fn compile_fails_when_route_table_names_unknown_node() {
    let mut graph = StateGraph::new(StateSchema::new().replace("x"));
    graph.add_node("a", set_node("x", json!(1)));
    graph.add_edge(START, "a");
    graph.add_conditional_edges(
        "a",
        fixed_router(&["ok", "retry"], "ok"),
        [("ok", END), ("retry", "nowhere")],
    );

    let err = graph.compile().unwrap_err();
    assert!(err.contains(&Diagnostic::NodeNotFound("nowhere".into())));
}

#[tokio::test]
async fn compile_fails_when_router_label_is_unmapped() {
    let mut graph = StateGraph::new(StateSchema::new().replace("x"));
    graph.add_node("a", set_node("x", json!(1)));
    graph.add_edge(START, "a");
    graph.add_conditional_edges("a", fixed_router(&["ok", "retry"], "ok"), [("ok", END)]);

    let err = graph.compile().unwrap_err();
    assert_eq!(
        err.errors().cloned().collect::<Vec<_>>(),
        vec![Diagnostic::UnmappedRoute {
            node: "a".into(),
            label: "retry".into(),
        }]
    );
}

#[tokio::test]
async fn compile_fails_without_entry_point() {
    let mut graph = StateGraph::new(StateSchema::new());
    graph.add_node("a", set_node("x", json!(1)));
    graph.add_edge("a", END);

    let err = graph.compile().unwrap_err();
    assert!(err.contains(&Diagnostic::MissingEntry));
    assert!(err.to_string().contains("no entry point"), "{}", err);
}

#[tokio::test]
async fn compile_fails_on_reserved_and_duplicate_names() {
    let mut graph = StateGraph::new(StateSchema::new().replace("x"));
    graph
        .add_node("a", set_node("x", json!(1)))
        .add_node("a", set_node("x", json!(2)))
        .add_node(START, set_node("x", json!(3)));
    graph.add_edge(START, "a").add_edge("a", END);

    let err = graph.compile().unwrap_err();
    assert!(err.contains(&Diagnostic::DuplicateNodeName("a".into())));
    assert!(err.contains(&Diagnostic::ReservedNodeName(START.into())));
}

#[tokio::test]
async fn compile_fails_when_reachable_node_has_no_edge() {
    let mut graph = StateGraph::new(StateSchema::new().replace("x"));
    graph
        .add_node("a", set_node("x", json!(1)))
        .add_node("b", set_node("x", json!(2)));
    graph.add_edge(START, "a").add_edge("a", "b");

    let err = graph.compile().unwrap_err();
    assert!(err.contains(&Diagnostic::NoOutgoingEdge("b".into())));
}

#[tokio::test]
async fn unreachable_node_compiles_with_warning() {
    let mut graph = StateGraph::new(StateSchema::new().replace("x"));
    graph
        .add_node("a", set_node("x", json!(1)))
        .add_node("orphan", set_node("x", json!(2)));
    graph.add_edge(START, "a").add_edge("a", END);

    let compiled = graph.compile().unwrap();
    assert_eq!(compiled.warnings(), &[Diagnostic::UnreachableNode("orphan".into())]);
}
