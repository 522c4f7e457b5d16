//! End-to-end topologies: adaptive RAG, reflection loop, hierarchical team.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use serde_json::{json, Value};
use stategraph::{
    FnNode, FnRouter, GraphError, NodeOutput, RunnableConfig, State, StateGraph, StateSchema,
    StateUpdate, SubgraphNode, END, START,
};

use crate::common::incr_node;

/// **Scenario**: retrieve → grade_documents → generate (relevant docs) or transform_query →
/// retrieve. The fixture retriever returns one relevant and one irrelevant document; the run
/// reaches `generate` in one pass with only the relevant document in state.
#[tokio::test]
async fn adaptive_rag_keeps_only_relevant_document() {
    let retrievals = Arc::new(AtomicUsize::new(0));
    let seen = retrievals.clone();

    let schema = StateSchema::new()
        .replace("question")
        .replace_with_default("documents", json!([]))
        .replace("generation");
    let mut graph = StateGraph::new(schema);
    graph.add_node(
        "retrieve",
        Arc::new(FnNode::new(move |_s: &State| {
            seen.fetch_add(1, Ordering::SeqCst);
            let docs = json!([
                {"id": "d1", "text": "Rust ownership rules", "relevant": true},
                {"id": "d2", "text": "Baking sourdough", "relevant": false},
            ]);
            Ok(NodeOutput::Update(StateUpdate::new().set("documents", docs)))
        })),
    );
    graph.add_node(
        "grade_documents",
        Arc::new(FnNode::new(|s: &State| {
            let kept: Vec<Value> = s
                .get_seq("documents")
                .iter()
                .filter(|d| d["relevant"].as_bool() == Some(true))
                .cloned()
                .collect();
            Ok(NodeOutput::Update(StateUpdate::new().set("documents", kept)))
        })),
    );
    graph.add_node(
        "transform_query",
        Arc::new(FnNode::new(|s: &State| {
            let q = format!("{} (rephrased)", s.get_str("question").unwrap_or_default());
            Ok(NodeOutput::Update(StateUpdate::new().set("question", q)))
        })),
    );
    graph.add_node(
        "generate",
        Arc::new(FnNode::new(|s: &State| {
            let n = s.get_seq("documents").len();
            Ok(NodeOutput::Update(
                StateUpdate::new().set("generation", format!("answer from {} document(s)", n)),
            ))
        })),
    );
    graph
        .add_edge(START, "retrieve")
        .add_edge("retrieve", "grade_documents")
        .add_edge("transform_query", "retrieve")
        .add_edge("generate", END);
    graph.add_conditional_edges(
        "grade_documents",
        Arc::new(FnRouter::new(["generate", "transform_query"], |s: &State| {
            if s.get_seq("documents").is_empty() {
                "transform_query".to_string()
            } else {
                "generate".to_string()
            }
        })),
        [("generate", "generate"), ("transform_query", "transform_query")],
    );

    let events: Vec<_> = graph
        .compile()
        .unwrap()
        .stream(
            StateUpdate::new().set("question", "What is ownership?"),
            RunnableConfig::new(10),
        )
        .into_stream()
        .map(|e| e.unwrap())
        .collect()
        .await;

    let path: Vec<_> = events.iter().map(|e| e.node.as_str()).collect();
    assert_eq!(path, vec!["retrieve", "grade_documents", "generate"]);
    assert_eq!(retrievals.load(Ordering::SeqCst), 1);

    let graded = events[1].update.get("documents").unwrap();
    assert_eq!(graded, &json!([{"id": "d1", "text": "Rust ownership rules", "relevant": true}]));
    assert_eq!(
        events[2].update.get("generation"),
        Some(&json!("answer from 1 document(s)"))
    );
}

/// **Scenario**: generate → reflect → generate with limit 6; reflect always loops back, so
/// exactly 6 deltas are yielded before RecursionLimitExceeded.
#[tokio::test]
async fn reflection_loop_hits_limit_after_six_deltas() {
    let schema = StateSchema::new().append("messages");
    let mut graph = StateGraph::new(schema);
    graph.add_node(
        "generate",
        Arc::new(FnNode::new(|s: &State| {
            let n = s.get_seq("messages").len();
            Ok(NodeOutput::Update(
                StateUpdate::new().append("messages", [format!("essay v{}", n / 2 + 1)]),
            ))
        })),
    );
    graph.add_node(
        "reflect",
        Arc::new(FnNode::new(|_s: &State| {
            Ok(NodeOutput::Update(
                StateUpdate::new().append("messages", ["needs more depth"]),
            ))
        })),
    );
    graph
        .add_edge(START, "generate")
        .add_edge("generate", "reflect")
        .add_edge("reflect", "generate");

    let items: Vec<_> = graph
        .compile()
        .unwrap()
        .stream(StateUpdate::new(), RunnableConfig::new(6))
        .into_stream()
        .collect()
        .await;

    assert_eq!(items.len(), 7);
    let deltas: Vec<_> = items[..6]
        .iter()
        .map(|i| i.as_ref().unwrap().node.clone())
        .collect();
    assert_eq!(
        deltas,
        vec!["generate", "reflect", "generate", "reflect", "generate", "reflect"]
    );
    assert!(matches!(
        items[6],
        Err(GraphError::RecursionLimitExceeded { limit: 6 })
    ));
}

/// **Scenario**: The child takes 4 internal steps; the parent limit is 3 and the run still
/// succeeds because the whole sub-graph counts as one parent step.
#[tokio::test]
async fn hierarchical_child_steps_count_once() {
    let mut child = StateGraph::new(StateSchema::new().replace_with_default("n", 0));
    child.add_node("work", incr_node("n"));
    child.add_edge(START, "work");
    child.add_conditional_edges(
        "work",
        Arc::new(FnRouter::new(["more", "done"], |s: &State| {
            if s.get_i64("n").unwrap_or(0) < 4 {
                "more".to_string()
            } else {
                "done".to_string()
            }
        })),
        [("more", "work"), ("done", END)],
    );

    let team = SubgraphNode::new(
        child.compile().unwrap(),
        10,
        |_p: &State| StateUpdate::new(),
        |c: &State| StateUpdate::new().set("child_steps", c.get_i64("n").unwrap_or(0)),
    );

    let mut parent = StateGraph::new(
        StateSchema::new()
            .replace("child_steps")
            .replace_with_default("supervised", false),
    );
    parent.add_node("team", Arc::new(team));
    parent.add_node(
        "supervisor",
        Arc::new(FnNode::new(|_s: &State| {
            Ok(NodeOutput::Update(StateUpdate::new().set("supervised", true)))
        })),
    );
    parent
        .add_edge(START, "team")
        .add_edge("team", "supervisor")
        .add_edge("supervisor", END);

    let mut run = parent
        .compile()
        .unwrap()
        .stream(StateUpdate::new(), RunnableConfig::new(3));
    let mut steps = 0;
    while let Some(event) = run.next_step().await {
        event.unwrap();
        steps += 1;
    }
    assert_eq!(steps, 2);
    let state = run.final_state().unwrap();
    assert_eq!(state.get_i64("child_steps"), Some(4));
    assert_eq!(state.get_bool("supervised"), Some(true));
}
