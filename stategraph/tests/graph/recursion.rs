//! Recursion limit: cycles are allowed, bounded per run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stategraph::{GraphError, RunStatus, RunnableConfig, StateGraph, StateSchema, StateUpdate, START};

use crate::common::counting_node;

/// **Scenario**: An endless cycle yields exactly `limit` deltas, then RecursionLimitExceeded;
/// the node is never invoked a `limit + 1`-th time.
#[tokio::test]
async fn endless_cycle_stops_at_limit() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut graph = StateGraph::new(StateSchema::new());
    graph.add_node("spin", counting_node(calls.clone()));
    graph.add_edge(START, "spin").add_edge("spin", "spin");
    let compiled = graph.compile().unwrap();

    let mut run = compiled.stream(StateUpdate::new(), RunnableConfig::new(4));
    let mut deltas = 0;
    let err = loop {
        match run.next_step().await {
            Some(Ok(_)) => deltas += 1,
            Some(Err(e)) => break e,
            None => panic!("cycle must not reach END"),
        }
    };
    assert_eq!(deltas, 4);
    assert!(matches!(err, GraphError::RecursionLimitExceeded { limit: 4 }));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(run.status(), RunStatus::Failed);
    assert!(run.next_step().await.is_none());
}

/// **Scenario**: The limit is per run; a fresh run on the same graph gets a fresh budget.
#[tokio::test]
async fn limit_is_per_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut graph = StateGraph::new(StateSchema::new());
    graph.add_node("spin", counting_node(calls.clone()));
    graph.add_edge(START, "spin").add_edge("spin", "spin");
    let compiled = graph.compile().unwrap();

    for _ in 0..2 {
        let err = compiled
            .invoke(StateUpdate::new(), RunnableConfig::new(2))
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::RecursionLimitExceeded { limit: 2 }));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

/// **Scenario**: A limit of zero fails before any node runs.
#[tokio::test]
async fn zero_limit_runs_nothing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut graph = StateGraph::new(StateSchema::new());
    graph.add_node("spin", counting_node(calls.clone()));
    graph.add_edge(START, "spin").add_edge("spin", "spin");

    let err = graph
        .compile()
        .unwrap()
        .invoke(StateUpdate::new(), RunnableConfig::new(0))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::RecursionLimitExceeded { limit: 0 }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
