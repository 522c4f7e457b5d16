//! compile_with_middleware: every node invocation goes through the middleware.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use stategraph::{
    NodeError, NodeFuture, NodeMiddleware, NodeOutput, RunnableConfig, State, StateGraph,
    StateSchema, StateUpdate, END, START,
};

use crate::common::set_node;

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl NodeMiddleware for Recorder {
    async fn around_run<'a>(
        &'a self,
        node: &'a str,
        _state: &'a State,
        inner: NodeFuture<'a>,
    ) -> Result<NodeOutput, NodeError> {
        self.calls.lock().unwrap().push(format!("before:{}", node));
        let out = inner.await;
        self.calls.lock().unwrap().push(format!("after:{}", node));
        out
    }
}

struct Stamp;

#[async_trait]
impl NodeMiddleware for Stamp {
    async fn around_run<'a>(
        &'a self,
        node: &'a str,
        _state: &'a State,
        inner: NodeFuture<'a>,
    ) -> Result<NodeOutput, NodeError> {
        match inner.await? {
            NodeOutput::Update(update) => Ok(NodeOutput::Update(update.set("last", node))),
            NodeOutput::Halt(update) => Ok(NodeOutput::Halt(update.set("last", node))),
        }
    }
}

fn two_nodes() -> StateGraph {
    let mut graph = StateGraph::new(StateSchema::new().replace("x").replace("last"));
    graph
        .add_node("a", set_node("x", json!(1)))
        .add_node("b", set_node("x", json!(2)));
    graph.add_edge(START, "a").add_edge("a", "b").add_edge("b", END);
    graph
}

#[tokio::test]
async fn middleware_wraps_every_node_in_order() {
    let recorder = Arc::new(Recorder::default());
    let compiled = two_nodes().compile_with_middleware(recorder.clone()).unwrap();
    let out = compiled
        .invoke(StateUpdate::new(), RunnableConfig::new(5))
        .await
        .unwrap();
    assert_eq!(out.get_i64("x"), Some(2));
    assert_eq!(
        *recorder.calls.lock().unwrap(),
        vec!["before:a", "after:a", "before:b", "after:b"]
    );
}

#[tokio::test]
async fn middleware_output_is_what_gets_merged() {
    let compiled = two_nodes().compile_with_middleware(Arc::new(Stamp)).unwrap();
    let out = compiled
        .invoke(StateUpdate::new(), RunnableConfig::new(5))
        .await
        .unwrap();
    assert_eq!(out.get_str("last"), Some("b"));
}
