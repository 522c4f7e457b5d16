//! Shared helpers for graph integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::Value;
use stategraph::{FnNode, FnRouter, Node, NodeOutput, Router, State, StateUpdate};

/// Node that always returns the same update.
pub fn set_node(key: &'static str, value: Value) -> Arc<dyn Node> {
    Arc::new(FnNode::new(move |_s: &State| {
        Ok(NodeOutput::Update(StateUpdate::new().set(key, value.clone())))
    }))
}

/// Node that increments an integer key.
pub fn incr_node(key: &'static str) -> Arc<dyn Node> {
    Arc::new(FnNode::new(move |s: &State| {
        let n = s.get_i64(key).unwrap_or(0) + 1;
        Ok(NodeOutput::Update(StateUpdate::new().set(key, n)))
    }))
}

/// Node that appends its own name to the `trace` sequence.
pub fn trace_node(name: &'static str) -> Arc<dyn Node> {
    Arc::new(FnNode::new(move |_s: &State| {
        Ok(NodeOutput::Update(StateUpdate::new().append("trace", [name])))
    }))
}

/// Node that counts how often it was invoked, returning an empty update.
pub fn counting_node(calls: Arc<AtomicUsize>) -> Arc<dyn Node> {
    Arc::new(FnNode::new(move |_s: &State| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(NodeOutput::Update(StateUpdate::new()))
    }))
}

/// Router that declares `labels` but always returns `label`.
pub fn fixed_router(labels: &[&'static str], label: &'static str) -> Arc<dyn Router> {
    Arc::new(FnRouter::new(labels.to_vec(), move |_s: &State| {
        label.to_string()
    }))
}

/// Router on an integer key: `below` while `key < bound`, otherwise `done`.
pub fn threshold_router(key: &'static str, bound: i64) -> Arc<dyn Router> {
    Arc::new(FnRouter::new(["below", "done"], move |s: &State| {
        if s.get_i64(key).unwrap_or(0) < bound {
            "below".to_string()
        } else {
            "done".to_string()
        }
    }))
}
