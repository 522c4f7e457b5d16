//! Adaptive RAG: route the question, retrieve, grade, then generate or rewrite.
//!
//! - entry: `vectorstore` → retrieve, `web_search` → web_search
//! - retrieve → grade_documents → generate (relevant docs left) | transform_query → retrieve
//! - web_search → generate
//! - generate → END (useful) | transform_query (not useful) | generate (not supported)

use std::sync::Arc;

use serde_json::{json, Value};
use stategraph::{FnNode, FnRouter, NodeOutput, State, StateGraph, StateSchema, StateUpdate, END, START};

use super::keywords;

/// Fixture vector store: (title, text).
const CORPUS: &[(&str, &str)] = &[
    (
        "LLM Powered Autonomous Agents",
        "An agent system combines an llm with planning, memory and tool use. Task decomposition \
         breaks a goal into smaller steps.",
    ),
    (
        "Prompt Engineering",
        "Prompt engineering steers model behaviour without updating weights. Few-shot and chain \
         of thought prompting are common techniques.",
    ),
    (
        "Adversarial Attacks on LLMs",
        "Adversarial attacks and jailbreak prompts try to make an llm produce unsafe output. \
         Token manipulation and gradient based attacks are studied.",
    ),
];

/// Words that send a question to the vector store instead of web search.
const INDEXED_TOPICS: &[&str] = &[
    "agent", "agents", "planning", "memory", "prompt", "prompting", "adversarial", "attack",
    "attacks", "jailbreak", "llm", "llms",
];

/// Query expansions applied by `transform_query`: a question word and the indexed form added.
const REWRITES: &[(&str, &str)] = &[
    ("agent", "agents"),
    ("attack", "attacks"),
    ("prompts", "prompt"),
    ("llms", "llm"),
    ("planner", "planning"),
];

const MAX_GENERATIONS: i64 = 3;

pub(super) fn input(question: &str) -> StateUpdate {
    StateUpdate::new().set("question", question)
}

fn doc_json(title: &str, text: &str) -> Value {
    json!({ "title": title, "text": text })
}

fn overlap(question: &str, text: &str) -> usize {
    let doc = keywords(text);
    keywords(question)
        .iter()
        .filter(|w| doc.contains(w))
        .count()
}

fn doc_field<'a>(doc: &'a Value, field: &str) -> &'a str {
    doc.get(field).and_then(Value::as_str).unwrap_or_default()
}

pub(super) fn graph() -> StateGraph {
    let schema = StateSchema::new()
        .replace("question")
        .replace_with_default("documents", json!([]))
        .replace("generation")
        .replace_with_default("generations", 0);
    let mut graph = StateGraph::new(schema);

    graph.add_node(
        "retrieve",
        Arc::new(
            FnNode::new(|s: &State| {
                let question = s.get_str("question").unwrap_or_default();
                let mut scored: Vec<(usize, &(&str, &str))> = CORPUS
                    .iter()
                    .map(|doc| (overlap(question, &format!("{} {}", doc.0, doc.1)), doc))
                    .collect();
                scored.sort_by(|a, b| b.0.cmp(&a.0));
                // top-k regardless of score, grading decides relevance
                let docs: Vec<Value> = scored
                    .into_iter()
                    .take(2)
                    .map(|(_, (title, text))| doc_json(title, text))
                    .collect();
                Ok(NodeOutput::Update(StateUpdate::new().set("documents", docs)))
            })
            .with_writes(["documents"]),
        ),
    );

    graph.add_node(
        "grade_documents",
        Arc::new(
            FnNode::new(|s: &State| {
                let question = s.get_str("question").unwrap_or_default();
                let relevant: Vec<Value> = s
                    .get_seq("documents")
                    .iter()
                    .filter(|d| {
                        let text = format!("{} {}", doc_field(d, "title"), doc_field(d, "text"));
                        overlap(question, &text) > 0
                    })
                    .cloned()
                    .collect();
                Ok(NodeOutput::Update(StateUpdate::new().set("documents", relevant)))
            })
            .with_writes(["documents"]),
        ),
    );

    graph.add_node(
        "transform_query",
        Arc::new(
            FnNode::new(|s: &State| {
                let question = s.get_str("question").unwrap_or_default();
                let words = keywords(question);
                let mut rewritten = question.trim_end_matches('?').to_string();
                for (from, to) in REWRITES {
                    if words.iter().any(|w| w == from) && !words.iter().any(|w| w == to) {
                        rewritten.push(' ');
                        rewritten.push_str(to);
                    }
                }
                Ok(NodeOutput::Update(StateUpdate::new().set("question", rewritten)))
            })
            .with_writes(["question"]),
        ),
    );

    graph.add_node(
        "web_search",
        Arc::new(
            FnNode::new(|s: &State| {
                let question = s.get_str("question").unwrap_or_default();
                let result = doc_json("Web search", &format!("Top web results for: {}", question));
                Ok(NodeOutput::Update(
                    StateUpdate::new().set("documents", vec![result]),
                ))
            })
            .with_writes(["documents"]),
        ),
    );

    graph.add_node(
        "generate",
        Arc::new(
            FnNode::new(|s: &State| {
                let docs = s.get_seq("documents");
                let sources: Vec<&str> = docs.iter().map(|d| doc_field(d, "title")).collect();
                let summary = docs
                    .first()
                    .map(|d| doc_field(d, "text").split(". ").next().unwrap_or_default())
                    .unwrap_or_default();
                let generation = format!("{} [sources: {}]", summary, sources.join(", "));
                let n = s.get_i64("generations").unwrap_or(0) + 1;
                Ok(NodeOutput::Update(
                    StateUpdate::new()
                        .set("generation", generation)
                        .set("generations", n),
                ))
            })
            .with_writes(["generation", "generations"]),
        ),
    );

    graph.add_conditional_edges(
        START,
        Arc::new(FnRouter::new(["vectorstore", "web_search"], |s: &State| {
            let question = s.get_str("question").unwrap_or_default();
            if keywords(question)
                .iter()
                .any(|w| INDEXED_TOPICS.contains(&w.as_str()))
            {
                "vectorstore".to_string()
            } else {
                "web_search".to_string()
            }
        })),
        [("vectorstore", "retrieve"), ("web_search", "web_search")],
    );
    graph
        .add_edge("retrieve", "grade_documents")
        .add_edge("transform_query", "retrieve")
        .add_edge("web_search", "generate");
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
    graph.add_conditional_edges(
        "generate",
        Arc::new(FnRouter::new(
            ["useful", "not useful", "not supported"],
            |s: &State| {
                let generation = s.get_str("generation").unwrap_or_default();
                let docs = s.get_seq("documents");
                if docs.is_empty() {
                    "not useful".to_string()
                } else if !docs.iter().any(|d| generation.contains(doc_field(d, "title")))
                    && s.get_i64("generations").unwrap_or(0) < MAX_GENERATIONS
                {
                    "not supported".to_string()
                } else {
                    "useful".to_string()
                }
            },
        )),
        [
            ("useful", END),
            ("not useful", "transform_query"),
            ("not supported", "generate"),
        ],
    );
    graph
}
