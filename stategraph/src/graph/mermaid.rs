//! Mermaid rendering of a compiled graph.
//!
//! Node ids are positional (`n0`, `n1`, ...) so arbitrary node names never clash with
//! Mermaid syntax; the name is shown as the label. Sub-graph nodes use the
//! subroutine shape, conditional transitions are dashed and labelled.

use std::fmt::Write;

use super::edge::{Edge, Target};
use super::CompiledStateGraph;

const START_ID: &str = "__start__";
const END_ID: &str = "__end__";

fn target_id(target: &Target) -> String {
    match target {
        Target::Node(id) => format!("n{}", id.0),
        Target::End => END_ID.to_string(),
    }
}

fn escape_label(s: &str) -> String {
    s.replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('|', "&#124;")
}

fn write_edge(out: &mut String, from: &str, edge: &Edge) {
    match edge {
        Edge::Static(target) => {
            let _ = writeln!(out, "    {} --> {}", from, target_id(target));
        }
        Edge::Conditional { table, .. } => {
            for (label, target) in table {
                let _ = writeln!(
                    out,
                    "    {} -.->|{}| {}",
                    from,
                    escape_label(label),
                    target_id(target)
                );
            }
        }
    }
}

impl CompiledStateGraph {
    /// Renders the graph as a Mermaid `graph TD` diagram.
    pub fn draw_mermaid(&self) -> String {
        let inner = &self.inner;
        let mut out = String::from("graph TD\n");
        let _ = writeln!(out, "    {}((START))", START_ID);
        for (i, entry) in inner.nodes.iter().enumerate() {
            let label = escape_label(&entry.name);
            if entry.node.subgraph().is_some() {
                let _ = writeln!(out, "    n{}[[\"{}\"]]", i, label);
            } else {
                let _ = writeln!(out, "    n{}[\"{}\"]", i, label);
            }
        }
        let _ = writeln!(out, "    {}((END))", END_ID);

        write_edge(&mut out, START_ID, &inner.entry);
        for (i, entry) in inner.nodes.iter().enumerate() {
            write_edge(&mut out, &format!("n{}", i), &entry.edge);
        }
        out
    }
}
