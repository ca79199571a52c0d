// src/dag/dot.rs

//! Graphviz DOT rendering of a task graph.
//!
//! Purely a function of the graph and the current readiness map: one box
//! per task labeled with its name, filled palegreen (ready) or orange
//! (not ready), with an edge from each node to each of its requirements.
//! Lines are sorted so the output is stable.

use std::collections::{BTreeMap, BTreeSet};

use crate::node::Node;

pub(crate) fn render(root: &Node) -> String {
    let mut nodes: BTreeMap<String, bool> = BTreeMap::new();
    let mut edges: BTreeSet<(String, String)> = BTreeSet::new();
    collect(root, &mut nodes, &mut edges);

    let mut lines: Vec<String> = nodes
        .iter()
        .map(|(taskname, ready)| {
            let color = if *ready { "palegreen" } else { "orange" };
            format!(
                "{} [fillcolor={color}, label=\"{taskname}\", style=filled]",
                ident(taskname)
            )
        })
        .collect();
    lines.extend(
        edges
            .iter()
            .map(|(from, to)| format!("{} -> {}", ident(from), ident(to))),
    );
    lines.sort();

    format!("digraph g {{\n  {}\n}}", lines.join("\n  "))
}

fn collect(node: &Node, nodes: &mut BTreeMap<String, bool>, edges: &mut BTreeSet<(String, String)>) {
    if nodes.contains_key(node.name()) {
        return;
    }
    nodes.insert(node.name().to_string(), node.ready());
    for req in node.requirements().flatten() {
        edges.insert((node.name().to_string(), req.name().to_string()));
        collect(&req, nodes, edges);
    }
}

/// Graph-safe node identifier: a hash of the task name, which may contain
/// arbitrary text.
fn ident(taskname: &str) -> String {
    format!("_{}", blake3::hash(taskname.as_bytes()).to_hex())
}
