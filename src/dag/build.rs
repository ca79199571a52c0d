// src/dag/build.rs

//! Execution-graph assembly with readiness pruning.
//!
//! The walk applies the readiness-first rule structurally: a node that
//! reads ready keeps its place in the graph (so its verdict is still
//! reported) but has its requirement container cleared and its subtree
//! skipped. Whole subtrees of already-ready prerequisites are never
//! entered.

use std::collections::HashMap;

use anyhow::Result;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::diag::Log;
use crate::errors::EngineError;
use crate::node::Node;

/// The assembled execution graph: nodes in first-observation order plus
/// adjacency in both directions, indexed positionally.
pub(crate) struct ExecGraph {
    pub nodes: Vec<Node>,
    /// For each node, the indices it depends on (its requirements).
    pub dependencies: Vec<Vec<usize>>,
    /// For each node, the indices that depend on it.
    pub dependents: Vec<Vec<usize>>,
}

/// Assemble the execution graph rooted at `root`.
///
/// Requirement containers are fixed at node construction from
/// already-built nodes, so the graph is acyclic by construction; the
/// topological sort is kept as a defensive check and fails with an engine
/// error naming an involved task rather than letting the executor stall.
pub(crate) fn assemble(root: &Node, log: &Log) -> Result<ExecGraph> {
    debug_header(log, "Task Graph");

    let mut nodes: Vec<Node> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();

    add_node_and_requirements(root, 0, &mut nodes, &mut index, &mut graph, log);

    if let Err(cycle) = toposort(&graph, None) {
        let taskname = nodes[cycle.node_id()].name().to_string();
        return Err(EngineError::Cycle(taskname).into());
    }

    let dependencies: Vec<Vec<usize>> = (0..nodes.len())
        .map(|i| graph.neighbors_directed(i, Direction::Outgoing).collect())
        .collect();
    let dependents: Vec<Vec<usize>> = (0..nodes.len())
        .map(|i| graph.neighbors_directed(i, Direction::Incoming).collect())
        .collect();

    debug_header(log, "Execution");

    Ok(ExecGraph {
        nodes,
        dependencies,
        dependents,
    })
}

fn add_node_and_requirements(
    node: &Node,
    level: usize,
    nodes: &mut Vec<Node>,
    index: &mut HashMap<String, usize>,
    graph: &mut DiGraphMap<usize, ()>,
    log: &Log,
) -> usize {
    log.debug(&format!("{}{}", "  ".repeat(level), node.name()));
    if let Some(&seen) = index.get(node.name()) {
        // Already expanded via another dependent; edges to it are added by
        // each parent below.
        return seen;
    }

    let idx = nodes.len();
    nodes.push(node.clone());
    index.insert(node.name().to_string(), idx);
    graph.add_node(idx);

    node.reset_ready();
    if node.ready() {
        // Readiness-first: this subtree is done, its requirements are no
        // longer relevant for execution.
        node.clear_requirements();
        return idx;
    }

    for req in node.requirements().flatten() {
        let req_idx = add_node_and_requirements(&req, level + 1, nodes, index, graph, log);
        graph.add_edge(idx, req_idx, ());
    }
    idx
}

fn debug_header(log: &Log, msg: &str) {
    let sep = "─".repeat(msg.chars().count());
    log.debug(&sep);
    log.debug(msg);
    log.debug(&sep);
}
