// src/exec/executor.rs

//! Bounded-concurrency dispatch over the assembled execution graph.
//!
//! A node becomes eligible when all of its requirements have reached a
//! final readiness verdict. Up to `workers` node visits run at a time on
//! the blocking pool; each completion comes back over an mpsc channel and
//! unlocks its dependents. With `workers == 1` the loop dispatches one
//! node at a time from a FIFO queue seeded in first-observation order,
//! which makes single-threaded runs deterministic.

use std::collections::VecDeque;

use tokio::sync::mpsc;
use tokio::task;

use crate::dag::build::ExecGraph;
use crate::diag::Log;
use crate::node::Node;

pub(crate) async fn execute(graph: ExecGraph, dry_run: bool, workers: usize, log: &Log) {
    let total = graph.nodes.len();
    if total == 0 {
        return;
    }
    let workers = workers.max(1);

    let mut remaining: Vec<usize> = graph.dependencies.iter().map(Vec::len).collect();
    let mut queue: VecDeque<usize> = (0..total).filter(|&i| remaining[i] == 0).collect();
    let (done_tx, mut done_rx) = mpsc::channel::<usize>(total);
    let mut in_flight = 0usize;
    let mut finished = 0usize;
    let mut interrupted = false;

    while finished < total {
        while !interrupted && in_flight < workers {
            let Some(idx) = queue.pop_front() else { break };
            dispatch(idx, graph.nodes[idx].clone(), dry_run, log.clone(), done_tx.clone());
            in_flight += 1;
        }
        if in_flight == 0 {
            // Interrupted, or (with a malformed graph) nothing left that
            // can be dispatched.
            break;
        }

        tokio::select! {
            completed = done_rx.recv() => {
                let Some(idx) = completed else { break };
                in_flight -= 1;
                finished += 1;
                for &dependent in &graph.dependents[idx] {
                    remaining[dependent] -= 1;
                    if remaining[dependent] == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
            _ = tokio::signal::ctrl_c(), if !interrupted => {
                log.info("Interrupted, shutting down...");
                interrupted = true;
                queue.clear();
            }
        }
    }

    // In-flight actions are never interrupted; wait for them to finish.
    while in_flight > 0 {
        match done_rx.recv().await {
            Some(_) => in_flight -= 1,
            None => break,
        }
    }
}

/// Run one node visit on the blocking pool and report its completion.
///
/// The supervising task reports even when the visit panics, so a failing
/// action cannot wedge the dispatch loop.
fn dispatch(idx: usize, node: Node, dry_run: bool, log: Log, done: mpsc::Sender<usize>) {
    let visit = task::spawn_blocking({
        let node = node.clone();
        let log = log.clone();
        move || node.visit(dry_run, &log)
    });
    task::spawn(async move {
        match visit.await {
            Ok(()) => log.debug(&format!("{}: Task completed", node.name())),
            Err(err) => log.error(&format!("{}: Task failed: {err}", node.name())),
        }
        let _ = done.send(idx).await;
    });
}
