// src/workflow.rs

//! Per-invocation engine state and the programmatic entry point.
//!
//! A [`Workflow`] owns the canonical node map for one invocation. Task
//! functions take `&Workflow` and declare themselves through
//! [`Workflow::task`], [`Workflow::collection`], or [`Workflow::external`];
//! the first declaration of a name wins, and every later declaration of
//! the same name is evaluated, discarded, and answered with the canonical
//! handle. Deduplication is therefore complete before execution begins.
//!
//! [`invoke`] is the front door: build the graph from a root task
//! function, assemble and prune it, execute it, and return the root node.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

use crate::diag::Log;
use crate::errors::EngineError;
use crate::node::Node;
use crate::task::{TaskDef, TaskKind};

/// Reserved options consumed by the engine; never forwarded to user code.
#[derive(Debug, Default)]
pub struct Options {
    /// Suppress all action execution.
    pub dry_run: bool,
    /// Concurrency level; 0 is treated as 1.
    pub workers: usize,
    /// Redirect engine diagnostics to this sink instead of `tracing`.
    pub log: Option<Log>,
}

pub struct Workflow {
    log: Log,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    canonical: HashMap<String, Node>,
}

impl Workflow {
    pub(crate) fn new(log: Log) -> Self {
        Self {
            log,
            state: Mutex::new(State::default()),
        }
    }

    /// The invocation's diagnostic handle, for task code that wants to log
    /// through the same sink as the engine.
    pub fn log(&self) -> &Log {
        &self.log
    }

    /// Declare a Basic task: assets the workflow can produce by running
    /// the action once the requirements are ready.
    pub fn task<F>(&self, taskname: impl Into<String>, declare: F) -> Node
    where
        F: FnOnce(&mut TaskDef) -> Result<()>,
    {
        self.declare(taskname.into(), TaskKind::Basic, declare)
    }

    /// Declare a Collection: a named conjunction over other tasks, with no
    /// assets or action of its own.
    pub fn collection<F>(&self, taskname: impl Into<String>, declare: F) -> Node
    where
        F: FnOnce(&mut TaskDef) -> Result<()>,
    {
        self.declare(taskname.into(), TaskKind::Collection, declare)
    }

    /// Declare an External: assets the workflow cannot produce and only
    /// observes.
    pub fn external<F>(&self, taskname: impl Into<String>, declare: F) -> Node
    where
        F: FnOnce(&mut TaskDef) -> Result<()>,
    {
        self.declare(taskname.into(), TaskKind::External, declare)
    }

    fn declare<F>(&self, taskname: String, kind: TaskKind, declare: F) -> Node
    where
        F: FnOnce(&mut TaskDef) -> Result<()>,
    {
        // Drive the declaration stages. This runs even when the name is
        // already canonical: preparation code and requirement invocations
        // behave identically from every call site, and the redundant
        // record (action included) is simply dropped below.
        let mut def = TaskDef::new(kind);
        let sealed = match declare(&mut def) {
            Ok(()) => def.seal(&taskname),
            Err(err) => Err(EngineError::MalformedDeclaration {
                task: taskname.clone(),
                detail: format!("declaration failed: {err:#}"),
            }),
        };
        let node = match sealed {
            Ok(decl) => Node::from_declaration(taskname.clone(), decl),
            Err(err) => {
                self.log.error(&err.to_string());
                let detail = match err {
                    EngineError::MalformedDeclaration { detail, .. } => detail,
                    other => other.to_string(),
                };
                Node::poisoned(taskname.clone(), kind, detail)
            }
        };

        let mut state = self.state.lock().expect("workflow state lock poisoned");
        if let Some(canonical) = state.canonical.get(&taskname) {
            return canonical.clone();
        }
        state.canonical.insert(taskname, node.clone());
        node
    }
}

/// Run a workflow to completion: build the task graph from the root task
/// function, deduplicate and prune it, execute it with the configured
/// concurrency, and return the root node (whose `ready` is the outcome).
///
/// A malformed root declaration is an engine error; malformed non-root
/// declarations are contained at their node.
pub async fn invoke<F>(options: Options, build: F) -> Result<Node>
where
    F: FnOnce(&Workflow) -> Result<Node>,
{
    let log = options.log.unwrap_or_default();
    let workflow = Workflow::new(log.clone());
    let root = build(&workflow)?;
    if let Some(detail) = root.failure() {
        return Err(EngineError::MalformedDeclaration {
            task: root.name().to_string(),
            detail: detail.to_string(),
        }
        .into());
    }
    let graph = crate::dag::build::assemble(&root, &log)?;
    crate::exec::executor::execute(graph, options.dry_run, options.workers, &log).await;
    Ok(root)
}
