// src/node.rs

//! Task-graph nodes.
//!
//! A [`Node`] is the runtime handle returned from a task invocation. It is
//! a cheap clone around shared state; two handles with the same task name
//! are the same node as far as the engine is concerned (identity is the
//! name, enforced by deduplication in [`crate::Workflow`]).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use crate::asset::{Assets, Refs};
use crate::diag::Log;
use crate::task::{Action, Declaration, Requirements, TaskKind};

#[derive(Clone)]
pub struct Node {
    inner: Arc<Inner>,
}

struct Inner {
    taskname: String,
    kind: TaskKind,
    assets: Assets,
    /// Interior-mutable: cleared by the graph builder when the node reads
    /// ready (its requirements are no longer relevant for execution).
    requirements: Mutex<Requirements>,
    /// Cached readiness verdict. Reset at engine-visible occasions so the
    /// predicates are re-queried across potential state changes.
    ready: Mutex<Option<bool>>,
    /// Taken at most once, by the first (only) execution of the action.
    action: Mutex<Option<Action>>,
    /// Set when the declaration failed; such a node is never ready and
    /// never runs an action.
    failure: Option<String>,
}

impl Node {
    pub(crate) fn from_declaration(taskname: String, decl: Declaration) -> Self {
        let assets = match decl.kind {
            // A collection's assets are those of its requirements, taken
            // at declaration time; its readiness is their conjunction.
            TaskKind::Collection => Assets::List(
                decl.requirements
                    .flatten()
                    .iter()
                    .flat_map(|req| req.assets().flatten())
                    .collect(),
            ),
            _ => decl.assets,
        };
        Self {
            inner: Arc::new(Inner {
                taskname,
                kind: decl.kind,
                assets,
                requirements: Mutex::new(decl.requirements),
                ready: Mutex::new(None),
                action: Mutex::new(decl.action),
                failure: None,
            }),
        }
    }

    pub(crate) fn poisoned(taskname: String, kind: TaskKind, detail: String) -> Self {
        Self {
            inner: Arc::new(Inner {
                taskname,
                kind,
                assets: Assets::Empty,
                requirements: Mutex::new(Requirements::None),
                ready: Mutex::new(None),
                action: Mutex::new(None),
                failure: Some(detail),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.taskname
    }

    pub fn kind(&self) -> TaskKind {
        self.inner.kind
    }

    pub fn assets(&self) -> Assets {
        self.inner.assets.clone()
    }

    /// Shape-preserving projection of the node's asset references.
    pub fn refs(&self) -> Refs {
        self.inner.assets.refs()
    }

    pub fn requirements(&self) -> Requirements {
        self.inner
            .requirements
            .lock()
            .expect("requirements lock poisoned")
            .clone()
    }

    /// The declaration failure, if the task's stages could not be
    /// consumed.
    pub fn failure(&self) -> Option<&str> {
        self.inner.failure.as_deref()
    }

    /// Are the assets represented by this node ready? The verdict is
    /// cached until the engine resets it.
    pub fn ready(&self) -> bool {
        let mut cached = self.inner.ready.lock().expect("ready lock poisoned");
        *cached.get_or_insert_with(|| self.inner.failure.is_none() && self.inner.assets.all_ready())
    }

    pub(crate) fn reset_ready(&self) {
        *self.inner.ready.lock().expect("ready lock poisoned") = None;
    }

    pub(crate) fn clear_requirements(&self) {
        *self
            .inner
            .requirements
            .lock()
            .expect("requirements lock poisoned") = Requirements::None;
    }

    /// Graphviz DOT rendering of the graph rooted at this node.
    pub fn graph(&self) -> String {
        crate::dag::dot::render(self)
    }

    /// Execute this node's turn: run the action if (and only if) the
    /// readiness-first rules allow it, then report the final verdict.
    pub(crate) fn visit(&self, dry_run: bool, log: &Log) {
        self.reset_ready();
        if self.inner.kind == TaskKind::Basic
            && self.inner.failure.is_none()
            && !self.ready()
            && self.requirements().flatten().iter().all(Node::ready)
        {
            if dry_run {
                log.info(&format!("{}: SKIPPING (DRY RUN)", self.name()));
            } else {
                let action = self
                    .inner
                    .action
                    .lock()
                    .expect("action lock poisoned")
                    .take();
                if let Some(action) = action {
                    log.info(&format!("{}: Executing", self.name()));
                    if let Err(err) = action() {
                        log.error(&format!("{}: Task failed: {err:#}", self.name()));
                    }
                }
            }
        }
        self.report_readiness(log);
    }

    /// Emit the readiness record for this node: the verdict, and -- when
    /// not ready -- the per-requirement breakdown.
    pub(crate) fn report_readiness(&self, log: &Log) {
        self.reset_ready();
        let ready = self.ready();
        let extmsg = if self.inner.kind == TaskKind::External && !ready {
            " [external asset]"
        } else {
            ""
        };
        if ready {
            log.info(&format!("{}: Ready{extmsg}", self.name()));
            return;
        }
        log.warning(&format!("{}: Not ready{extmsg}", self.name()));
        let requirements = self.requirements().flatten();
        if requirements.is_empty() {
            return;
        }
        log.warning(&format!("{}: Requires:", self.name()));
        for req in requirements {
            let status = if req.ready() { "✔" } else { "✖" };
            log.warning(&format!("{}: {status} {}", self.name(), req.name()));
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.inner.taskname == other.inner.taskname
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.taskname.hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("taskname", &self.inner.taskname)
            .field("kind", &self.inner.kind)
            .finish_non_exhaustive()
    }
}
