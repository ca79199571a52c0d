// src/registry.rs

//! Compiled-in workflow modules for the CLI front door.
//!
//! A compiled binary cannot import arbitrary modules the way a scripting
//! runtime can, so the CLI resolves its module identifier against this
//! registry instead. The programmatic API ([`crate::invoke`]) is the real
//! extension point; the registry only exists so the binary has workflows
//! to run and `--show` has something to list.

use serde_json::Value;

use crate::errors::{EngineError, Result};
use crate::node::Node;
use crate::workflow::Workflow;

/// One invocable task entry point within a module.
pub struct TaskEntry {
    pub name: &'static str,
    /// First line of the task's documentation, shown by `--show`.
    pub doc: &'static str,
    /// Build the task's node from JSON-coerced CLI arguments.
    pub build: fn(&Workflow, &[Value]) -> Result<Node>,
}

/// A named collection of task entry points.
pub struct Module {
    pub name: &'static str,
    pub doc: &'static str,
    pub tasks: &'static [TaskEntry],
}

impl Module {
    pub fn task(&self, name: &str) -> Result<&TaskEntry> {
        self.tasks
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| EngineError::UnknownTask(name.to_string()).into())
    }
}

static MODULES: &[&Module] = &[&crate::demo::teatime::MODULE];

/// All registered modules.
pub fn modules() -> &'static [&'static Module] {
    MODULES
}

/// Resolve a module identifier.
pub fn lookup(name: &str) -> Result<&'static Module> {
    modules()
        .iter()
        .find(|module| module.name == name)
        .copied()
        .ok_or_else(|| EngineError::UnknownModule(name.to_string()).into())
}
