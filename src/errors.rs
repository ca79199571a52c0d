// src/errors.rs

//! Crate-wide error types and aliases.
//!
//! Most plumbing uses `anyhow` directly; `EngineError` covers the handful
//! of engine-level failures that abort an invocation and drive the CLI
//! exit code.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Invalid task argument: {0}")]
    BadArgument(String),

    #[error("Malformed declaration of task '{task}': {detail}")]
    MalformedDeclaration { task: String, detail: String },

    #[error("Cycle detected in task graph involving '{0}'")]
    Cycle(String),
}

pub use anyhow::{Error, Result};
