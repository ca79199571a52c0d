// src/dag/mod.rs

//! Task-graph assembly and rendering.
//!
//! - [`build`] walks the node tree rooted at the invocation's root task,
//!   prunes subtrees whose nodes are already ready, and produces the
//!   adjacency the executor schedules from.
//! - [`dot`] renders the graph as Graphviz DOT text.

pub mod build;
pub mod dot;
