// src/task.rs

//! The staged task-declaration protocol.
//!
//! A task function supplies its description in fixed stages: first the
//! task name (the argument to the `Workflow` constructor), then -- through
//! ordered calls on the [`TaskDef`] passed to its declaration closure --
//! the assets container, the requirements container, and finally the
//! action body. The engine consumes the stages in that order and validates
//! completeness per task kind when the closure returns:
//!
//! | Kind       | assets stage | requirements stage  | action body |
//! |------------|--------------|---------------------|-------------|
//! | Basic      | required     | optional (none)     | optional    |
//! | Collection | rejected     | required            | ignored     |
//! | External   | required     | rejected            | ignored     |
//!
//! Preparation code between stages runs inside the closure and must be
//! free of external side effects; requirement nodes are obtained by
//! invoking other task functions against the same [`crate::Workflow`].

use std::collections::BTreeMap;

use anyhow::Result;

use crate::asset::Assets;
use crate::errors::EngineError;
use crate::node::Node;

/// The executable body of a Basic task.
pub type Action = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Basic,
    Collection,
    External,
}

/// Container of a task's requirements. Mirrors the asset container shapes
/// plus "none"; every entry is a [`Node`] returned from another task
/// invocation.
#[derive(Clone, Debug, Default)]
pub enum Requirements {
    #[default]
    None,
    One(Node),
    List(Vec<Node>),
    Map(BTreeMap<String, Node>),
}

impl Requirements {
    pub fn is_none(&self) -> bool {
        match self {
            Requirements::None => true,
            Requirements::One(_) => false,
            Requirements::List(nodes) => nodes.is_empty(),
            Requirements::Map(nodes) => nodes.is_empty(),
        }
    }

    /// Collapse the container into a flat list, discarding shape.
    pub fn flatten(&self) -> Vec<Node> {
        match self {
            Requirements::None => Vec::new(),
            Requirements::One(node) => vec![node.clone()],
            Requirements::List(nodes) => nodes.clone(),
            Requirements::Map(nodes) => nodes.values().cloned().collect(),
        }
    }
}

impl From<Node> for Requirements {
    fn from(node: Node) -> Self {
        Requirements::One(node)
    }
}

impl From<Vec<Node>> for Requirements {
    fn from(nodes: Vec<Node>) -> Self {
        Requirements::List(nodes)
    }
}

impl<const N: usize> From<[Node; N]> for Requirements {
    fn from(nodes: [Node; N]) -> Self {
        Requirements::List(nodes.into())
    }
}

impl From<BTreeMap<String, Node>> for Requirements {
    fn from(nodes: BTreeMap<String, Node>) -> Self {
        Requirements::Map(nodes)
    }
}

impl From<Option<Node>> for Requirements {
    fn from(node: Option<Node>) -> Self {
        match node {
            Some(node) => Requirements::One(node),
            None => Requirements::None,
        }
    }
}

impl From<()> for Requirements {
    fn from(_: ()) -> Self {
        Requirements::None
    }
}

/// In-progress declaration record, handed to the user's declaration
/// closure by the `Workflow` constructors.
pub struct TaskDef {
    kind: TaskKind,
    assets: Option<Assets>,
    requirements: Option<Requirements>,
    action: Option<Action>,
    violation: Option<String>,
}

impl TaskDef {
    pub(crate) fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            assets: None,
            requirements: None,
            action: None,
            violation: None,
        }
    }

    /// Declare the assets stage. Exactly once for Basic and External
    /// tasks; a protocol error for Collections.
    pub fn assets(&mut self, assets: impl Into<Assets>) {
        if self.kind == TaskKind::Collection {
            self.violate("a collection declares no assets of its own");
            return;
        }
        if self.assets.is_some() {
            self.violate("assets stage declared twice");
            return;
        }
        self.assets = Some(assets.into());
    }

    /// Declare the requirements stage. Follows the assets stage for Basic
    /// tasks; a protocol error for Externals.
    pub fn requires(&mut self, requirements: impl Into<Requirements>) {
        match self.kind {
            TaskKind::External => {
                self.violate("an external task declares no requirements");
                return;
            }
            TaskKind::Basic if self.assets.is_none() => {
                self.violate("requirements stage declared before assets stage");
                return;
            }
            _ => {}
        }
        if self.requirements.is_some() {
            self.violate("requirements stage declared twice");
            return;
        }
        self.requirements = Some(requirements.into());
    }

    /// Supply the action body. Only meaningful for Basic tasks; silently
    /// ignored for the other kinds, which have no executable action.
    pub fn action<F>(&mut self, action: F)
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        if self.action.is_some() {
            self.violate("action declared twice");
            return;
        }
        self.action = Some(Box::new(action));
    }

    fn violate(&mut self, detail: &str) {
        // Keep the first violation; later ones are usually knock-on.
        if self.violation.is_none() {
            self.violation = Some(detail.to_string());
        }
    }

    /// Validate stage completeness and produce the final declaration
    /// record.
    pub(crate) fn seal(self, taskname: &str) -> Result<Declaration, EngineError> {
        let malformed = |detail: &str| EngineError::MalformedDeclaration {
            task: taskname.to_string(),
            detail: format!("{detail}: Check the declared stages"),
        };

        if let Some(detail) = self.violation {
            return Err(malformed(&detail));
        }

        let (assets, requirements, action) = match self.kind {
            TaskKind::Basic => {
                let assets = self.assets.ok_or_else(|| malformed("missing assets stage"))?;
                (assets, self.requirements.unwrap_or_default(), self.action)
            }
            TaskKind::Collection => {
                let requirements = self
                    .requirements
                    .ok_or_else(|| malformed("missing requirements stage"))?;
                // The action, if any, was a silent user error: drop it.
                (Assets::Empty, requirements, None)
            }
            TaskKind::External => {
                let assets = self.assets.ok_or_else(|| malformed("missing assets stage"))?;
                (assets, Requirements::None, None)
            }
        };

        Ok(Declaration {
            kind: self.kind,
            assets,
            requirements,
            action,
        })
    }
}

/// A sealed declaration: everything a [`Node`] is built from.
pub(crate) struct Declaration {
    pub kind: TaskKind,
    pub assets: Assets,
    pub requirements: Requirements,
    pub action: Option<Action>,
}
