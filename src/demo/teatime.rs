// src/demo/teatime.rs

//! The tea-making demo workflow.
//!
//! Brews a cup of steeped tea with sugar under a base directory:
//! a cup (directory), a tea bag from an external box, boiling water,
//! steeping time, and finally sugar. Run it with
//! `dagmake teatime a_cup_of_tea <basedir>`; rerunning skips everything
//! already done, and the steeping-time asset shows a readiness predicate
//! the workflow cannot rush.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::Result;
use serde_json::Value;

use crate::asset::Asset;
use crate::errors::EngineError;
use crate::node::Node;
use crate::registry::{Module, TaskEntry};
use crate::workflow::Workflow;

/// How long poured water must sit before the tea counts as steeped.
const STEEP_TIME: Duration = Duration::from_secs(10);

pub static MODULE: Module = Module {
    name: "teatime",
    doc: "Brew a cup of steeped tea with sugar.",
    tasks: &TASKS,
};

static TASKS: [TaskEntry; 7] = [
    TaskEntry {
        name: "a_cup_of_tea",
        doc: "The cup and the finished tea, all together.",
        build: build_a_cup_of_tea,
    },
    TaskEntry {
        name: "box_of_tea_bags",
        doc: "The box of tea bags the workflow cannot produce itself.",
        build: build_box_of_tea_bags,
    },
    TaskEntry {
        name: "cup",
        doc: "A cup to make the tea in.",
        build: build_cup,
    },
    TaskEntry {
        name: "steeped_tea",
        doc: "Tea that has had time to steep.",
        build: build_steeped_tea,
    },
    TaskEntry {
        name: "steeped_tea_with_sugar",
        doc: "Steeped tea with sugar added.",
        build: build_steeped_tea_with_sugar,
    },
    TaskEntry {
        name: "steeping_tea",
        doc: "Boiling water poured over the tea bag.",
        build: build_steeping_tea,
    },
    TaskEntry {
        name: "tea_bag",
        doc: "A tea bag placed in the cup.",
        build: build_tea_bag,
    },
];

fn dir_arg(args: &[Value]) -> Result<PathBuf> {
    let raw = args
        .first()
        .ok_or_else(|| EngineError::BadArgument("expected a directory argument".into()))?;
    let s = raw
        .as_str()
        .ok_or_else(|| EngineError::BadArgument(format!("directory must be a string, got {raw}")))?;
    Ok(PathBuf::from(s))
}

fn build_a_cup_of_tea(wf: &Workflow, args: &[Value]) -> Result<Node> {
    Ok(a_cup_of_tea(wf, &dir_arg(args)?))
}

fn build_box_of_tea_bags(wf: &Workflow, args: &[Value]) -> Result<Node> {
    Ok(box_of_tea_bags(wf, &dir_arg(args)?))
}

fn build_cup(wf: &Workflow, args: &[Value]) -> Result<Node> {
    Ok(cup(wf, &dir_arg(args)?))
}

fn build_steeped_tea(wf: &Workflow, args: &[Value]) -> Result<Node> {
    Ok(steeped_tea(wf, &dir_arg(args)?))
}

fn build_steeped_tea_with_sugar(wf: &Workflow, args: &[Value]) -> Result<Node> {
    Ok(steeped_tea_with_sugar(wf, &dir_arg(args)?))
}

fn build_steeping_tea(wf: &Workflow, args: &[Value]) -> Result<Node> {
    Ok(steeping_tea(wf, &dir_arg(args)?))
}

fn build_tea_bag(wf: &Workflow, args: &[Value]) -> Result<Node> {
    Ok(tea_bag(wf, &dir_arg(args)?))
}

/// The whole order: cup plus finished tea.
pub fn a_cup_of_tea(wf: &Workflow, basedir: &Path) -> Node {
    let the_cup = cup(wf, basedir);
    // The cup's ref is its directory; everything else happens inside it.
    let cupdir = the_cup
        .refs()
        .one()
        .and_then(|r| r.downcast::<PathBuf>().ok())
        .map(|p| p.as_ref().clone())
        .unwrap_or_else(|| basedir.join("cup"));
    let tea = steeped_tea_with_sugar(wf, &cupdir);
    wf.collection("A cup of steeped tea with sugar", |t| {
        t.requires(vec![the_cup, tea]);
        Ok(())
    })
}

/// Get a cup to make the tea in.
pub fn cup(wf: &Workflow, basedir: &Path) -> Node {
    let path = basedir.join("cup");
    wf.task(format!("The cup: {}", path.display()), |t| {
        t.assets(Asset::dir(path.clone()));
        let path = path.clone();
        t.action(move || {
            fs::create_dir_all(&path)?;
            Ok(())
        });
        Ok(())
    })
}

/// Add sugar to the steeped tea.
pub fn steeped_tea_with_sugar(wf: &Workflow, cupdir: &Path) -> Node {
    let steeped = steeped_tea(wf, cupdir);
    ingredient(wf, cupdir, "sugar", "Steeped tea with sugar", Some(steeped))
}

/// Give the tea time to steep. No action can hurry this along: readiness
/// comes from the age of the poured water.
pub fn steeped_tea(wf: &Workflow, cupdir: &Path) -> Node {
    let water_node = steeping_tea(wf, cupdir);
    let log = wf.log().clone();
    let taskname = format!("Steeped tea in {}", cupdir.display());
    let fallback = cupdir.join("water");
    wf.task(taskname, |t| {
        let water = water_node
            .refs()
            .one()
            .and_then(|r| r.downcast::<PathBuf>().ok())
            .map(|p| p.as_ref().clone())
            .unwrap_or(fallback);
        let mut steeped = false;
        if let Ok(metadata) = fs::metadata(&water) {
            let poured = metadata.modified()?;
            let ready_at = poured + STEEP_TIME;
            let now = SystemTime::now();
            steeped = now >= ready_at;
            if !steeped {
                if let Ok(left) = ready_at.duration_since(now) {
                    log.info(&format!("Tea steeping for {}s more", left.as_secs()));
                }
            }
        }
        t.assets(Asset::new((), move || steeped));
        t.requires(water_node.clone());
        Ok(())
    })
}

/// Pour boiling water over the tea bag.
pub fn steeping_tea(wf: &Workflow, cupdir: &Path) -> Node {
    let bag = tea_bag(wf, cupdir);
    ingredient(wf, cupdir, "water", "Boiling water over the tea", Some(bag))
}

/// Place a tea bag in the cup.
pub fn tea_bag(wf: &Workflow, cupdir: &Path) -> Node {
    let the_box = box_of_tea_bags(wf, cupdir);
    ingredient(wf, cupdir, "tea", "Tea bag", Some(the_box))
}

/// The box of tea bags: the workflow can only observe it, never make it.
pub fn box_of_tea_bags(wf: &Workflow, cupdir: &Path) -> Node {
    let path = cupdir.parent().unwrap_or(cupdir).join("box-of-tea");
    wf.external(format!("Tea from store: {}", path.display()), |t| {
        t.assets(Asset::file(path.clone()));
        Ok(())
    })
}

/// An ingredient is a file in the cup, created by touching it once its
/// requirement is ready.
fn ingredient(
    wf: &Workflow,
    cupdir: &Path,
    filename: &str,
    what: &str,
    requirement: Option<Node>,
) -> Node {
    let path = cupdir.join(filename);
    wf.task(format!("{what} in {}", cupdir.display()), |t| {
        t.assets(Asset::file(path.clone()));
        t.requires(requirement);
        t.action(move || {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, b"")?;
            Ok(())
        });
        Ok(())
    })
}
