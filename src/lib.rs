// src/lib.rs

pub mod asset;
pub mod cli;
pub mod dag;
pub mod demo;
pub mod diag;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod node;
pub mod registry;
pub mod task;
pub mod workflow;

use anyhow::{anyhow, Result};

pub use asset::{Asset, Assets, Ref, Refs};
pub use diag::Log;
pub use errors::EngineError;
pub use node::Node;
pub use task::{Requirements, TaskDef, TaskKind};
pub use workflow::{invoke, Options, Workflow};

use crate::cli::CliArgs;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - module and task resolution against the registry
/// - JSON coercion of positional arguments
/// - the engine invocation itself
/// - optional DOT output
pub async fn run(args: CliArgs) -> Result<()> {
    let module = registry::lookup(&args.module)?;

    if args.show {
        println!("Tasks in {}:", module.name);
        for task in module.tasks {
            println!("  {}", task.name);
            if !task.doc.is_empty() {
                println!("    {}", task.doc);
            }
        }
        return Ok(());
    }

    let function = args
        .function
        .as_deref()
        .ok_or_else(|| anyhow!("Specify a task name (or --show to list tasks)"))?;
    if args.threads < 1 {
        return Err(anyhow!("Specify at least 1 worker thread"));
    }
    let entry = module.task(function)?;
    let values: Vec<serde_json::Value> = args.args.iter().map(|raw| cli::reify(raw)).collect();

    let options = Options {
        dry_run: args.dry_run,
        workers: args.threads,
        log: None,
    };
    let root = invoke(options, |wf| (entry.build)(wf, &values)).await?;

    if args.graph {
        println!("{}", root.graph());
    }
    Ok(())
}
