// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::Parser;
use serde_json::Value;

/// Command-line arguments for `dagmake`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagmake",
    version,
    about = "Make assets ready by running tasks in dependency order.",
    long_about = None
)]
pub struct CliArgs {
    /// Workflow module name (use --show to list its tasks).
    #[arg(value_name = "MODULE")]
    pub module: String,

    /// Task name to invoke.
    #[arg(value_name = "TASK")]
    pub function: Option<String>,

    /// Task arguments, parsed as JSON values (bare words become strings).
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Run in dry-run mode: report what would be done without doing it.
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Emit a Graphviz DOT rendering of the task graph on stdout after the run.
    #[arg(short = 'g', long)]
    pub graph: bool,

    /// List the module's tasks and exit without executing anything.
    #[arg(short = 's', long)]
    pub show: bool,

    /// Number of concurrent workers.
    #[arg(short = 't', long, value_name = "N", default_value_t = 1)]
    pub threads: usize,

    /// Enable debug-level diagnostics.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// Coerce a positional argument to a JSON value. Anything that does not
/// parse as JSON is taken as a plain string, so `42`, `true`, `"[1,2]"`,
/// and `some/path` all do what the caller meant.
pub fn reify(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
