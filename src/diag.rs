// src/diag.rs

//! Engine diagnostics.
//!
//! All engine-produced messages go through a [`Log`] handle. The default
//! handle forwards to `tracing`, so the process-wide subscriber configured
//! in [`crate::logging`] decides formatting and filtering. An invocation
//! may instead supply a writer sink via [`crate::Options`], in which case
//! the engine formats each record itself as a single line:
//!
//! ```text
//! [2026-01-01T12:00:00] WARNING cup: Not ready
//! ```

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        };
        // pad() rather than write_str() so the {:<7} column width in the
        // line format is honored.
        f.pad(s)
    }
}

enum Sink {
    Tracing,
    Writer(Mutex<Box<dyn Write + Send>>),
}

/// Cheaply clonable diagnostic handle shared by the workflow, the graph
/// builder, and every executor worker.
#[derive(Clone)]
pub struct Log {
    sink: Arc<Sink>,
}

impl Log {
    /// Forward diagnostics to the global `tracing` subscriber.
    pub fn tracing() -> Self {
        Self {
            sink: Arc::new(Sink::Tracing),
        }
    }

    /// Write formatted diagnostic lines to the given sink instead.
    pub fn to_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Arc::new(Sink::Writer(Mutex::new(writer))),
        }
    }

    pub fn debug(&self, msg: &str) {
        self.emit(Level::Debug, msg);
    }

    pub fn info(&self, msg: &str) {
        self.emit(Level::Info, msg);
    }

    pub fn warning(&self, msg: &str) {
        self.emit(Level::Warning, msg);
    }

    pub fn error(&self, msg: &str) {
        self.emit(Level::Error, msg);
    }

    fn emit(&self, level: Level, msg: &str) {
        match self.sink.as_ref() {
            Sink::Tracing => match level {
                Level::Debug => tracing::debug!("{msg}"),
                Level::Info => tracing::info!("{msg}"),
                Level::Warning => tracing::warn!("{msg}"),
                Level::Error => tracing::error!("{msg}"),
            },
            Sink::Writer(writer) => {
                let timestamp = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S");
                let mut writer = writer.lock().expect("log sink lock poisoned");
                // A failing sink must not take the engine down with it.
                let _ = writeln!(writer, "[{timestamp}] {level:<7} {msg}");
            }
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sink = match self.sink.as_ref() {
            Sink::Tracing => "tracing",
            Sink::Writer(_) => "writer",
        };
        f.debug_struct("Log").field("sink", &sink).finish()
    }
}
