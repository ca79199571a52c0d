#![allow(dead_code)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dagmake::{Asset, Log, Node, Options, Requirements, Workflow};

/// Cloneable in-memory sink capturing engine diagnostics for assertions.
#[derive(Clone, Default)]
pub struct LogBuffer {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Log {
        Log::to_writer(Box::new(self.clone()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Default options wired to a capture buffer.
pub fn options(buffer: &LogBuffer) -> Options {
    Options {
        log: Some(buffer.log()),
        ..Options::default()
    }
}

pub type Counter = Arc<AtomicUsize>;

pub fn counter() -> Counter {
    Arc::new(AtomicUsize::new(0))
}

pub fn count_of(counter: &Counter) -> usize {
    counter.load(Ordering::SeqCst)
}

/// A Basic task whose asset is `path` and whose action creates the file
/// and bumps `runs`.
pub fn file_task(
    wf: &Workflow,
    taskname: &str,
    path: PathBuf,
    requirement: impl Into<Requirements>,
    runs: Counter,
) -> Node {
    wf.task(taskname, |t| {
        t.assets(Asset::file(path.clone()));
        t.requires(requirement);
        t.action(move || {
            runs.fetch_add(1, Ordering::SeqCst);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, b"done")?;
            Ok(())
        });
        Ok(())
    })
}

/// The three-task chain from the end-to-end scenarios: C requires B
/// requires A, with per-task action counters shared across invocations.
pub struct Chain {
    pub a: Counter,
    pub b: Counter,
    pub c: Counter,
}

impl Chain {
    pub fn new() -> Self {
        Self {
            a: counter(),
            b: counter(),
            c: counter(),
        }
    }

    /// Root is C itself.
    pub fn build(&self, wf: &Workflow, dir: &Path) -> Node {
        let a = file_task(wf, "A", dir.join("a"), (), self.a.clone());
        let b = file_task(wf, "B", dir.join("b"), a, self.b.clone());
        file_task(wf, "C", dir.join("c"), b, self.c.clone())
    }

    /// Root is a collection over all three tasks.
    pub fn build_all(&self, wf: &Workflow, dir: &Path) -> Node {
        let a = file_task(wf, "A", dir.join("a"), (), self.a.clone());
        let b = file_task(wf, "B", dir.join("b"), a.clone(), self.b.clone());
        let c = file_task(wf, "C", dir.join("c"), b.clone(), self.c.clone());
        wf.collection("everything", |t| {
            t.requires(vec![a, b, c]);
            Ok(())
        })
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (count_of(&self.a), count_of(&self.b), count_of(&self.c))
    }
}
