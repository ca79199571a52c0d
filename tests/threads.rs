// tests/threads.rs

mod common;

use std::error::Error;
use std::time::Duration;

use common::{count_of, counter, file_task, options, Chain, Counter, LogBuffer};
use dagmake::{invoke, Node, Options, Workflow};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn four_workers_preserve_chain_semantics() -> TestResult {
    let dir = tempfile::tempdir()?;
    let chain = Chain::new();
    let buffer = LogBuffer::new();

    let root = invoke(
        Options {
            workers: 4,
            log: Some(buffer.log()),
            ..Options::default()
        },
        |wf| Ok(chain.build(wf, dir.path())),
    )
    .await?;

    assert!(root.ready());
    assert_eq!(chain.counts(), (1, 1, 1));
    assert!(dir.path().join("a").is_file());
    assert!(dir.path().join("b").is_file());
    assert!(dir.path().join("c").is_file());
    Ok(())
}

fn fanout(wf: &Workflow, dir: &std::path::Path, counters: &[Counter]) -> Node {
    let tasks: Vec<Node> = counters
        .iter()
        .enumerate()
        .map(|(i, runs)| {
            let path = dir.join(format!("part-{i}"));
            let runs = runs.clone();
            wf.task(format!("part {i}"), move |t| {
                t.assets(dagmake::Asset::file(path.clone()));
                t.action(move || {
                    // Give the pool a chance to actually overlap workers.
                    std::thread::sleep(Duration::from_millis(10));
                    runs.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    std::fs::write(&path, b"done")?;
                    Ok(())
                });
                Ok(())
            })
        })
        .collect();
    wf.collection("all parts", |t| {
        t.requires(tasks);
        Ok(())
    })
}

#[tokio::test]
async fn wide_fanout_runs_every_task_exactly_once() -> TestResult {
    let dir = tempfile::tempdir()?;
    let counters: Vec<Counter> = (0..8).map(|_| counter()).collect();
    let buffer = LogBuffer::new();

    let root = invoke(
        Options {
            workers: 4,
            log: Some(buffer.log()),
            ..Options::default()
        },
        |wf| Ok(fanout(wf, dir.path(), &counters)),
    )
    .await?;

    assert!(root.ready());
    for (i, runs) in counters.iter().enumerate() {
        assert_eq!(count_of(runs), 1, "part {i} should run exactly once");
        assert!(dir.path().join(format!("part-{i}")).is_file());
    }
    Ok(())
}

#[tokio::test]
async fn single_worker_dispatch_order_is_deterministic() -> TestResult {
    let dir = tempfile::tempdir()?;
    let buffer = LogBuffer::new();

    invoke(options(&buffer), |wf| {
        let first = file_task(wf, "first", dir.path().join("1"), (), counter());
        let second = file_task(wf, "second", dir.path().join("2"), (), counter());
        let third = file_task(wf, "third", dir.path().join("3"), (), counter());
        Ok(wf.collection("ordered", |t| {
            t.requires(vec![first, second, third]);
            Ok(())
        }))
    })
    .await?;

    let text = buffer.text();
    let pos = |needle: &str| text.find(needle).unwrap_or(usize::MAX);
    assert!(pos("first: Executing") < pos("second: Executing"), "log was:\n{text}");
    assert!(pos("second: Executing") < pos("third: Executing"), "log was:\n{text}");
    Ok(())
}
