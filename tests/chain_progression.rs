// tests/chain_progression.rs

mod common;

use std::error::Error;

use common::{options, Chain, LogBuffer};
use dagmake::invoke;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn chain_runs_each_task_once_then_everything_is_ready() -> TestResult {
    let dir = tempfile::tempdir()?;
    let chain = Chain::new();

    let buffer = LogBuffer::new();
    let root = invoke(options(&buffer), |wf| Ok(chain.build(wf, dir.path()))).await?;

    assert!(root.ready());
    assert!(dir.path().join("a").is_file());
    assert!(dir.path().join("b").is_file());
    assert!(dir.path().join("c").is_file());
    assert_eq!(chain.counts(), (1, 1, 1));
    let text = buffer.text();
    assert!(text.contains("A: Executing"), "log was:\n{text}");
    assert!(text.contains("C: Ready"), "log was:\n{text}");

    // Second invocation: everything is already done, nothing executes.
    let buffer = LogBuffer::new();
    let root = invoke(options(&buffer), |wf| Ok(chain.build(wf, dir.path()))).await?;

    assert!(root.ready());
    assert_eq!(chain.counts(), (1, 1, 1));
    assert!(!buffer.text().contains("Executing"));
    Ok(())
}

#[tokio::test]
async fn ready_root_elides_the_whole_subtree() -> TestResult {
    let dir = tempfile::tempdir()?;
    let chain = Chain::new();

    invoke(options(&LogBuffer::new()), |wf| Ok(chain.build(wf, dir.path()))).await?;
    assert_eq!(chain.counts(), (1, 1, 1));

    // Delete the middle asset but keep the root's own asset: readiness
    // comes first, so the root never even looks at its requirements.
    std::fs::remove_file(dir.path().join("b"))?;
    let buffer = LogBuffer::new();
    let root = invoke(options(&buffer), |wf| Ok(chain.build(wf, dir.path()))).await?;

    assert!(root.ready());
    assert_eq!(chain.counts(), (1, 1, 1));
    assert!(!dir.path().join("b").exists());
    assert!(buffer.text().contains("C: Ready"));
    assert!(!buffer.text().contains("Executing"));
    Ok(())
}
