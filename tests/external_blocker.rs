// tests/external_blocker.rs

mod common;

use std::error::Error;

use common::{count_of, counter, file_task, options, LogBuffer};
use dagmake::{invoke, Asset};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn missing_external_asset_blocks_dependent() -> TestResult {
    let dir = tempfile::tempdir()?;
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    let buffer = LogBuffer::new();
    let runs = counter();

    let root = invoke(options(&buffer), |wf| {
        let upstream = wf.external("file b", |t| {
            t.assets(Asset::file(b.clone()));
            Ok(())
        });
        Ok(file_task(wf, "make a", a.clone(), upstream, runs.clone()))
    })
    .await?;

    assert!(!root.ready());
    assert!(!a.exists());
    assert_eq!(count_of(&runs), 0);

    let text = buffer.text();
    assert!(
        text.contains("file b: Not ready [external asset]"),
        "log was:\n{text}"
    );
    assert!(text.contains("make a: Not ready"), "log was:\n{text}");
    assert!(text.contains("make a: Requires:"), "log was:\n{text}");
    assert!(text.contains("make a: ✖ file b"), "log was:\n{text}");
    Ok(())
}

#[tokio::test]
async fn present_external_asset_unblocks_dependent() -> TestResult {
    let dir = tempfile::tempdir()?;
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    std::fs::write(&b, b"present")?;
    let buffer = LogBuffer::new();
    let runs = counter();

    let root = invoke(options(&buffer), |wf| {
        let upstream = wf.external("file b", |t| {
            t.assets(Asset::file(b.clone()));
            Ok(())
        });
        Ok(file_task(wf, "make a", a.clone(), upstream, runs.clone()))
    })
    .await?;

    assert!(root.ready());
    assert!(a.is_file());
    assert_eq!(count_of(&runs), 1);
    assert!(!buffer.text().contains("[external asset]"));
    Ok(())
}
