// tests/run_command.rs

mod common;

use common::LogBuffer;
use dagmake::exec::run_command;

#[test]
fn successful_command_reports_true() {
    let buffer = LogBuffer::new();
    let ok = run_command(&buffer.log(), "greet", "echo hello", None, None, true);
    assert!(ok);
    let text = buffer.text();
    assert!(text.contains("greet: Running: echo hello"), "log was:\n{text}");
    assert!(text.contains("greet:         hello"), "log was:\n{text}");
}

#[test]
fn failing_command_reports_false_and_logs_output() {
    let buffer = LogBuffer::new();
    let ok = run_command(
        &buffer.log(),
        "doomed",
        "echo oops >&2; exit 3",
        None,
        None,
        false,
    );
    assert!(!ok);
    let text = buffer.text();
    assert!(text.contains("doomed:     Failed with status: 3"), "log was:\n{text}");
    assert!(text.contains("doomed:         oops"), "log was:\n{text}");
}

#[test]
fn command_runs_in_requested_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let buffer = LogBuffer::new();
    let ok = run_command(
        &buffer.log(),
        "touch",
        "echo content > produced",
        Some(dir.path()),
        None,
        false,
    );
    assert!(ok);
    assert!(dir.path().join("produced").is_file());
}
