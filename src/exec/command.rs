// src/exec/command.rs

//! Shell-command helper for task actions.
//!
//! Actions are opaque blocking work, so this runs the command
//! synchronously and reports the outcome as a plain boolean; output is
//! logged only on failure (or on request), with the task name prefixed
//! the way all engine diagnostics are.

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use crate::diag::Log;

/// Run `cmd` in a subshell, logging through the invocation's sink.
///
/// Returns whether the command exited successfully.
pub fn run_command(
    log: &Log,
    taskname: &str,
    cmd: &str,
    cwd: Option<&Path>,
    env: Option<&HashMap<String, String>>,
    log_output: bool,
) -> bool {
    log.info(&format!("{taskname}: Running: {cmd}"));
    if let Some(cwd) = cwd {
        log.info(&format!("{taskname}:     in {}", cwd.display()));
    }
    if let Some(env) = env {
        log.info(&format!("{taskname}:     with environment variables:"));
        for (key, val) in env {
            log.info(&format!("{taskname}:         {key}={val}"));
        }
    }

    // Platform shell, same selection as any "run this string" command.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }
    if let Some(env) = env {
        command.envs(env);
    }

    let output = match command.output() {
        Ok(output) => output,
        Err(err) => {
            log.error(&format!("{taskname}:     Failed to start: {err}"));
            return false;
        }
    };

    let success = output.status.success();
    if !success {
        log.error(&format!(
            "{taskname}:     Failed with status: {}",
            output.status.code().unwrap_or(-1)
        ));
    }
    if log_output || !success {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let lines: Vec<&str> = stdout.lines().chain(stderr.lines()).collect();
        if !lines.is_empty() {
            let emit = |msg: &str| {
                if success {
                    log.info(msg);
                } else {
                    log.error(msg);
                }
            };
            emit(&format!("{taskname}:     Output:"));
            for line in lines {
                emit(&format!("{taskname}:         {line}"));
            }
        }
    }
    success
}
