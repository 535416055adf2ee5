// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Child-process execution with a wall-clock timeout.
//!
//! Setup files and test files both go through [`run_file`]: the project
//! runner argv is expanded with the file path, the process runs with the
//! session environment, and output is captured off-thread so a chatty child
//! cannot deadlock on a full pipe. On timeout the child is killed and the
//! partial output kept.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Placeholder in runner argv replaced by the file under execution.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Polling interval while waiting for the child.
const WAIT_POLL: Duration = Duration::from_millis(10);

/// What to execute and under which constraints.
pub struct ExecRequest<'a> {
    /// Runner argv prefix; `{file}` elements are substituted, otherwise the
    /// file is appended. Must not be empty (config validation guarantees it).
    pub runner: &'a [String],
    /// File to execute, relative to `cwd`.
    pub file: &'a Path,
    /// Working directory (the project root).
    pub cwd: &'a Path,
    /// Session environment variables.
    pub env: &'a [(String, String)],
    /// Extra per-invocation variables (e.g. the coverage output path).
    pub extra_env: &'a [(String, String)],
    /// Wall-clock bound.
    pub timeout: Duration,
}

/// Captured outcome of one child process.
#[derive(Debug)]
pub struct ExecOutcome {
    /// Exit code, if the process exited normally before the timeout.
    pub exit_code: Option<i32>,
    /// True when the child was killed for exceeding the timeout.
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ExecOutcome {
    /// True when the process completed with exit code zero.
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Run one file under the runner and wait for it, bounded by the timeout.
///
/// Returns `Err` only when the child cannot be spawned (runner missing,
/// permission denied); everything after a successful spawn is reported
/// through [`ExecOutcome`].
pub fn run_file(req: &ExecRequest<'_>) -> std::io::Result<ExecOutcome> {
    let argv = expand_argv(req.runner, req.file);
    let (program, args) = argv.split_first().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty runner argv")
    })?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(req.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in req.env.iter().chain(req.extra_env.iter()) {
        cmd.env(key, value);
    }

    let start = Instant::now();
    let mut child = cmd.spawn()?;

    // Drain both pipes off-thread; the child may write more than a pipe
    // buffer before exiting.
    let (stdout_buf, stdout_reader) = spawn_reader(child.stdout.take());
    let (stderr_buf, stderr_reader) = spawn_reader(child.stderr.take());

    let mut timed_out = false;
    let exit_code = loop {
        match child.try_wait()? {
            Some(status) => break status.code(),
            None => {
                if start.elapsed() >= req.timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    timed_out = true;
                    break None;
                }
                thread::sleep(WAIT_POLL);
            }
        }
    };

    if !timed_out {
        // Normal exit closed the pipes; wait for the readers to flush.
        let _ = stdout_reader.join();
        let _ = stderr_reader.join();
    }
    // On timeout the readers are left behind: an orphaned grandchild may
    // still hold the pipe open, and joining would wait out its lifetime.
    // The shared buffers hold whatever was written before the kill.

    Ok(ExecOutcome {
        exit_code,
        timed_out,
        stdout: snapshot(&stdout_buf),
        stderr: snapshot(&stderr_buf),
        duration: start.elapsed(),
    })
}

type SharedBuf = Arc<Mutex<Vec<u8>>>;

fn spawn_reader(pipe: Option<impl Read + Send + 'static>) -> (SharedBuf, thread::JoinHandle<()>) {
    let buf: SharedBuf = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&buf);
    let handle = thread::spawn(move || {
        let Some(mut pipe) = pipe else { return };
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if let Ok(mut sink) = sink.lock() {
                        sink.extend_from_slice(&chunk[..n]);
                    }
                }
            }
        }
    });
    (buf, handle)
}

fn snapshot(buf: &SharedBuf) -> String {
    let bytes = buf.lock().map(|b| b.clone()).unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Substitute `{file}` elements, or append the file when no placeholder is
/// present.
pub fn expand_argv(runner: &[String], file: &Path) -> Vec<String> {
    let file = file.display().to_string();
    if runner.iter().any(|arg| arg == FILE_PLACEHOLDER) {
        runner
            .iter()
            .map(|arg| {
                if arg == FILE_PLACEHOLDER {
                    file.clone()
                } else {
                    arg.clone()
                }
            })
            .collect()
    } else {
        let mut argv: Vec<String> = runner.to_vec();
        argv.push(file);
        argv
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
