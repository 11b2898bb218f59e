//! External command execution with timeouts
//!
//! Everything the harness learns about the machine comes from running other
//! programs (`ollama`, `nvidia-smi`, `system_profiler`, ...). The
//! [`CommandRunner`] trait is the seam that lets tests feed canned output.

use crate::error::{BenchError, Result};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Successful output with the given stdout, for tests and fakes.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Convert a non-zero exit into [`BenchError::CommandFailed`].
    pub fn into_success(self, program: &str) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(BenchError::CommandFailed {
                program: program.to_string(),
                status: self
                    .code
                    .map_or_else(|| "killed".to_string(), |c| format!("exit code {c}")),
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Runs a program to completion and captures its output.
pub trait CommandRunner {
    /// `timeout: None` waits indefinitely.
    fn run(&self, program: &str, args: &[&str], timeout: Option<Duration>)
        -> Result<CommandOutput>;
}

/// Spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<CommandOutput> {
        tracing::debug!("Running {program} {}", args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => BenchError::CommandNotFound(program.to_string()),
                _ => BenchError::Io(e),
            })?;

        // Drain both pipes on their own threads so a chatty child cannot
        // block on a full pipe while we poll for exit.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let start = Instant::now();
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None => {
                    if let Some(limit) = timeout {
                        if start.elapsed() > limit {
                            tracing::warn!("{program} timed out after {limit:?}, killing");
                            let _ = child.kill();
                            let _ = child.wait();
                            return Err(BenchError::Timeout {
                                program: program.to_string(),
                                after: limit,
                            });
                        }
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
            }
        };

        Ok(CommandOutput {
            code: status.code(),
            stdout: collect(stdout),
            stderr: collect(stderr),
        })
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
