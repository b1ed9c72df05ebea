//! Bounded execution of the external exporter
//!
//! The exporter hangs often enough that an unbounded wait is never acceptable.
//! [`TokioProcessRunner`] waits at most the given timeout, then kills and reaps
//! the child so nothing outlives the call.

use crate::domain::errors::VsweepError;
use crate::domain::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// One command line to launch
#[derive(Debug, Clone)]
pub struct ProcessInvocation {
    /// Executable to launch
    pub executable: PathBuf,

    /// Arguments, in order
    pub args: Vec<String>,

    /// Working directory, the executable's own directory when it has one
    pub working_dir: Option<PathBuf>,

    /// Indexes into `args` that must never be logged
    sensitive: Vec<usize>,
}

impl ProcessInvocation {
    /// Creates an invocation running from the executable's directory
    ///
    /// A relative path with a directory component is resolved against the
    /// current directory first, since the child starts in a different one.
    /// A bare program name is left for `PATH` lookup.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        let executable = absolute_executable(executable.into());
        let working_dir = executable
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Self {
            executable,
            args: Vec::new(),
            working_dir,
            sensitive: Vec::new(),
        }
    }

    /// Appends an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends an argument that is redacted in [`ProcessInvocation::display`]
    pub fn sensitive_arg(mut self, arg: impl Into<String>) -> Self {
        self.sensitive.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    /// Command line safe for logs
    pub fn display(&self) -> String {
        let mut rendered = vec![self.executable.display().to_string()];
        for (index, arg) in self.args.iter().enumerate() {
            if self.sensitive.contains(&index) {
                rendered.push("****".to_string());
            } else if arg.contains(' ') {
                rendered.push(format!("\"{arg}\""));
            } else {
                rendered.push(arg.clone());
            }
        }
        rendered.join(" ")
    }
}

fn absolute_executable(executable: PathBuf) -> PathBuf {
    let has_dir = executable
        .parent()
        .is_some_and(|p| !p.as_os_str().is_empty());
    if !has_dir || executable.is_absolute() {
        return executable;
    }
    std::path::absolute(&executable).unwrap_or(executable)
}

/// How a launched process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code, `None` if killed or terminated by a signal
    pub exit_code: Option<i32>,

    /// True if the process was killed for exceeding the timeout
    pub timed_out: bool,

    /// Time from spawn to exit (or kill)
    pub elapsed: Duration,
}

impl ProcessExit {
    /// A normal exit with the given code
    pub fn exited(code: i32, elapsed: Duration) -> Self {
        Self {
            exit_code: Some(code),
            timed_out: false,
            elapsed,
        }
    }

    /// A timeout kill
    pub fn timed_out(elapsed: Duration) -> Self {
        Self {
            exit_code: None,
            timed_out: true,
            elapsed,
        }
    }
}

/// Launches external processes with a hard timeout
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the invocation to completion or until `timeout` elapses
    ///
    /// # Errors
    ///
    /// Returns [`VsweepError::Process`] only when the process cannot be
    /// launched or supervised. Non-zero exits and timeouts are `Ok`.
    async fn run(&self, invocation: &ProcessInvocation, timeout: Duration) -> Result<ProcessExit>;
}

/// Production runner built on `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    /// Create a new runner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, invocation: &ProcessInvocation, timeout: Duration) -> Result<ProcessExit> {
        let mut command = Command::new(&invocation.executable);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }

        tracing::debug!(
            command = %invocation.display(),
            timeout_secs = timeout.as_secs(),
            "Launching exporter"
        );

        let started = Instant::now();
        let mut child = command.spawn().map_err(|e| {
            VsweepError::Process(format!(
                "failed to launch {}: {e}",
                invocation.executable.display()
            ))
        })?;
        let pid = child.id();

        let waited = tokio::time::timeout(timeout, child.wait()).await;
        match waited {
            Ok(Ok(status)) => {
                let elapsed = started.elapsed();
                tracing::debug!(
                    pid = ?pid,
                    exit_code = ?status.code(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Exporter exited"
                );
                Ok(ProcessExit {
                    exit_code: status.code(),
                    timed_out: false,
                    elapsed,
                })
            }
            Ok(Err(e)) => {
                // Could not observe the child; make sure it is gone before returning
                if let Err(kill_err) = child.kill().await {
                    tracing::warn!(pid = ?pid, error = %kill_err, "Failed to kill exporter");
                }
                Err(VsweepError::Process(format!(
                    "failed to wait for {}: {e}",
                    invocation.executable.display()
                )))
            }
            Err(_) => {
                tracing::warn!(
                    pid = ?pid,
                    timeout_secs = timeout.as_secs(),
                    "Exporter exceeded timeout, killing"
                );
                // kill() also reaps the child, so no zombie is left behind
                if let Err(e) = child.kill().await {
                    tracing::warn!(pid = ?pid, error = %e, "Failed to kill exporter");
                }
                Ok(ProcessExit::timed_out(started.elapsed()))
            }
        }
    }
}
