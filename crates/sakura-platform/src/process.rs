//! External process execution.
//!
//! Commands are described by a [`CommandSpec`] and run by a
//! [`ProcessSpawner`]. The native spawner uses [`tokio::process`], captures
//! both output streams, and kills the child when the timeout expires.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or -1 when the process was killed by a signal.
    pub exit_code: i32,
    /// Standard output (lossy UTF-8).
    pub stdout: String,
    /// Standard error (lossy UTF-8).
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Errors from running a process.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The executable could not be found.
    #[error("command not found: {program}")]
    NotFound { program: String },

    /// The process did not finish in time and was killed.
    #[error("process '{program}' timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },

    /// Spawning or waiting failed for another reason.
    #[error("process io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A command line to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Run `program` directly (no shell).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout: None,
        }
    }

    /// Run `command` through the platform shell (`sh -c` or `cmd /C`).
    pub fn shell(command: impl Into<String>) -> Self {
        let command = command.into();
        if cfg!(windows) {
            Self::new("cmd").arg("/C").arg(command)
        } else {
            Self::new("sh").arg("-c").arg(command)
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Runs external commands and captures their output.
#[async_trait]
pub trait ProcessSpawner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput, ProcessError>;
}

/// Native spawner using [`tokio::process`].
pub struct NativeProcessSpawner;

#[async_trait]
impl ProcessSpawner for NativeProcessSpawner {
    async fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput, ProcessError> {
        debug!(program = %spec.program, args = ?spec.args, "spawning process");

        let mut cmd = tokio::process::Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);
        if let Some(ref dir) = spec.cwd {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProcessError::NotFound {
                    program: spec.program.clone(),
                }
            } else {
                ProcessError::Io(e)
            }
        })?;

        let output = match spec.timeout {
            // Dropping the future drops the child, and kill_on_drop reaps it.
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| ProcessError::TimedOut {
                    program: spec.program.clone(),
                    secs: limit.as_secs(),
                })??,
            None => child.wait_with_output().await?,
        };

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
