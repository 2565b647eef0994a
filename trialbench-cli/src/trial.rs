//! Process Trial Runner
//!
//! Spawns the target executable once per trial, feeds it the case input and
//! collects everything it printed. Nothing is streamed: stdout and stderr are
//! read to completion after stdin has been written and closed.
//!
//! A nonzero exit or any stderr output is reported on the warning channel
//! (`tracing::warn!`). Whether it also fails the case is the checker's
//! decision, governed by [`FailurePolicy`].

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::warn;

/// A trial that could not be carried out (as opposed to one that failed)
#[derive(Debug, Error)]
pub enum TrialError {
    /// The executable could not be started
    #[error("Failed to spawn {}: {source}", .program.display())]
    Spawn {
        /// Target executable
        program: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing the case input failed (a closed pipe is not an error)
    #[error("Failed to write stdin of {}: {source}", .program.display())]
    Stdin {
        /// Target executable
        program: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Collecting the child's output failed
    #[error("Failed to wait for {}: {source}", .program.display())]
    Wait {
        /// Target executable
        program: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// How a trial's exit status and stderr affect its verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Only stdout is compared; exit status and stderr are warnings (default)
    #[default]
    StdoutOnly,
    /// A nonzero exit or non-empty stderr also fails the case
    Strict,
}

/// Everything one trial produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialOutput {
    /// Raw stdout bytes, compared verbatim against the expected output
    pub stdout: Vec<u8>,
    /// Stderr, decoded lossily; only ever shown
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl TrialOutput {
    /// Whether the process exited with status 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout decoded for display, invalid UTF-8 replaced
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Runs the shared target executable
#[derive(Debug, Clone)]
pub struct TrialRunner {
    executable: PathBuf,
}

impl TrialRunner {
    /// Create a runner for `executable`
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// The executable every trial spawns
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Run one trial: spawn, write `stdin` (if any), close it, wait and capture.
    pub fn run<S: AsRef<std::ffi::OsStr>>(
        &self,
        args: &[S],
        stdin: Option<&str>,
    ) -> Result<TrialOutput, TrialError> {
        let mut child = Command::new(&self.executable)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TrialError::Spawn {
                program: self.executable.clone(),
                source: e,
            })?;

        // Written on a separate thread so a child that fills its stdout pipe
        // before draining stdin cannot deadlock us.
        let writer = match (stdin, child.stdin.take()) {
            (Some(input), Some(mut pipe)) => {
                let input = input.to_owned();
                Some(std::thread::spawn(move || pipe.write_all(input.as_bytes())))
            }
            _ => None,
        };

        let output = child.wait_with_output().map_err(|e| TrialError::Wait {
            program: self.executable.clone(),
            source: e,
        })?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // The child may exit without reading its input
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => {
                    return Err(TrialError::Stdin {
                        program: self.executable.clone(),
                        source: e,
                    });
                }
                Err(_) => {
                    return Err(TrialError::Stdin {
                        program: self.executable.clone(),
                        source: std::io::Error::other("stdin writer panicked"),
                    });
                }
            }
        }

        Ok(TrialOutput {
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}

/// Emit the process warning for a trial of `source`, if there is one
pub fn report_warnings(source: &Path, output: &TrialOutput) {
    if !output.success() {
        warn!(
            source = %source.display(),
            exit_code = ?output.exit_code,
            "exit code is expected 0"
        );
    }
    if !output.stderr.is_empty() {
        warn!(
            source = %source.display(),
            stderr = %output.stderr.trim_end(),
            "target wrote to stderr"
        );
    }
}
