//! Statistics Tool Contract
//!
//! A statistics tool runs a list of named shell commands with a warmup count
//! and a run count, and returns one `Measurement` per command in submission
//! order. It does its own repetition; callers never parallelise commands of one
//! request.

use crate::Measurement;
use std::path::PathBuf;
use thiserror::Error;

/// A shell command with the display name it is reported under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCommand {
    /// Display name
    pub name: String,
    /// Full shell command line
    pub command: String,
}

/// One invocation of a statistics tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureRequest {
    /// Untimed runs per command
    pub warmup: u64,
    /// Timed runs per command
    pub runs: u64,
    /// Commands to measure, in order
    pub commands: Vec<NamedCommand>,
}

/// Errors raised by a statistics tool
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool (or the sampler's shell) could not be started
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The tool itself exited unsuccessfully
    #[error("{program} exited with {}: {stderr}", .code.map(|c| c.to_string()).unwrap_or_else(|| "a signal".to_string()))]
    Failed {
        /// Tool program
        program: String,
        /// Exit code; `None` when killed by a signal
        code: Option<i32>,
        /// Trimmed stderr of the tool
        stderr: String,
    },

    /// The tool returned a different number of results than commands submitted
    #[error("Expected {expected} results, the tool returned {actual}")]
    SampleCount {
        /// Commands submitted
        expected: usize,
        /// Results returned
        actual: usize,
    },

    /// A measured command exited unsuccessfully
    #[error("Command \"{name}\" exited with {}", .code.map(|c| c.to_string()).unwrap_or_else(|| "a signal".to_string()))]
    CommandFailed {
        /// Display name of the command
        name: String,
        /// Exit code; `None` when killed by a signal
        code: Option<i32>,
    },

    /// Export directory or file could not be accessed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The export file is not valid statistics JSON
    #[error("Invalid statistics export {}: {source}", .path.display())]
    Parse {
        /// Export file
        path: PathBuf,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// The timing collaborator used by the benchmark orchestrator
pub trait StatisticsTool: Send + Sync {
    /// Measure every command of `request`, returning one result per command in order
    fn measure(&self, request: &MeasureRequest) -> Result<Vec<Measurement>, ToolError>;
}
