//! Builtin Sampler
//!
//! A dependency-free stand-in for hyperfine: each command is run through the
//! shell `warmup` times untimed, then `runs` times under a wall clock. Child
//! stdio is discarded. A nonzero exit aborts the measurement, as hyperfine does.
//! Manifests guarantee `runs >= 1`; the count is used as given.

use crate::summary::compute_summary;
use crate::tool::{MeasureRequest, NamedCommand, StatisticsTool, ToolError};
use crate::Measurement;
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::debug;

/// `StatisticsTool` that times commands itself
#[derive(Debug, Clone)]
pub struct BuiltinSampler {
    shell: String,
}

impl Default for BuiltinSampler {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }
}

impl BuiltinSampler {
    /// Run commands through `shell -c` instead of `sh -c`
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Run `command` once, returning its wall-clock time in seconds
    fn run_once(&self, command: &NamedCommand) -> Result<f64, ToolError> {
        let start = Instant::now();
        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(&command.command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| ToolError::Spawn {
                program: self.shell.clone(),
                source: e,
            })?;
        let elapsed = start.elapsed().as_secs_f64();

        if !status.success() {
            return Err(ToolError::CommandFailed {
                name: command.name.clone(),
                code: status.code(),
            });
        }
        Ok(elapsed)
    }

    fn sample(&self, command: &NamedCommand, warmup: u64, runs: u64) -> Result<Measurement, ToolError> {
        for _ in 0..warmup {
            self.run_once(command)?;
        }

        let times = (0..runs)
            .map(|_| self.run_once(command))
            .collect::<Result<Vec<f64>, ToolError>>()?;
        let summary = compute_summary(&times);

        debug!(
            name = %command.name,
            runs = times.len(),
            mean = summary.mean,
            "sampled command"
        );

        Ok(Measurement {
            command: command.name.clone(),
            mean: summary.mean,
            stddev: summary.std_dev,
            median: summary.median,
            user: None,
            system: None,
            min: summary.min,
            max: summary.max,
            times,
        })
    }
}

impl StatisticsTool for BuiltinSampler {
    fn measure(&self, request: &MeasureRequest) -> Result<Vec<Measurement>, ToolError> {
        request
            .commands
            .iter()
            .map(|command| self.sample(command, request.warmup, request.runs))
            .collect()
    }
}
