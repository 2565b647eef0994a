#![warn(missing_docs)]
//! TrialBench Statistics
//!
//! Everything between "run these commands N times" and "command B is 2.3×
//! slower than the baseline":
//! - `StatisticsTool` - the timing collaborator (hyperfine, or the builtin sampler)
//! - `Measurement` / `BenchSample` - per-command timing statistics in seconds
//! - `RelativeRatios` / `BenchmarkComparison` - baseline-relative results
//! - Summary statistics over raw run times

mod comparison;
mod hyperfine;
mod sampler;
mod summary;
mod tool;

pub use comparison::{BenchmarkComparison, ComparedSample, RelativeRatios};
pub use hyperfine::Hyperfine;
pub use sampler::BuiltinSampler;
pub use summary::{Summary, compute_percentile, compute_summary};
pub use tool::{MeasureRequest, NamedCommand, StatisticsTool, ToolError};

use serde::{Deserialize, Serialize};

/// Timing statistics of one command, as reported by a statistics tool.
///
/// All values are in seconds. Field names follow hyperfine's JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Command (or command name) the tool reports
    pub command: String,
    /// Mean run time
    pub mean: f64,
    /// Standard deviation; unavailable for a single run
    #[serde(default)]
    pub stddev: Option<f64>,
    /// Median run time
    pub median: f64,
    /// User CPU time
    #[serde(default)]
    pub user: Option<f64>,
    /// System CPU time
    #[serde(default)]
    pub system: Option<f64>,
    /// Fastest run
    pub min: f64,
    /// Slowest run
    pub max: f64,
    /// Raw run times
    #[serde(default)]
    pub times: Vec<f64>,
}

/// A measurement re-associated with the bench command it was submitted for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchSample {
    /// Bench command name from the manifest
    pub name: String,
    /// Timing statistics
    #[serde(flatten)]
    pub stats: Measurement,
}

impl BenchSample {
    /// Attach a command name to a measurement
    pub fn new(name: impl Into<String>, stats: Measurement) -> Self {
        Self {
            name: name.into(),
            stats,
        }
    }
}
