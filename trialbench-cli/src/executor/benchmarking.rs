//! Benchmark Orchestration
//!
//! Turns a `BenchmarkDefinition` into a `BenchmarkComparison`:
//!
//! ```text
//! definition ──► baseline check ──► full commands ──► statistics tool
//!                                                         │
//!   comparison ◄── sort + ratios ◄── partition ◄── zip by position
//! ```
//!
//! The statistics tool answers in submission order, so samples are matched to
//! commands by index. The baseline is located from the definition, never from
//! the tool's output. Independent definitions run on a rayon pool.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};
use trialbench_core::{BaselineError, BenchmarkDefinition};
use trialbench_stats::{
    BenchSample, BenchmarkComparison, MeasureRequest, NamedCommand, StatisticsTool, ToolError,
};

/// Why a benchmark produced no comparison
#[derive(Debug, Error)]
pub enum BenchError {
    /// The definition has no baseline, or more than one
    #[error(transparent)]
    NoBaseline(#[from] BaselineError),

    /// The statistics tool failed or answered inconsistently
    #[error("\"{benchmark}\": {source}")]
    Tool {
        /// Benchmark name
        benchmark: String,
        /// Tool error
        #[source]
        source: ToolError,
    },

    /// The rayon pool could not be created
    #[error("Failed to build benchmark pool: {0}")]
    Pool(String),
}

/// Evaluates benchmark definitions with a statistics tool
pub struct Orchestrator<T> {
    tool: T,
}

impl<T: StatisticsTool> Orchestrator<T> {
    /// Orchestrator delegating timing to `tool`
    pub fn new(tool: T) -> Self {
        Self { tool }
    }

    /// The statistics tool in use
    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Evaluate one benchmark.
    ///
    /// Fails with [`BenchError::NoBaseline`] before the tool is invoked when the
    /// definition has no baseline or more than one.
    pub fn evaluate(&self, def: &BenchmarkDefinition) -> Result<BenchmarkComparison, BenchError> {
        let base_index = def.baseline_index()?;

        let request = MeasureRequest {
            warmup: def.warmup,
            runs: def.runs,
            commands: def
                .commands()
                .into_iter()
                .map(|(name, command)| NamedCommand { name, command })
                .collect(),
        };

        debug!(
            benchmark = %def.name,
            commands = request.commands.len(),
            warmup = def.warmup,
            runs = def.runs,
            "measuring"
        );

        let tool_error = |source: ToolError| BenchError::Tool {
            benchmark: def.name.clone(),
            source,
        };
        let measurements = self.tool.measure(&request).map_err(tool_error)?;
        if measurements.len() != def.benches.len() {
            return Err(tool_error(ToolError::SampleCount {
                expected: def.benches.len(),
                actual: measurements.len(),
            }));
        }

        let mut baseline = None;
        let mut others = Vec::with_capacity(def.benches.len().saturating_sub(1));
        for (index, (bench, stats)) in def.benches.iter().zip(measurements).enumerate() {
            let sample = BenchSample::new(bench.name.clone(), stats);
            if index == base_index {
                baseline = Some(sample);
            } else {
                others.push(sample);
            }
        }

        // base_index < benches.len() == measurements.len()
        let baseline = baseline.ok_or_else(|| BaselineError::Missing {
            benchmark: def.name.clone(),
        })?;

        Ok(BenchmarkComparison::new(def.name.clone(), baseline, others))
    }

    /// Evaluate every definition, `jobs` at a time.
    ///
    /// One failing benchmark does not stop the others; outcomes are returned in
    /// the order of `defs`.
    pub fn run_all(
        &self,
        defs: &[BenchmarkDefinition],
        jobs: usize,
    ) -> Result<Vec<Result<BenchmarkComparison, BenchError>>, BenchError> {
        if defs.is_empty() {
            return Ok(Vec::new());
        }

        let pb = ProgressBar::new(defs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let evaluate = |def: &BenchmarkDefinition| {
            pb.set_message(def.name.clone());
            let outcome = self.evaluate(def);
            if let Err(e) = &outcome {
                warn!(benchmark = %def.name, error = %e, "benchmark failed");
            }
            pb.inc(1);
            outcome
        };

        let worker_count = jobs.clamp(1, defs.len());
        let outcomes: Vec<Result<BenchmarkComparison, BenchError>> = if worker_count == 1 {
            defs.iter().map(evaluate).collect()
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(worker_count)
                .build()
                .map_err(|e| BenchError::Pool(e.to_string()))?;
            pool.install(|| defs.par_iter().map(evaluate).collect())
        };

        pb.finish_and_clear();
        Ok(outcomes)
    }
}
