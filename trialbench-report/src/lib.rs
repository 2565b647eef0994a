#![warn(missing_docs)]
//! TrialBench Report - Output Formats
//!
//! Serializable records of a finished run:
//! - `TestReport` for correctness runs (verdicts per group)
//! - `BenchReport` for benchmark runs (baseline-relative comparisons)
//!
//! Terminal rendering lives with the CLI; this crate only owns the data and
//! its JSON form.

mod json;
mod report;
mod snip;

pub use json::{ReportSchema, generate_bench_json, generate_test_json};
pub use report::{
    BenchFailure, BenchReport, BenchSummary, EnvironmentEntry, GroupReport, ReportMeta,
    SystemInfo, TestReport, TestSummary,
};
pub use snip::{SNIP_LIMIT, snip};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// JSON with full schema
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
