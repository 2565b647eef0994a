//! Trial Executor
//!
//! Drives the target for correctness runs and the statistics tool for
//! benchmark runs, then renders what came back.
//!
//! ## Pipeline Overview
//!
//! ```text
//! TestGroup (fixtures)              BenchmarkDefinition (manifest)
//!       │                                   │
//!       ▼                                   ▼
//! ┌─────────────┐                   ┌──────────────┐
//! │  checking   │ one trial/verdict │ benchmarking │ statistics tool, ratios
//! └──────┬──────┘                   └──────┬───────┘
//!        │                                 │
//!        └──────────────┬──────────────────┘
//!                       ▼
//!                ┌─────────────┐
//!                │  metadata   │  git, OS, environment probes
//!                └──────┬──────┘
//!                       ▼
//!                ┌─────────────┐
//!                │ formatting  │  Human-readable output
//!                └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`checking`] - Sequential correctness checking, lazy verdicts
//! - [`benchmarking`] - Baseline-relative benchmark evaluation
//! - [`metadata`] - Report metadata and environment probes
//! - [`formatting`] - Human-readable output formatting

mod benchmarking;
mod checking;
mod formatting;
mod metadata;

pub use benchmarking::{BenchError, Orchestrator};
pub use checking::{Checker, Verdicts, judge};
pub use formatting::{
    format_bench_output, format_comparison, format_environment, format_failures,
    format_group_header, format_run_header, format_single_case, format_test_summary,
    format_verdict_line,
};
pub use metadata::{UNAVAILABLE, build_report_meta, dump_environment};
