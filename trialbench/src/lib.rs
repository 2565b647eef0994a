#![warn(missing_docs)]
//! # TrialBench
//!
//! Correctness and benchmark harness for an externally built executable,
//! typically a language runtime.
//!
//! - **Fixture groups**: each group directory holds one entry program and
//!   input/expected-output pairs, either flat (`input.txt`/`output.txt`) or
//!   indexed (`input/<case>.txt`, `output/<case>.txt`)
//! - **Trials**: one child process per case, stdout compared byte for byte
//! - **Benchmarks**: a manifest per benchmark lists shell commands, one of them
//!   the baseline; timing is delegated to hyperfine (or a builtin sampler) and
//!   every other command is reported as a ratio of the baseline
//!
//! ## Library use
//!
//! ```ignore
//! use trialbench::{Checker, FailurePolicy, FixtureLayout, FixtureLoader, ShuffleOrder, TrialRunner};
//!
//! let loader = FixtureLoader::new("tests", FixtureLayout::default(), ShuffleOrder::Random);
//! let group = loader.load("echo")?;
//! let runner = TrialRunner::new("target/release/lico");
//! let args = vec!["run".to_string()];
//! let checker = Checker::new(&runner, &args, FailurePolicy::StdoutOnly);
//! for verdict in checker.check(&group) {
//!     println!("{:?}", verdict?);
//! }
//! ```

// Re-export core types
pub use trialbench_core::{
    BaselineError, BenchCommand, BenchmarkDefinition, DEFAULT_MANIFEST_NAME, Failure,
    FailureCause, FixtureLayout, FixtureLoader, LoadError, ManifestLoader, ShuffleOrder, Shuffler,
    TestCase, TestGroup, TestVerdict, Verdict,
};

// Re-export stats
pub use trialbench_stats::{
    BenchSample, BenchmarkComparison, BuiltinSampler, ComparedSample, Hyperfine, MeasureRequest,
    Measurement, NamedCommand, RelativeRatios, StatisticsTool, ToolError, compute_summary,
};

// Re-export reporting
pub use trialbench_report::{BenchReport, OutputFormat, TestReport, generate_bench_json, generate_test_json};

// Re-export the runner side
pub use trialbench_cli::{
    BenchError, BuildCoordinator, BuildError, BuildMode, Checker, FailurePolicy, Orchestrator,
    TrialConfig, TrialError, TrialOutput, TrialRunner, Verdicts, judge,
};

/// Run the TrialBench CLI harness, returning the process exit code.
pub use trialbench_cli::run;
