//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::Serialize;
use trialbench_core::TestVerdict;
use trialbench_stats::BenchmarkComparison;

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    /// Harness version
    pub version: String,
    /// When the report was produced
    pub timestamp: DateTime<Utc>,
    /// Build mode the target was built in (`debug` / `release`)
    pub mode: Option<String>,
    /// `git rev-parse HEAD` of the working directory, when available
    pub git_commit: Option<String>,
    /// Host the run happened on
    pub system: SystemInfo,
    /// Output of the environment probes, in configured order
    pub environment: Vec<EnvironmentEntry>,
}

/// System information
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    /// Operating system family
    pub os: String,
    /// CPU architecture
    pub arch: String,
}

impl SystemInfo {
    /// OS and architecture of the running harness
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}

/// One environment probe result (e.g. `OS` -> `x86_64 GNU/Linux`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentEntry {
    /// Probe label
    pub name: String,
    /// Trimmed probe output, or `unavailable`
    pub output: String,
}

/// Complete correctness report
#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    /// Run metadata
    pub meta: ReportMeta,
    /// Groups in the order they ran
    pub groups: Vec<GroupReport>,
    /// Totals
    pub summary: TestSummary,
}

/// Verdicts of one test group, in the order the cases ran
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    /// Group name
    pub name: String,
    /// One verdict per case
    pub verdicts: Vec<TestVerdict>,
}

impl GroupReport {
    /// Number of failed verdicts
    pub fn failed(&self) -> usize {
        self.verdicts.iter().filter(|v| !v.passed()).count()
    }
}

/// Correctness run totals
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestSummary {
    /// Cases run
    pub total: usize,
    /// Cases passed
    pub passed: usize,
    /// Cases failed
    pub failed: usize,
    /// Wall-clock time of the whole run
    pub duration_ms: f64,
}

impl TestSummary {
    /// Tally the verdicts of `groups`
    pub fn from_groups(groups: &[GroupReport], duration_ms: f64) -> Self {
        let total: usize = groups.iter().map(|g| g.verdicts.len()).sum();
        let failed: usize = groups.iter().map(GroupReport::failed).sum();
        Self {
            total,
            passed: total - failed,
            failed,
            duration_ms,
        }
    }
}

/// Complete benchmark report
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    /// Run metadata, including environment probes
    pub meta: ReportMeta,
    /// Successful comparisons, in submission order
    pub benchmarks: Vec<BenchmarkComparison>,
    /// Benchmarks that could not be evaluated
    pub failures: Vec<BenchFailure>,
    /// Totals
    pub summary: BenchSummary,
}

/// A benchmark that failed before producing a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchFailure {
    /// Benchmark name
    pub name: String,
    /// Error message
    pub message: String,
}

/// Benchmark run totals
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BenchSummary {
    /// Benchmarks selected
    pub total: usize,
    /// Benchmarks with a comparison
    pub succeeded: usize,
    /// Benchmarks that failed
    pub failed: usize,
    /// Wall-clock time of the whole run
    pub duration_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialbench_core::{Failure, FailureCause, Verdict};

    fn verdict(name: &str, pass: bool) -> TestVerdict {
        TestVerdict {
            name: Some(name.to_string()),
            verdict: if pass {
                Verdict::Pass
            } else {
                Verdict::Fail(Failure {
                    cause: FailureCause::Mismatch,
                    actual: "5\n".to_string(),
                    expected: "6\n".to_string(),
                })
            },
        }
    }

    #[test]
    fn test_summary_counts() {
        let groups = vec![
            GroupReport {
                name: "echo".to_string(),
                verdicts: vec![verdict("a", true), verdict("b", false)],
            },
            GroupReport {
                name: "sum".to_string(),
                verdicts: vec![verdict("c", true)],
            },
        ];
        let summary = TestSummary::from_groups(&groups, 12.0);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
    }
}
