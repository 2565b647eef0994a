//! Output Formatting
//!
//! Human-readable output for test and benchmark runs.
//!
//! Generates terminal-friendly output with:
//! - One status line per case (✓/✗) as verdicts arrive
//! - Failure details with snipped expected/actual text and a re-run hint
//! - Baseline-relative benchmark tables (milliseconds, `×ratio`)

use crate::build::BuildMode;
use trialbench_core::TestVerdict;
use trialbench_report::{BenchReport, EnvironmentEntry, SNIP_LIMIT, TestReport, snip};
use trialbench_stats::BenchmarkComparison;

/// Heading printed before a run
pub fn format_run_header(title: &str, mode: Option<BuildMode>) -> String {
    let mut output = String::new();
    output.push('\n');
    match mode {
        Some(mode) => output.push_str(&format!("{} ({} mode)\n", title, mode)),
        None => output.push_str(&format!("{}\n", title)),
    }
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output
}

/// Heading printed before the cases of a group
pub fn format_group_header(group: &str, cases: usize) -> String {
    let mut output = String::new();
    output.push_str(&format!("\nGroup: {} ({} cases)\n", group, cases));
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output
}

/// Status line of one verdict
pub fn format_verdict_line(verdict: &TestVerdict) -> String {
    match verdict.failure() {
        None => format!("  ✓ {} ... ok\n", verdict.label()),
        Some(failure) => format!("  ✗ {} ... ng ({})\n", verdict.label(), failure.cause),
    }
}

/// Details of every failed verdict of a group.
///
/// Expected and actual text are cut to [`SNIP_LIMIT`] characters. Each entry
/// ends with the command that re-runs just that case.
pub fn format_failures(mode: BuildMode, group: &str, verdicts: &[TestVerdict]) -> String {
    let failed: Vec<&TestVerdict> = verdicts.iter().filter(|v| !v.passed()).collect();
    if failed.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    output.push_str("\nFailed test cases:\n");
    for verdict in failed {
        let Some(failure) = verdict.failure() else {
            continue;
        };
        output.push('\n');
        output.push_str(&format!("[{}] {}\n", verdict.label(), failure.cause));
        output.push_str("Expected:\n");
        output.push_str(&snip(&failure.expected, SNIP_LIMIT));
        output.push('\n');
        output.push_str("Got:\n");
        output.push_str(&snip(&failure.actual, SNIP_LIMIT));
        output.push('\n');
        output.push_str(&format!(
            "For more detail: trialbench test {} {}\n",
            mode,
            rerun_target(group, verdict)
        ));
    }
    output
}

/// Target argument that selects a single case
fn rerun_target(group: &str, verdict: &TestVerdict) -> String {
    match &verdict.name {
        Some(name) => format!("{}/{}", group, name),
        None => group.to_string(),
    }
}

/// Result of a single-case run: `Passed`, or `Failed` plus what was printed
pub fn format_single_case(verdict: &TestVerdict) -> String {
    match verdict.failure() {
        None => "Passed\n".to_string(),
        Some(failure) => {
            let mut output = format!("Failed ({})\n", failure.cause);
            output.push_str("Output:\n");
            output.push_str(&failure.actual);
            if !failure.actual.ends_with('\n') {
                output.push('\n');
            }
            output
        }
    }
}

/// Totals of a test run
pub fn format_test_summary(report: &TestReport) -> String {
    let mut output = String::new();
    output.push_str("\nSummary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Groups: {}  Total: {}  Passed: {}  Failed: {}\n",
        report.groups.len(),
        report.summary.total,
        report.summary.passed,
        report.summary.failed
    ));
    output.push_str(&format!("  Duration: {:.2} ms\n", report.summary.duration_ms));
    output
}

/// Environment probe results, one `name: output` line each
pub fn format_environment(entries: &[EnvironmentEntry]) -> String {
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!(
            "{:<width$} : {}\n",
            entry.name,
            entry.output,
            width = width
        ));
    }
    output
}

/// One benchmark: baseline in milliseconds, every other command as a ratio
pub fn format_comparison(cmp: &BenchmarkComparison) -> String {
    let base = &cmp.baseline;
    let mut output = String::new();

    output.push_str(&format!("\n{}\n", cmp.name));
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(" {} (baseline)\n", base.name));
    output.push_str(&format!("   mean:   {:.8}ms\n", base.stats.mean * 1000.0));
    output.push_str(&format!("   median: {:.8}ms\n", base.stats.median * 1000.0));

    for compared in &cmp.compare {
        let stats = &compared.sample.stats;
        output.push_str(&format!(" {}\n", compared.sample.name));
        output.push_str(&format!(
            "   mean:   ×{:.8} ({:.8}ms)\n",
            compared.ratios.mean,
            stats.mean * 1000.0
        ));
        output.push_str(&format!(
            "   median: ×{:.8} ({:.8}ms)\n",
            compared.ratios.median,
            stats.median * 1000.0
        ));
    }
    output
}

/// Format a benchmark report for human-readable terminal display
pub fn format_bench_output(report: &BenchReport) -> String {
    let mut output = String::new();

    for cmp in &report.benchmarks {
        output.push_str(&format_comparison(cmp));
    }

    if !report.failures.is_empty() {
        output.push_str("\nFailed benchmarks\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for failure in &report.failures {
            output.push_str(&format!("  ✗ {}: {}\n", failure.name, failure.message));
        }
    }

    output.push_str("\nSummary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Total: {}  Succeeded: {}  Failed: {}\n",
        report.summary.total, report.summary.succeeded, report.summary.failed
    ));
    output.push_str(&format!("  Duration: {:.2} ms\n", report.summary.duration_ms));
    output
}
