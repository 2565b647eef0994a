//! JSON Output

use crate::report::{BenchReport, TestReport};
use serde::Serialize;

/// Schema information
#[derive(Debug, Clone, Serialize)]
pub struct ReportSchema {
    /// Schema identifier
    pub schema: &'static str,
    /// Schema version
    pub version: u32,
}

#[derive(Serialize)]
struct Document<'a, T> {
    #[serde(rename = "$schema")]
    schema: ReportSchema,
    #[serde(flatten)]
    report: &'a T,
}

fn render<T: Serialize>(schema: &'static str, report: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Document {
        schema: ReportSchema { schema, version: 1 },
        report,
    })
}

/// Generate a prettified JSON correctness report.
pub fn generate_test_json(report: &TestReport) -> Result<String, serde_json::Error> {
    render("trialbench/test-report", report)
}

/// Generate a prettified JSON benchmark report.
pub fn generate_bench_json(report: &BenchReport) -> Result<String, serde_json::Error> {
    render("trialbench/bench-report", report)
}
