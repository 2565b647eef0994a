//! Per-case outcomes

use serde::Serialize;

/// Outcome of one case, tagged with the case it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestVerdict {
    /// Case name (`None` for the anonymous flat case)
    pub name: Option<String>,
    /// Pass or fail
    pub verdict: Verdict,
}

impl TestVerdict {
    /// Name used in reports
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("default")
    }

    /// Whether the case passed
    pub fn passed(&self) -> bool {
        matches!(self.verdict, Verdict::Pass)
    }

    /// Failure details, if the case failed
    pub fn failure(&self) -> Option<&Failure> {
        match &self.verdict {
            Verdict::Pass => None,
            Verdict::Fail(failure) => Some(failure),
        }
    }
}

/// Pass/fail status of a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Verdict {
    /// Stdout matched the expected text exactly
    Pass,
    /// The case failed
    Fail(Failure),
}

/// What a failing case produced versus what it should have
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Why the case failed
    pub cause: FailureCause,
    /// Captured stdout
    pub actual: String,
    /// Expected stdout
    pub expected: String,
}

/// Reason a case was marked failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "code", rename_all = "kebab-case")]
pub enum FailureCause {
    /// Stdout differs from the expected text
    Mismatch,
    /// Nonzero (or signal) exit; only under the strict policy
    ExitStatus(Option<i32>),
    /// Non-empty stderr; only under the strict policy
    Stderr,
}

impl std::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureCause::Mismatch => write!(f, "output mismatch"),
            FailureCause::ExitStatus(Some(code)) => write!(f, "exit code {}", code),
            FailureCause::ExitStatus(None) => write!(f, "terminated by signal"),
            FailureCause::Stderr => write!(f, "wrote to stderr"),
        }
    }
}
