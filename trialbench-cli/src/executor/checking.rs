//! Correctness Checking
//!
//! Runs the cases of a group one at a time against the group's entry program
//! and judges each by exact stdout equality. Verdicts are produced lazily:
//! [`Verdicts`] spawns one trial per `next()`, so a case always finishes
//! before the next one starts and nothing is buffered.

use crate::trial::{FailurePolicy, TrialError, TrialOutput, TrialRunner, report_warnings};
use std::ffi::OsString;
use trialbench_core::{Failure, FailureCause, TestCase, TestGroup, TestVerdict, Verdict};

/// Judges test cases by running them through a [`TrialRunner`]
#[derive(Debug, Clone)]
pub struct Checker<'a> {
    runner: &'a TrialRunner,
    args: &'a [String],
    policy: FailurePolicy,
}

impl<'a> Checker<'a> {
    /// Checker invoking `<executable> <args...> <entry>` for every case
    pub fn new(runner: &'a TrialRunner, args: &'a [String], policy: FailurePolicy) -> Self {
        Self {
            runner,
            args,
            policy,
        }
    }

    /// Lazily check every case of `group`, in the group's order.
    ///
    /// Each call starts from the first case again.
    pub fn check<'g>(&'g self, group: &'g TestGroup) -> Verdicts<'g> {
        Verdicts {
            checker: self,
            group,
            cases: group.cases.iter(),
        }
    }

    /// Run one case and judge it
    pub fn check_case(&self, group: &TestGroup, case: &TestCase) -> Result<TestVerdict, TrialError> {
        let mut args: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        args.push(group.entry.clone().into_os_string());

        let output = self.runner.run(&args, case.input.as_deref())?;
        report_warnings(&group.entry, &output);
        Ok(judge(case, &output, self.policy))
    }
}

/// Verdicts of one group, one trial per item
pub struct Verdicts<'a> {
    checker: &'a Checker<'a>,
    group: &'a TestGroup,
    cases: std::slice::Iter<'a, TestCase>,
}

impl Iterator for Verdicts<'_> {
    type Item = Result<TestVerdict, TrialError>;

    fn next(&mut self) -> Option<Self::Item> {
        let case = self.cases.next()?;
        Some(self.checker.check_case(self.group, case))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cases.size_hint()
    }
}

impl ExactSizeIterator for Verdicts<'_> {}

impl std::iter::FusedIterator for Verdicts<'_> {}

/// Verdict for `case` given what its trial produced.
///
/// Stdout is compared byte for byte, before any decoding; a missing
/// expectation means empty output. `Failure` carries lossily decoded text.
/// Under [`FailurePolicy::Strict`] a matching stdout can still fail on exit
/// status or stderr.
pub fn judge(case: &TestCase, output: &TrialOutput, policy: FailurePolicy) -> TestVerdict {
    let expected = case.expected_output();

    let cause = if output.stdout.as_slice() != expected {
        Some(FailureCause::Mismatch)
    } else if policy == FailurePolicy::Strict && !output.success() {
        Some(FailureCause::ExitStatus(output.exit_code))
    } else if policy == FailurePolicy::Strict && !output.stderr.is_empty() {
        Some(FailureCause::Stderr)
    } else {
        None
    };

    let verdict = match cause {
        None => Verdict::Pass,
        Some(cause) => Verdict::Fail(Failure {
            cause,
            actual: output.stdout_lossy(),
            expected: String::from_utf8_lossy(expected).into_owned(),
        }),
    };

    TestVerdict {
        name: case.name.clone(),
        verdict,
    }
}
