#![warn(missing_docs)]
//! TrialBench Core - Fixtures and Definitions
//!
//! This crate provides the in-memory records every other crate works from:
//! - `TestGroup` / `TestCase` discovered from fixture directories
//! - `BenchmarkDefinition` / `BenchCommand` parsed from benchmark manifests
//! - `TestVerdict` produced per case by the checker
//! - Injectable shuffling so callers never rely on discovery order

mod error;
mod fixtures;
mod manifest;
mod shuffle;
mod verdict;

pub use error::LoadError;
pub use fixtures::{FixtureLayout, FixtureLoader};
pub use manifest::{DEFAULT_MANIFEST_NAME, ManifestLoader};
pub use shuffle::{ShuffleOrder, Shuffler};
pub use verdict::{Failure, FailureCause, TestVerdict, Verdict};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A single input/expected-output pair of a test group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Case name (`None` for the anonymous case of the flat convention)
    pub name: Option<String>,
    /// Text fed to the target's stdin
    pub input: Option<String>,
    /// Bytes the target must print on stdout
    pub expected: Option<Vec<u8>>,
}

impl TestCase {
    /// Name used in reports; the anonymous case is shown as `default`
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("default")
    }

    /// Expected stdout, with an absent fixture meaning no output at all
    pub fn expected_output(&self) -> &[u8] {
        self.expected.as_deref().unwrap_or(&[])
    }
}

/// A directory of cases sharing one entry program
#[derive(Debug, Clone)]
pub struct TestGroup {
    /// Group identifier (directory name)
    pub name: String,
    /// Group root directory
    pub root: PathBuf,
    /// Program handed to the target executable for every case
    pub entry: PathBuf,
    /// Cases in the (already shuffled) order they will run
    pub cases: Vec<TestCase>,
}

impl TestGroup {
    /// Look up a named case
    pub fn case(&self, name: &str) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.name.as_deref() == Some(name))
    }
}

/// One command of a benchmark, compared against the baseline command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchCommand {
    /// Display name, unique within the definition
    pub name: String,
    /// Whether this command is the reference for ratios
    pub is_base: bool,
    /// Shell command template, e.g. `python3`
    pub command: String,
    /// Program path relative to the definition's base path
    pub path: String,
}

impl BenchCommand {
    /// Full shell command: the template followed by the resolved program path
    pub fn full_command(&self, base_path: &Path) -> String {
        format!("{} {}", self.command, base_path.join(&self.path).display())
    }
}

/// A benchmark parsed from its manifest
#[derive(Debug, Clone)]
pub struct BenchmarkDefinition {
    /// Benchmark identifier (directory name)
    pub name: String,
    /// Directory the command paths are relative to
    pub base_path: PathBuf,
    /// Warmup runs per command
    pub warmup: u64,
    /// Timed runs per command
    pub runs: u64,
    /// Commands in submission order
    pub benches: Vec<BenchCommand>,
}

/// A benchmark definition without exactly one baseline command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BaselineError {
    /// No command is marked `base = true`
    #[error("\"{benchmark}\" has no base bench")]
    Missing {
        /// Benchmark name
        benchmark: String,
    },

    /// More than one command is marked `base = true`
    #[error("\"{benchmark}\" has {} base benches: {}", .names.len(), .names.join(", "))]
    Ambiguous {
        /// Benchmark name
        benchmark: String,
        /// Names of every marked command
        names: Vec<String>,
    },
}

impl BenchmarkDefinition {
    /// Index of the single baseline command.
    pub fn baseline_index(&self) -> Result<usize, BaselineError> {
        let marked: Vec<usize> = self
            .benches
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_base)
            .map(|(i, _)| i)
            .collect();

        match marked.as_slice() {
            [index] => Ok(*index),
            [] => Err(BaselineError::Missing {
                benchmark: self.name.clone(),
            }),
            _ => Err(BaselineError::Ambiguous {
                benchmark: self.name.clone(),
                names: marked
                    .iter()
                    .map(|&i| self.benches[i].name.clone())
                    .collect(),
            }),
        }
    }

    /// `(name, full command)` pairs in submission order
    pub fn commands(&self) -> Vec<(String, String)> {
        self.benches
            .iter()
            .map(|b| (b.name.clone(), b.full_command(&self.base_path)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench(name: &str, is_base: bool) -> BenchCommand {
        BenchCommand {
            name: name.to_string(),
            is_base,
            command: "python3".to_string(),
            path: "main.py".to_string(),
        }
    }

    fn definition(benches: Vec<BenchCommand>) -> BenchmarkDefinition {
        BenchmarkDefinition {
            name: "nbody".to_string(),
            base_path: PathBuf::from("/cases/nbody"),
            warmup: 1,
            runs: 3,
            benches,
        }
    }

    #[test]
    fn test_single_baseline() {
        let def = definition(vec![bench("lua", false), bench("lico", true)]);
        assert_eq!(def.baseline_index(), Ok(1));
    }

    #[test]
    fn test_missing_baseline() {
        let def = definition(vec![bench("lua", false), bench("lico", false)]);
        assert!(matches!(
            def.baseline_index(),
            Err(BaselineError::Missing { .. })
        ));
    }

    #[test]
    fn test_two_baselines_rejected() {
        let def = definition(vec![bench("lua", true), bench("lico", true)]);
        let err = def.baseline_index().unwrap_err();
        assert_eq!(
            err,
            BaselineError::Ambiguous {
                benchmark: "nbody".to_string(),
                names: vec!["lua".to_string(), "lico".to_string()],
            }
        );
        assert_eq!(err.to_string(), "\"nbody\" has 2 base benches: lua, lico");
    }

    #[test]
    fn test_full_command_joins_path() {
        let def = definition(vec![bench("py", true)]);
        let commands = def.commands();
        assert_eq!(commands[0].0, "py");
        assert_eq!(commands[0].1, "python3 /cases/nbody/main.py");
    }

    #[test]
    fn test_absent_expected_is_empty() {
        let case = TestCase {
            name: Some("a".to_string()),
            input: Some("1\n".to_string()),
            expected: None,
        };
        assert_eq!(case.expected_output(), b"");
        assert_eq!(case.label(), "a");
    }
}
