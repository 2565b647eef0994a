//! Configuration loading from trialbench.toml
//!
//! TrialBench configuration can be specified in a `trialbench.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.
//! Relative paths in the file are resolved against the directory that contains it.

use crate::trial::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up by [`TrialConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "trialbench.toml";

/// TrialBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrialConfig {
    /// How the target executable is built
    #[serde(default)]
    pub build: BuildConfig,
    /// Correctness test configuration
    #[serde(default)]
    pub tests: TestsConfig,
    /// Benchmark configuration
    #[serde(default)]
    pub bench: BenchConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Directory relative paths are resolved against; not part of the file
    #[serde(skip)]
    pub root: PathBuf,
}

/// Build step configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Build tool invoked as `<command> build [--release] --manifest-path <manifest_path>`
    #[serde(default = "default_build_command")]
    pub command: String,
    /// Manifest of the target executable
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
    /// Name of the produced executable
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Directory holding `debug/` and `release/` artifacts
    #[serde(default = "default_target_dir")]
    pub target_dir: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: default_build_command(),
            manifest_path: default_manifest_path(),
            binary: default_binary(),
            target_dir: default_target_dir(),
        }
    }
}

fn default_build_command() -> String {
    "cargo".to_string()
}
fn default_manifest_path() -> String {
    "cli/Cargo.toml".to_string()
}
fn default_binary() -> String {
    "lico".to_string()
}
fn default_target_dir() -> String {
    "cli/target".to_string()
}

/// Correctness test configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestsConfig {
    /// Directory holding one subdirectory per test group
    #[serde(default = "default_tests_dir")]
    pub cases_dir: String,
    /// Groups to run when none is named; empty means every group
    #[serde(default)]
    pub groups: Vec<String>,
    /// File stem of each group's entry program
    #[serde(default = "default_entry_stem")]
    pub entry_stem: String,
    /// Required extension of the entry program (any when unset)
    #[serde(default)]
    pub entry_extension: Option<String>,
    /// Arguments placed before the entry path
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Whether exit status and stderr count towards the verdict
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Fixed shuffle seed (random order when unset)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            cases_dir: default_tests_dir(),
            groups: Vec::new(),
            entry_stem: default_entry_stem(),
            entry_extension: None,
            args: default_args(),
            failure_policy: FailurePolicy::default(),
            seed: None,
        }
    }
}

fn default_tests_dir() -> String {
    "tests".to_string()
}
fn default_entry_stem() -> String {
    "main".to_string()
}
fn default_args() -> Vec<String> {
    vec!["run".to_string()]
}

/// Statistics tool selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    /// The hyperfine CLI (default)
    #[default]
    Hyperfine,
    /// In-process sampler, for machines without hyperfine
    Builtin,
}

/// One environment probe shown before benchmarks run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Label, e.g. `OS`
    pub name: String,
    /// Shell command whose trimmed output is recorded
    pub command: String,
}

/// Benchmark configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Directory holding one subdirectory per benchmark
    #[serde(default = "default_bench_dir")]
    pub cases_dir: String,
    /// Manifest file name inside each benchmark directory
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Benchmarks to run when none is named; empty means every benchmark
    #[serde(default)]
    pub benchmarks: Vec<String>,
    /// Statistics tool
    #[serde(default)]
    pub tool: ToolKind,
    /// hyperfine executable
    #[serde(default = "default_hyperfine")]
    pub hyperfine: String,
    /// Where hyperfine export files are written (system temp dir when unset)
    #[serde(default)]
    pub results_dir: Option<String>,
    /// Benchmarks evaluated concurrently (one per benchmark when unset)
    #[serde(default)]
    pub jobs: Option<usize>,
    /// Fixed shuffle seed for command order (random when unset)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Environment probes
    #[serde(default = "default_environment")]
    pub environment: Vec<ProbeConfig>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            cases_dir: default_bench_dir(),
            manifest: default_manifest(),
            benchmarks: Vec::new(),
            tool: ToolKind::default(),
            hyperfine: default_hyperfine(),
            results_dir: None,
            jobs: None,
            seed: None,
            environment: default_environment(),
        }
    }
}

fn default_bench_dir() -> String {
    "benches/cases".to_string()
}
fn default_manifest() -> String {
    trialbench_core::DEFAULT_MANIFEST_NAME.to_string()
}
fn default_hyperfine() -> String {
    "hyperfine".to_string()
}
fn default_environment() -> Vec<ProbeConfig> {
    vec![
        ProbeConfig {
            name: "Date".to_string(),
            command: r#"date "+%Y/%m/%d %H:%M:%S %Z""#.to_string(),
        },
        ProbeConfig {
            name: "OS".to_string(),
            command: "uname -om".to_string(),
        },
    ]
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl TrialConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Discover and load configuration by walking up from the current directory.
    ///
    /// Returns the defaults, rooted at the current directory, when no file exists.
    pub fn discover() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let mut dir = cwd.clone();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Self::load(&config_path);
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(Self {
            root: cwd,
            ..Self::default()
        })
    }

    /// Resolve a configured path against the config directory
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# TrialBench Configuration

[build]
# Build tool, invoked as `<command> build [--release] --manifest-path <manifest_path>`
command = "cargo"
manifest_path = "cli/Cargo.toml"
# Executable produced by the build
binary = "lico"
# Artifacts are expected at <target_dir>/<debug|release>/<binary>
target_dir = "cli/target"

[tests]
# One subdirectory per test group
cases_dir = "tests"
# Groups to run when none is named (empty = all)
groups = []
# Entry program of each group: <entry_stem>.<ext>
entry_stem = "main"
# entry_extension = "lico"
# Target is invoked as `<binary> <args...> <entry>`
args = ["run"]
# "stdout-only" ignores exit status and stderr; "strict" fails on them
failure_policy = "stdout-only"
# Fixed shuffle seed (uncomment to enable)
# seed = 42

[bench]
# One subdirectory per benchmark, each with a manifest
cases_dir = "benches/cases"
manifest = "info.toml"
# Benchmarks to run when none is named (empty = all)
benchmarks = []
# Statistics tool: "hyperfine" or "builtin"
tool = "hyperfine"
hyperfine = "hyperfine"
# Directory for hyperfine export files (uncomment to enable)
# results_dir = "target/trialbench"
# Benchmarks evaluated concurrently (uncomment to enable)
# jobs = 4
# Fixed shuffle seed for command order (uncomment to enable)
# seed = 42

[[bench.environment]]
name = "Date"
command = "date \"+%Y/%m/%d %H:%M:%S %Z\""

[[bench.environment]]
name = "OS"
command = "uname -om"

[output]
# Default output format: human, json
format = "human"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrialConfig::default();
        assert_eq!(config.build.command, "cargo");
        assert_eq!(config.tests.args, vec!["run"]);
        assert_eq!(config.tests.failure_policy, FailurePolicy::StdoutOnly);
        assert_eq!(config.bench.manifest, "info.toml");
        assert_eq!(config.bench.environment.len(), 2);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [tests]
            cases_dir = "fixtures"
            failure_policy = "strict"
            seed = 7

            [bench]
            tool = "builtin"
            environment = []
        "#;

        let config: TrialConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.tests.cases_dir, "fixtures");
        assert_eq!(config.tests.failure_policy, FailurePolicy::Strict);
        assert_eq!(config.tests.seed, Some(7));
        assert_eq!(config.bench.tool, ToolKind::Builtin);
        assert!(config.bench.environment.is_empty());
        // Defaults should still apply
        assert_eq!(config.output.format, "human");
        assert_eq!(config.build.binary, "lico");
    }

    #[test]
    fn test_empty_file_is_valid() {
        let config: TrialConfig = toml::from_str("").unwrap();
        assert_eq!(config.tests.entry_stem, "main");
    }

    #[test]
    fn test_default_toml_parses() {
        let config: TrialConfig = toml::from_str(&TrialConfig::default_toml()).unwrap();
        assert_eq!(config.bench.environment, TrialConfig::default().bench.environment);
        assert_eq!(config.tests.args, vec!["run"]);
    }

    #[test]
    fn test_load_resolves_against_file_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[tests]\ncases_dir = \"cases\"\n").unwrap();

        let config = TrialConfig::load(&path).unwrap();
        assert_eq!(
            config.resolve(&config.tests.cases_dir),
            dir.path().join("cases")
        );
    }
}
