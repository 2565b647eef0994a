//! Integration tests for TrialBench
//!
//! These tests drive real processes: `/bin/sh` stands in for the target
//! executable and each group's entry program is a small shell script.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use trialbench::{
    BenchError, Checker, FailureCause, FailurePolicy, FixtureLayout, FixtureLoader,
    ManifestLoader, MeasureRequest, Measurement, Orchestrator, ShuffleOrder, StatisticsTool,
    ToolError, TrialRunner, TestVerdict,
};
use trialbench_cli::{Cli, run_with_cli};

fn write(path: impl AsRef<Path>, content: &str) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Group whose entry copies stdin to stdout
fn echo_group(root: &Path, expected: &str) {
    write(root.join("echo/main.sh"), "cat\n");
    write(root.join("echo/input.txt"), "5\n");
    write(root.join("echo/output.txt"), expected);
}

fn check_group(cases_root: &Path, group: &str) -> Vec<TestVerdict> {
    let loader = FixtureLoader::new(cases_root, FixtureLayout::default(), ShuffleOrder::Random);
    let group = loader.load(group).unwrap();
    let runner = TrialRunner::new("/bin/sh");
    let args: Vec<String> = Vec::new();
    let checker = Checker::new(&runner, &args, FailurePolicy::StdoutOnly);
    checker.check(&group).map(Result::unwrap).collect()
}

/// Returns `mean_of(name)` seconds for every command and records requests
struct RecordingTool {
    means: Vec<(&'static str, f64)>,
    requests: Mutex<Vec<MeasureRequest>>,
}

impl RecordingTool {
    fn new(means: Vec<(&'static str, f64)>) -> Self {
        Self {
            means,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl StatisticsTool for RecordingTool {
    fn measure(&self, request: &MeasureRequest) -> Result<Vec<Measurement>, ToolError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(request
            .commands
            .iter()
            .map(|c| {
                let mean = self
                    .means
                    .iter()
                    .find(|(name, _)| *name == c.name)
                    .map(|(_, mean)| *mean)
                    .unwrap_or(0.5);
                Measurement {
                    command: c.name.clone(),
                    mean,
                    stddev: None,
                    median: mean,
                    user: None,
                    system: None,
                    min: mean,
                    max: mean,
                    times: vec![mean],
                }
            })
            .collect())
    }
}

fn manifest(dir: &Path, name: &str, benches: &[(&str, bool)]) {
    let mut text = String::from("warmup = 1\nruns = 3\n");
    for (bench, base) in benches {
        text.push_str(&format!(
            "\n[[benches]]\nname = \"{}\"\nbase = {}\ncommand = \"sh\"\npath = \"{}.sh\"\n",
            bench, base, bench
        ));
        write(dir.join(name).join(format!("{}.sh", bench)), ":\n");
    }
    write(dir.join(name).join("info.toml"), &text);
}

#[test]
fn test_flat_group_passes() {
    let dir = TempDir::new().unwrap();
    echo_group(dir.path(), "5\n");

    let verdicts = check_group(dir.path(), "echo");
    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts[0].name, None);
    assert!(verdicts[0].passed());
}

#[test]
fn test_flat_group_mismatch() {
    let dir = TempDir::new().unwrap();
    echo_group(dir.path(), "6\n");

    let verdicts = check_group(dir.path(), "echo");
    let failure = verdicts[0].failure().unwrap();
    assert_eq!(failure.cause, FailureCause::Mismatch);
    assert_eq!(failure.actual, "5\n");
    assert_eq!(failure.expected, "6\n");
}

#[test]
fn test_indexed_input_only_expects_empty_output() {
    let dir = TempDir::new().unwrap();
    // Consumes its input and prints nothing
    write(dir.path().join("quiet/main.sh"), "cat > /dev/null\n");
    write(dir.path().join("quiet/input/a.txt"), "1 2 3\n");

    let loader = FixtureLoader::new(dir.path(), FixtureLayout::default(), ShuffleOrder::Preserve);
    let group = loader.load("quiet").unwrap();
    assert_eq!(group.cases.len(), 1);
    assert_eq!(group.cases[0].name.as_deref(), Some("a"));
    assert_eq!(group.cases[0].expected_output(), b"");

    let verdicts = check_group(dir.path(), "quiet");
    assert!(verdicts[0].passed());
}

#[test]
fn test_invalid_utf8_output_does_not_match_replacement_char() {
    let dir = TempDir::new().unwrap();
    write(dir.path().join("bytes/main.sh"), "printf '\\377'\n");
    // EF BF BD is U+FFFD, what lossy decoding of FF would produce
    std::fs::write(dir.path().join("bytes/output.txt"), [0xEF, 0xBF, 0xBD]).unwrap();

    let verdicts = check_group(dir.path(), "bytes");
    let failure = verdicts[0].failure().unwrap();
    assert_eq!(failure.cause, FailureCause::Mismatch);

    std::fs::write(dir.path().join("bytes/output.txt"), [0xFF]).unwrap();
    assert!(check_group(dir.path(), "bytes")[0].passed());
}

#[test]
fn test_stderr_and_exit_code_do_not_fail_by_default() {
    let dir = TempDir::new().unwrap();
    write(dir.path().join("noisy/main.sh"), "cat\necho diag >&2\nexit 4\n");
    write(dir.path().join("noisy/input.txt"), "ok\n");
    write(dir.path().join("noisy/output.txt"), "ok\n");

    assert!(check_group(dir.path(), "noisy")[0].passed());

    let loader = FixtureLoader::new(dir.path(), FixtureLayout::default(), ShuffleOrder::Preserve);
    let group = loader.load("noisy").unwrap();
    let runner = TrialRunner::new("/bin/sh");
    let args: Vec<String> = Vec::new();
    let strict = Checker::new(&runner, &args, FailurePolicy::Strict);
    let verdict = strict.check(&group).next().unwrap().unwrap();
    assert_eq!(
        verdict.failure().unwrap().cause,
        FailureCause::ExitStatus(Some(4))
    );
}

#[test]
fn test_no_baseline_raised_before_tool() {
    let dir = TempDir::new().unwrap();
    manifest(dir.path(), "fib", &[("lua", false), ("python", false)]);

    let loader = ManifestLoader::new(dir.path(), "info.toml", ShuffleOrder::Random);
    let def = loader.load("fib").unwrap();
    let orchestrator = Orchestrator::new(RecordingTool::new(vec![]));

    let err = orchestrator.evaluate(&def).unwrap_err();
    assert!(matches!(err, BenchError::NoBaseline(_)));
    assert_eq!(err.to_string(), "\"fib\" has no base bench");
    assert_eq!(orchestrator.tool().calls(), 0);
}

#[test]
fn test_two_baselines_rejected() {
    let dir = TempDir::new().unwrap();
    manifest(dir.path(), "fib", &[("lico", true), ("lua", true)]);

    let def = ManifestLoader::new(dir.path(), "info.toml", ShuffleOrder::Random)
        .load("fib")
        .unwrap();
    let orchestrator = Orchestrator::new(RecordingTool::new(vec![]));
    assert!(matches!(
        orchestrator.evaluate(&def),
        Err(BenchError::NoBaseline(_))
    ));
    assert_eq!(orchestrator.tool().calls(), 0);
}

#[test]
fn test_ratio_against_baseline() {
    let dir = TempDir::new().unwrap();
    manifest(dir.path(), "fib", &[("lico", true), ("lua", false)]);

    let def = ManifestLoader::new(dir.path(), "info.toml", ShuffleOrder::Random)
        .load("fib")
        .unwrap();
    let orchestrator = Orchestrator::new(RecordingTool::new(vec![("lico", 0.010), ("lua", 0.020)]));

    let cmp = orchestrator.evaluate(&def).unwrap();
    assert_eq!(cmp.baseline.name, "lico");
    assert_eq!(cmp.compare.len(), 1);
    assert_eq!(cmp.compare[0].sample.name, "lua");
    assert_eq!(cmp.compare[0].ratios.mean, 2.0);
    assert_eq!(cmp.compare[0].ratios.stddev, None);

    let requests = orchestrator.tool().requests.lock().unwrap();
    assert_eq!(requests[0].warmup, 1);
    assert_eq!(requests[0].runs, 3);
    let lua = requests[0].commands.iter().find(|c| c.name == "lua").unwrap();
    assert_eq!(
        lua.command,
        format!("sh {}", dir.path().join("fib").join("lua.sh").display())
    );
}

#[test]
fn test_comparison_sorted_and_complete() {
    let dir = TempDir::new().unwrap();
    let benches = [("lico", true), ("python", false), ("lua", false), ("js", false)];
    manifest(dir.path(), "nbody", &benches);

    let def = ManifestLoader::new(dir.path(), "info.toml", ShuffleOrder::Random)
        .load("nbody")
        .unwrap();
    let cmp = Orchestrator::new(RecordingTool::new(vec![]))
        .evaluate(&def)
        .unwrap();

    let names: Vec<&str> = cmp.compare.iter().map(|c| c.sample.name.as_str()).collect();
    assert_eq!(names, vec!["js", "lua", "python"]);
    assert_eq!(cmp.compare.len(), benches.len() - 1);
}

/// A project directory with a `trialbench.toml` pointing at `/bin/sh`
fn project(extra: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("trialbench.toml");
    write(
        &config,
        &format!(
            "[tests]\ncases_dir = \"cases\"\nargs = []\n\n[bench]\ncases_dir = \"benches\"\ntool = \"builtin\"\nenvironment = []\n{}",
            extra
        ),
    );
    (dir, config)
}

fn cli(args: &[&str]) -> Cli {
    use clap::Parser;
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_cli_test_run_reports_failure() {
    let (dir, config) = project("");
    echo_group(&dir.path().join("cases"), "6\n");
    let report = dir.path().join("report.json");

    let code = run_with_cli(cli(&[
        "trialbench",
        "--config",
        config.to_str().unwrap(),
        "--format",
        "json",
        "--output",
        report.to_str().unwrap(),
        "test",
        "debug",
        "--executable",
        "/bin/sh",
    ]))
    .unwrap();
    assert_eq!(code, 1);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["meta"]["mode"], "debug");
    assert_eq!(json["summary"]["total"], 1);
    assert_eq!(json["summary"]["failed"], 1);
    let verdict = &json["groups"][0]["verdicts"][0];
    assert_eq!(verdict["verdict"]["actual"], "5\n");
    assert_eq!(verdict["verdict"]["expected"], "6\n");
}

#[test]
fn test_cli_single_case() {
    let (dir, config) = project("");
    let cases = dir.path().join("cases");
    write(cases.join("sum/main.sh"), "read a b; echo $((a + b))\n");
    write(cases.join("sum/input/one.txt"), "1 2\n");
    write(cases.join("sum/output/one.txt"), "3\n");
    write(cases.join("sum/input/two.txt"), "2 2\n");
    write(cases.join("sum/output/two.txt"), "5\n");

    let run = |target: &str| {
        run_with_cli(cli(&[
            "trialbench",
            "--config",
            config.to_str().unwrap(),
            "test",
            "release",
            target,
            "--executable",
            "/bin/sh",
        ]))
    };

    assert_eq!(run("sum/one").unwrap(), 0);
    assert_eq!(run("sum/two").unwrap(), 1);
    assert!(run("sum/three").is_err());
    assert!(run("missing").is_err());
}

#[test]
fn test_cli_missing_executable_exits_nonzero() {
    let (dir, config) = project("");
    echo_group(&dir.path().join("cases"), "5\n");
    let missing = dir.path().join("no-such-binary");

    let code = run_with_cli(cli(&[
        "trialbench",
        "--config",
        config.to_str().unwrap(),
        "test",
        "debug",
        "--executable",
        missing.to_str().unwrap(),
    ]))
    .unwrap();
    assert_eq!(code, 1);
}

#[test]
fn test_cli_bench_isolates_failing_benchmark() {
    let (dir, config) = project("");
    let benches = dir.path().join("benches");
    manifest(&benches, "good", &[("fast", true), ("slow", false)]);
    manifest(&benches, "headless", &[("a", false), ("b", false)]);
    let report = dir.path().join("bench.json");

    let code = run_with_cli(cli(&[
        "trialbench",
        "--config",
        config.to_str().unwrap(),
        "--format",
        "json",
        "--output",
        report.to_str().unwrap(),
        "bench",
        "--jobs",
        "2",
    ]))
    .unwrap();
    assert_eq!(code, 1);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["summary"]["total"], 2);
    assert_eq!(json["benchmarks"][0]["name"], "good");
    assert_eq!(json["benchmarks"][0]["baseline"]["name"], "fast");
    assert_eq!(json["benchmarks"][0]["compare"][0]["name"], "slow");
    assert_eq!(json["failures"][0]["name"], "headless");
    assert_eq!(json["failures"][0]["message"], "\"headless\" has no base bench");
}
