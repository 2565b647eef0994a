#![warn(missing_docs)]
//! TrialBench CLI Library
//!
//! Command-line front end of the harness: builds the target, checks it against
//! fixture groups and benchmarks it against other implementations.
//!
//! ```text
//! trialbench test <debug|release> [group[/case]]   correctness run
//! trialbench bench [name...]                       benchmark run
//! trialbench list                                  show groups and benchmarks
//! trialbench init                                  print a default trialbench.toml
//! ```

mod build;
mod config;
mod executor;
mod planner;
mod trial;

pub use build::{BuildCoordinator, BuildError, BuildMode, validate_executable};
pub use config::*;
pub use executor::{
    BenchError, Checker, Orchestrator, UNAVAILABLE, Verdicts, build_report_meta,
    dump_environment, format_bench_output, format_comparison, format_environment,
    format_failures, format_group_header, format_run_header, format_single_case,
    format_test_summary, format_verdict_line, judge,
};
pub use planner::{RunPlan, Target, build_plan};
pub use trial::{FailurePolicy, TrialError, TrialOutput, TrialRunner, report_warnings};

use anyhow::Context;
use clap::{Parser, Subcommand};
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error};
use trialbench_core::{
    BenchmarkDefinition, FixtureLayout, FixtureLoader, ManifestLoader, ShuffleOrder, TestGroup,
};
use trialbench_report::{
    BenchFailure, BenchReport, BenchSummary, GroupReport, OutputFormat, TestReport, TestSummary,
    generate_bench_json, generate_test_json,
};
use trialbench_stats::{BuiltinSampler, Hyperfine, StatisticsTool};

/// TrialBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "trialbench")]
#[command(author, version, about = "TrialBench - correctness and benchmark harness for language runtimes")]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: trialbench.toml found by walking up)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: human, json
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Output file for the report (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the target and check it against the fixture groups
    Test {
        /// Build mode
        #[arg(value_enum)]
        mode: BuildMode,

        /// Run one group, or one case with `group/case`
        target: Option<Target>,

        /// Only run groups whose name matches this regex
        #[arg(long)]
        filter: Option<String>,

        /// Also fail cases on nonzero exit or stderr output
        #[arg(long)]
        strict: bool,

        /// Shuffle seed for a reproducible order
        #[arg(long)]
        seed: Option<u64>,

        /// Use this executable instead of building
        #[arg(long)]
        executable: Option<PathBuf>,
    },
    /// Run benchmarks and compare every command against its baseline
    Bench {
        /// Benchmarks to run (default: configured list, else all)
        names: Vec<String>,

        /// Only run benchmarks whose name matches this regex
        #[arg(long)]
        filter: Option<String>,

        /// Build the target in this mode first
        #[arg(long, value_enum)]
        build: Option<BuildMode>,

        /// Benchmarks evaluated concurrently
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Shuffle seed for a reproducible command order
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List test groups and benchmarks
    List,
    /// Print a default trialbench.toml
    Init,
}

/// Run the TrialBench CLI with the process arguments.
///
/// # Returns
/// The process exit code, or an error for fatal conditions.
pub fn run() -> anyhow::Result<u8> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the TrialBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<u8> {
    // Logs go to stderr so stdout carries only the report
    let filter = if cli.verbose {
        "trialbench=debug"
    } else {
        "trialbench=info"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = match &cli.config {
        Some(path) => TrialConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => TrialConfig::discover()?,
    };
    debug!(root = %config.root.display(), "configuration loaded");

    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(anyhow::Error::msg)?;

    match &cli.command {
        Commands::Test {
            mode,
            target,
            filter,
            strict,
            seed,
            executable,
        } => {
            let options = TestOptions {
                mode: *mode,
                target: target.clone(),
                filter: compile_filter(filter.as_deref())?,
                strict: *strict,
                seed: *seed,
                executable: executable.clone(),
            };
            run_tests(&cli, &config, format, options)
        }
        Commands::Bench {
            names,
            filter,
            build,
            jobs,
            seed,
        } => {
            let options = BenchOptions {
                names: names.clone(),
                filter: compile_filter(filter.as_deref())?,
                build: *build,
                jobs: *jobs,
                seed: *seed,
            };
            run_benches(&cli, &config, format, options)
        }
        Commands::List => {
            list(&config)?;
            Ok(0)
        }
        Commands::Init => {
            print!("{}", TrialConfig::default_toml());
            Ok(0)
        }
    }
}

struct TestOptions {
    mode: BuildMode,
    target: Option<Target>,
    filter: Option<Regex>,
    strict: bool,
    seed: Option<u64>,
    executable: Option<PathBuf>,
}

struct BenchOptions {
    names: Vec<String>,
    filter: Option<Regex>,
    build: Option<BuildMode>,
    jobs: Option<usize>,
    seed: Option<u64>,
}

fn compile_filter(pattern: Option<&str>) -> anyhow::Result<Option<Regex>> {
    pattern
        .map(|p| Regex::new(p).with_context(|| format!("Invalid filter '{}'", p)))
        .transpose()
}

fn fixture_loader(config: &TrialConfig, order: ShuffleOrder) -> FixtureLoader<ShuffleOrder> {
    let layout = FixtureLayout {
        entry_stem: config.tests.entry_stem.clone(),
        entry_extension: config.tests.entry_extension.clone(),
    };
    FixtureLoader::new(config.resolve(&config.tests.cases_dir), layout, order)
}

fn manifest_loader(config: &TrialConfig, order: ShuffleOrder) -> ManifestLoader<ShuffleOrder> {
    ManifestLoader::new(
        config.resolve(&config.bench.cases_dir),
        config.bench.manifest.clone(),
        order,
    )
}

/// Build the target, or validate an explicitly given executable.
///
/// A failed build is reported here; the caller exits with the returned code.
fn obtain_executable(
    config: &TrialConfig,
    mode: BuildMode,
    executable: Option<&Path>,
) -> Result<PathBuf, u8> {
    let result = match executable {
        Some(path) => validate_executable(path).map(|()| path.to_path_buf()),
        None => BuildCoordinator::new(&config.build, &config.root).build(mode),
    };
    result.map_err(|e| {
        error!("{}", e);
        u8::try_from(e.exit_code()).unwrap_or(1)
    })
}

/// Write a rendered report to `--output`, or stdout
fn emit(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Report written to: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Print progress output in human mode
fn progress(format: OutputFormat, text: &str) -> anyhow::Result<()> {
    if format == OutputFormat::Human {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
    }
    Ok(())
}

fn run_tests(
    cli: &Cli,
    config: &TrialConfig,
    format: OutputFormat,
    options: TestOptions,
) -> anyhow::Result<u8> {
    let start_time = Instant::now();
    let loader = fixture_loader(config, ShuffleOrder::from_seed(options.seed.or(config.tests.seed)));

    // Everything is loaded before the build so bad fixtures fail fast
    let names = match &options.target {
        Some(target) => vec![target.group.clone()],
        None => {
            build_plan(&config.tests.groups, || loader.discover(), options.filter.as_ref())?.names
        }
    };
    let groups = names
        .iter()
        .map(|name| loader.load(name))
        .collect::<Result<Vec<TestGroup>, _>>()?;

    let single_case = match &options.target {
        Some(Target {
            group,
            case: Some(case),
        }) => {
            if groups.first().and_then(|g| g.case(case)).is_none() {
                anyhow::bail!("Test case {} in {} not found.", case, group);
            }
            Some(case.clone())
        }
        _ => None,
    };

    let executable = match obtain_executable(config, options.mode, options.executable.as_deref()) {
        Ok(path) => path,
        Err(code) => return Ok(code),
    };

    let runner = TrialRunner::new(executable);
    let policy = if options.strict {
        FailurePolicy::Strict
    } else {
        config.tests.failure_policy
    };
    let checker = Checker::new(&runner, &config.tests.args, policy);

    let mut reports = Vec::with_capacity(groups.len());
    if let Some(case_name) = single_case {
        // groups[0] holds the case, checked above
        let Some((group, case)) = groups
            .first()
            .and_then(|g| g.case(&case_name).map(|c| (g, c)))
        else {
            anyhow::bail!("Test case {} not found.", case_name);
        };
        let verdict = checker.check_case(group, case)?;
        if format == OutputFormat::Human {
            let text = format_single_case(&verdict);
            if verdict.passed() {
                emit(cli.output.as_deref(), &text)?;
            } else {
                eprint!("{}", text);
            }
        }
        reports.push(GroupReport {
            name: group.name.clone(),
            verdicts: vec![verdict],
        });
    } else {
        progress(format, &format_run_header("Running tests", Some(options.mode)))?;
        for group in &groups {
            progress(format, &format_group_header(&group.name, group.cases.len()))?;

            let mut verdicts = Vec::with_capacity(group.cases.len());
            for verdict in checker.check(group) {
                let verdict = verdict?;
                progress(format, &format_verdict_line(&verdict))?;
                verdicts.push(verdict);
            }

            if format == OutputFormat::Human {
                eprint!("{}", format_failures(options.mode, &group.name, &verdicts));
            }
            reports.push(GroupReport {
                name: group.name.clone(),
                verdicts,
            });
        }
    }

    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    let summary = TestSummary::from_groups(&reports, duration_ms);
    let report = TestReport {
        meta: build_report_meta(Some(options.mode), Vec::new()),
        groups: reports,
        summary,
    };

    match format {
        OutputFormat::Json => emit(cli.output.as_deref(), &generate_test_json(&report)?)?,
        OutputFormat::Human if single_case_run(&options) => {}
        OutputFormat::Human => emit(cli.output.as_deref(), &format_test_summary(&report))?,
    }

    Ok(if report.summary.failed > 0 { 1 } else { 0 })
}

fn single_case_run(options: &TestOptions) -> bool {
    options.target.as_ref().is_some_and(|t| t.case.is_some())
}

fn run_benches(
    cli: &Cli,
    config: &TrialConfig,
    format: OutputFormat,
    options: BenchOptions,
) -> anyhow::Result<u8> {
    let start_time = Instant::now();
    let loader = manifest_loader(config, ShuffleOrder::from_seed(options.seed.or(config.bench.seed)));

    let configured = if options.names.is_empty() {
        &config.bench.benchmarks
    } else {
        &options.names
    };
    let plan = build_plan(configured, || loader.discover(), options.filter.as_ref())?;
    let defs = plan
        .names
        .iter()
        .map(|name| loader.load(name))
        .collect::<Result<Vec<BenchmarkDefinition>, _>>()?;

    if let Some(mode) = options.build {
        if let Err(code) = obtain_executable(config, mode, None) {
            return Ok(code);
        }
    }

    let environment = dump_environment(&config.bench.environment);
    progress(format, &format_run_header("Running benchmarks", options.build))?;
    progress(format, &format_environment(&environment))?;

    let jobs = options.jobs.or(config.bench.jobs).unwrap_or(defs.len());
    let outcomes = match config.bench.tool {
        ToolKind::Hyperfine => {
            let mut tool = Hyperfine::default().with_program(&config.bench.hyperfine);
            if let Some(dir) = &config.bench.results_dir {
                tool = tool.with_results_dir(config.resolve(dir));
            }
            evaluate_all(tool, &defs, jobs)?
        }
        ToolKind::Builtin => evaluate_all(BuiltinSampler::default(), &defs, jobs)?,
    };

    let mut benchmarks = Vec::new();
    let mut failures = Vec::new();
    for (def, outcome) in defs.iter().zip(outcomes) {
        match outcome {
            Ok(comparison) => benchmarks.push(comparison),
            Err(e) => failures.push(BenchFailure {
                name: def.name.clone(),
                message: e.to_string(),
            }),
        }
    }

    let report = BenchReport {
        meta: build_report_meta(options.build, environment),
        summary: BenchSummary {
            total: defs.len(),
            succeeded: benchmarks.len(),
            failed: failures.len(),
            duration_ms: start_time.elapsed().as_secs_f64() * 1000.0,
        },
        benchmarks,
        failures,
    };

    let output = match format {
        OutputFormat::Json => generate_bench_json(&report)?,
        OutputFormat::Human => format_bench_output(&report),
    };
    emit(cli.output.as_deref(), &output)?;

    Ok(if report.failures.is_empty() { 0 } else { 1 })
}

fn evaluate_all<T: StatisticsTool>(
    tool: T,
    defs: &[BenchmarkDefinition],
    jobs: usize,
) -> anyhow::Result<Vec<Result<trialbench_stats::BenchmarkComparison, BenchError>>> {
    Ok(Orchestrator::new(tool).run_all(defs, jobs)?)
}

fn list(config: &TrialConfig) -> anyhow::Result<()> {
    let fixtures = fixture_loader(config, ShuffleOrder::Preserve);
    println!("Test groups ({}):", fixtures.cases_root().display());
    match fixtures.discover() {
        Ok(names) => {
            for name in &names {
                match fixtures.load(name) {
                    Ok(group) => println!("├── {} ({} cases)", group.name, group.cases.len()),
                    Err(e) => println!("├── {} (error: {})", name, e),
                }
            }
            println!("{} groups found.", names.len());
        }
        Err(e) => println!("  {}", e),
    }

    let manifests = manifest_loader(config, ShuffleOrder::Preserve);
    println!("\nBenchmarks ({}):", manifests.cases_root().display());
    match manifests.discover() {
        Ok(names) => {
            for name in &names {
                match manifests.load(name) {
                    Ok(def) => {
                        let commands: Vec<String> = def
                            .benches
                            .iter()
                            .map(|b| {
                                if b.is_base {
                                    format!("{} (base)", b.name)
                                } else {
                                    b.name.clone()
                                }
                            })
                            .collect();
                        println!(
                            "├── {} [warmup {}, runs {}]: {}",
                            def.name,
                            def.warmup,
                            def.runs,
                            commands.join(", ")
                        );
                    }
                    Err(e) => println!("├── {} (error: {})", name, e),
                }
            }
            println!("{} benchmarks found.", names.len());
        }
        Err(e) => println!("  {}", e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_test_command() {
        let cli = Cli::try_parse_from([
            "trialbench",
            "test",
            "release",
            "echo/a",
            "--strict",
            "--seed",
            "7",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.format.as_deref(), Some("json"));
        match cli.command {
            Commands::Test {
                mode,
                target,
                strict,
                seed,
                ..
            } => {
                assert_eq!(mode, BuildMode::Release);
                assert_eq!(target.unwrap().case.as_deref(), Some("a"));
                assert!(strict);
                assert_eq!(seed, Some(7));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_bench_command() {
        let cli = Cli::try_parse_from(["trialbench", "bench", "nbody", "fib", "-j", "2"]).unwrap();
        match cli.command {
            Commands::Bench { names, jobs, .. } => {
                assert_eq!(names, vec!["nbody", "fib"]);
                assert_eq!(jobs, Some(2));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_mode_is_required() {
        assert!(Cli::try_parse_from(["trialbench", "test"]).is_err());
        assert!(Cli::try_parse_from(["trialbench", "test", "fast"]).is_err());
    }

    #[test]
    fn test_invalid_filter() {
        assert!(compile_filter(Some("(")).is_err());
        assert!(compile_filter(None).unwrap().is_none());
    }
}
