//! Hyperfine Driver
//!
//! Runs `hyperfine` with one `--command-name`/command pair per request entry
//! and reads the statistics back from a JSON export. Every invocation writes
//! to its own `result-<uuid>.json`, which is deleted once read, so concurrent
//! benchmarks never share a file.

use crate::tool::{MeasureRequest, StatisticsTool, ToolError};
use crate::Measurement;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct Export {
    results: Vec<Measurement>,
}

/// Export file owned by one invocation; removed on drop
struct ExportFile(PathBuf);

impl Drop for ExportFile {
    fn drop(&mut self) {
        // hyperfine may have failed before creating it
        let _ = std::fs::remove_file(&self.0);
    }
}

/// `StatisticsTool` backed by the hyperfine CLI
#[derive(Debug, Clone)]
pub struct Hyperfine {
    program: PathBuf,
    results_dir: PathBuf,
}

impl Default for Hyperfine {
    fn default() -> Self {
        Self {
            program: PathBuf::from("hyperfine"),
            results_dir: std::env::temp_dir(),
        }
    }
}

impl Hyperfine {
    /// Use `program` as the hyperfine executable
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Write export files into `dir`
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// Command-line arguments for `request`, exporting to `export`
    pub fn args(&self, request: &MeasureRequest, export: &Path) -> Vec<String> {
        let mut args = vec![
            format!("--warmup={}", request.warmup),
            format!("--runs={}", request.runs),
            format!("--export-json={}", export.display()),
        ];
        for command in &request.commands {
            args.push(format!("--command-name={}", command.name));
            args.push(command.command.clone());
        }
        args
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl StatisticsTool for Hyperfine {
    fn measure(&self, request: &MeasureRequest) -> Result<Vec<Measurement>, ToolError> {
        std::fs::create_dir_all(&self.results_dir).map_err(|e| ToolError::Io {
            path: self.results_dir.clone(),
            source: e,
        })?;
        let export = ExportFile(
            self.results_dir
                .join(format!("result-{}.json", Uuid::new_v4())),
        );

        debug!(
            program = %self.program.display(),
            export = %export.0.display(),
            commands = request.commands.len(),
            "invoking hyperfine"
        );

        let output = Command::new(&self.program)
            .args(self.args(request, &export.0))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ToolError::Spawn {
                program: self.program_name(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ToolError::Failed {
                program: self.program_name(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let json = std::fs::read_to_string(&export.0).map_err(|e| ToolError::Io {
            path: export.0.clone(),
            source: e,
        })?;
        parse_export(&json, &export.0)
    }
}

/// Parse the `results` array of a hyperfine JSON export
fn parse_export(json: &str, path: &Path) -> Result<Vec<Measurement>, ToolError> {
    let export: Export = serde_json::from_str(json).map_err(|e| ToolError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(export.results)
}
