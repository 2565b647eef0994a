//! Benchmark Manifest Loading
//!
//! Each benchmark lives in its own directory with an `info.toml`:
//!
//! ```toml
//! warmup = 3
//! runs = 10
//!
//! [[benches]]
//! name = "lico"
//! base = true
//! command = "target/release/lico run"
//! path = "main.lico"
//!
//! [[benches]]
//! name = "python"
//! command = "python3"
//! path = "main.py"
//! ```

use crate::error::LoadError;
use crate::shuffle::Shuffler;
use crate::{BenchCommand, BenchmarkDefinition};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Manifest file name looked up in every benchmark directory
pub const DEFAULT_MANIFEST_NAME: &str = "info.toml";

#[derive(Debug, Deserialize)]
struct ManifestFile {
    warmup: u64,
    runs: u64,
    benches: Vec<ManifestBench>,
}

#[derive(Debug, Deserialize)]
struct ManifestBench {
    name: String,
    #[serde(default)]
    base: bool,
    command: String,
    path: String,
}

/// Loads benchmark definitions from a cases root
#[derive(Debug, Clone)]
pub struct ManifestLoader<S> {
    cases_root: PathBuf,
    manifest_name: String,
    shuffler: S,
}

impl<S: Shuffler> ManifestLoader<S> {
    /// Create a loader over `cases_root`, reading `manifest_name` in each benchmark directory
    pub fn new(cases_root: impl Into<PathBuf>, manifest_name: impl Into<String>, shuffler: S) -> Self {
        Self {
            cases_root: cases_root.into(),
            manifest_name: manifest_name.into(),
            shuffler,
        }
    }

    /// Directory the benchmarks live in
    pub fn cases_root(&self) -> &Path {
        &self.cases_root
    }

    /// Names of benchmark directories that carry a manifest, sorted by name
    pub fn discover(&self) -> Result<Vec<String>, LoadError> {
        let entries = std::fs::read_dir(&self.cases_root).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound {
                    name: self.cases_root.display().to_string(),
                    path: self.cases_root.clone(),
                }
            } else {
                LoadError::io(&self.cases_root, e)
            }
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| LoadError::io(&self.cases_root, e))?.path();
            if !path.join(&self.manifest_name).is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Load and validate one benchmark; its commands are shuffled once.
    ///
    /// Baseline validation is left to the orchestrator so that a definition
    /// without a baseline can still be listed.
    pub fn load(&self, name: &str) -> Result<BenchmarkDefinition, LoadError> {
        let base_path = self.cases_root.join(name);
        if !base_path.is_dir() {
            return Err(LoadError::NotFound {
                name: name.to_string(),
                path: base_path,
            });
        }

        let manifest_path = base_path.join(&self.manifest_name);
        if !manifest_path.is_file() {
            return Err(LoadError::MissingManifest {
                name: name.to_string(),
                path: PathBuf::from(&self.manifest_name),
            });
        }

        let text = std::fs::read_to_string(&manifest_path)
            .map_err(|e| LoadError::io(&manifest_path, e))?;
        let mut definition = parse_manifest(name, &base_path, &manifest_path, &text)?;
        self.shuffler.shuffle(&mut definition.benches);

        debug!(
            benchmark = name,
            commands = definition.benches.len(),
            warmup = definition.warmup,
            runs = definition.runs,
            "loaded benchmark manifest"
        );

        Ok(definition)
    }
}

fn parse_manifest(
    name: &str,
    base_path: &Path,
    manifest_path: &Path,
    text: &str,
) -> Result<BenchmarkDefinition, LoadError> {
    let manifest: ManifestFile = toml::from_str(text).map_err(|e| LoadError::Schema {
        path: manifest_path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    if manifest.runs == 0 {
        return Err(LoadError::Schema {
            path: manifest_path.to_path_buf(),
            message: "runs must be at least 1".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for bench in &manifest.benches {
        if !seen.insert(bench.name.as_str()) {
            return Err(LoadError::DuplicateBench {
                path: manifest_path.to_path_buf(),
                bench: bench.name.clone(),
            });
        }
    }

    Ok(BenchmarkDefinition {
        name: name.to_string(),
        base_path: base_path.to_path_buf(),
        warmup: manifest.warmup,
        runs: manifest.runs,
        benches: manifest
            .benches
            .into_iter()
            .map(|b| BenchCommand {
                name: b.name,
                is_base: b.base,
                command: b.command,
                path: b.path,
            })
            .collect(),
    })
}
