//! Build Coordinator
//!
//! Builds the target once per harness invocation and hands back a path to an
//! executable artifact. The build inherits the terminal so its progress and
//! diagnostics stay visible.

use crate::config::BuildConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while producing the target executable
#[derive(Debug, Error)]
pub enum BuildError {
    /// The build tool could not be started
    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        /// Build tool
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The build exited unsuccessfully
    #[error("Exit code of `{program} build` is expected 0 but got {}", .code.map(|c| c.to_string()).unwrap_or_else(|| "a signal".to_string()))]
    Failed {
        /// Build tool
        program: String,
        /// Exit code; `None` when killed by a signal
        code: Option<i32>,
    },

    /// The build succeeded but left no artifact at the expected path
    #[error("Build artifact {} does not exist", .path.display())]
    MissingArtifact {
        /// Expected artifact path
        path: PathBuf,
    },

    /// The artifact exists but cannot be executed
    #[error("Build artifact {} is not executable", .path.display())]
    NotExecutable {
        /// Artifact path
        path: PathBuf,
    },
}

impl BuildError {
    /// Exit code the harness should terminate with
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::Failed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// Build profile of the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Unoptimized build
    Debug,
    /// Optimized build
    Release,
}

impl BuildMode {
    /// Artifact subdirectory and display name
    pub fn as_str(self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Release => "release",
        }
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs the external build and locates its artifact
#[derive(Debug, Clone)]
pub struct BuildCoordinator {
    program: String,
    manifest_path: PathBuf,
    artifact_dir: PathBuf,
    binary: String,
}

impl BuildCoordinator {
    /// Coordinator for `config`, with relative paths resolved against `root`
    pub fn new(config: &BuildConfig, root: &Path) -> Self {
        Self {
            program: config.command.clone(),
            manifest_path: root.join(&config.manifest_path),
            artifact_dir: root.join(&config.target_dir),
            binary: config.binary.clone(),
        }
    }

    /// Arguments passed to the build tool
    pub fn args(&self, mode: BuildMode) -> Vec<String> {
        let mut args = vec!["build".to_string()];
        if mode == BuildMode::Release {
            args.push("--release".to_string());
        }
        args.push("--manifest-path".to_string());
        args.push(self.manifest_path.display().to_string());
        args
    }

    /// Where the artifact of a `mode` build is expected
    pub fn artifact_path(&self, mode: BuildMode) -> PathBuf {
        self.artifact_dir
            .join(mode.as_str())
            .join(format!("{}{}", self.binary, std::env::consts::EXE_SUFFIX))
    }

    /// Build the target and return its validated executable path.
    pub fn build(&self, mode: BuildMode) -> Result<PathBuf, BuildError> {
        info!(mode = %mode, manifest = %self.manifest_path.display(), "building target");

        let status = Command::new(&self.program)
            .args(self.args(mode))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| BuildError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(BuildError::Failed {
                program: self.program.clone(),
                code: status.code(),
            });
        }

        let artifact = self.artifact_path(mode);
        validate_executable(&artifact)?;
        debug!(artifact = %artifact.display(), "build finished");
        Ok(artifact)
    }
}

/// Check that `path` exists and can be executed
pub fn validate_executable(path: &Path) -> Result<(), BuildError> {
    let metadata = std::fs::metadata(path).map_err(|_| BuildError::MissingArtifact {
        path: path.to_path_buf(),
    })?;
    if !metadata.is_file() {
        return Err(BuildError::NotExecutable {
            path: path.to_path_buf(),
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(BuildError::NotExecutable {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(())
}
