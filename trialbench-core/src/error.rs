//! Loader Errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning fixture directories and manifests into records.
///
/// Every variant is fatal for the run: nothing is executed until loading succeeds.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Group, benchmark or cases root does not exist
    #[error("\"{name}\" is not found ({})", .path.display())]
    NotFound {
        /// Requested name
        name: String,
        /// Directory that was looked up
        path: PathBuf,
    },

    /// Benchmark directory without its manifest file
    #[error("\"{name}\" has no {}", .path.display())]
    MissingManifest {
        /// Benchmark name
        name: String,
        /// Manifest file name
        path: PathBuf,
    },

    /// Group without an entry program
    #[error("\"{name}\" has no entry file {stem}.* in {}", .root.display())]
    MissingEntry {
        /// Group name
        name: String,
        /// Entry file stem looked for
        stem: String,
        /// Group directory
        root: PathBuf,
    },

    /// Group with more than one file matching the entry pattern
    #[error("\"{name}\" has several entry candidates: {}", .candidates.join(", "))]
    AmbiguousEntry {
        /// Group name
        name: String,
        /// Matching file names
        candidates: Vec<String>,
    },

    /// Group matching neither fixture convention
    #[error("\"{name}\" has no test cases (expected input.txt/output.txt or input/ and output/)")]
    NoCases {
        /// Group name
        name: String,
    },

    /// Manifest with a missing field, a wrong type or an invalid value
    #[error("Invalid manifest {}: {message}", .path.display())]
    Schema {
        /// Manifest file
        path: PathBuf,
        /// What is wrong with it
        message: String,
    },

    /// Manifest naming two commands the same
    #[error("Manifest {} defines bench \"{bench}\" more than once", .path.display())]
    DuplicateBench {
        /// Manifest file
        path: PathBuf,
        /// Repeated command name
        bench: String,
    },

    /// Any other filesystem failure
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}
