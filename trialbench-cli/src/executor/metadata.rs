//! Run Metadata Collection
//!
//! Collects what a report needs to be interpreted later: harness version,
//! timestamp, git commit, OS/arch and the output of the configured
//! environment probes (`date`, `uname -om`, interpreter versions, ...).
//!
//! Probes never fail the run. A probe that cannot be spawned, exits nonzero or
//! prints nothing is recorded as `unavailable`.

use crate::build::BuildMode;
use crate::config::ProbeConfig;
use chrono::Utc;
use std::process::{Command, Stdio};
use tracing::debug;
use trialbench_report::{EnvironmentEntry, ReportMeta, SystemInfo};

/// Recorded for a probe that produced no usable output
pub const UNAVAILABLE: &str = "unavailable";

/// Run every probe through `sh -c`, in order
pub fn dump_environment(probes: &[ProbeConfig]) -> Vec<EnvironmentEntry> {
    probes
        .iter()
        .map(|probe| EnvironmentEntry {
            name: probe.name.clone(),
            output: run_probe(&probe.command).unwrap_or_else(|| UNAVAILABLE.to_string()),
        })
        .collect()
}

fn run_probe(command: &str) -> Option<String> {
    let output = Command::new("sh")
        .args(["-c", command])
        .stdin(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        debug!(command, code = ?output.status.code(), "environment probe failed");
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Build report metadata including system info and git details
pub fn build_report_meta(mode: Option<BuildMode>, environment: Vec<EnvironmentEntry>) -> ReportMeta {
    let git_commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .stderr(Stdio::null())
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    ReportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        mode: mode.map(|m| m.to_string()),
        git_commit,
        system: SystemInfo::current(),
        environment,
    }
}
