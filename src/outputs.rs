// src/outputs.rs

//! CI reporting: GITHUB_OUTPUT key=value lines and JSON run reports

use crate::error::{Error, Result};
use crate::release::Release;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumString};
use tracing::debug;

/// Overall outcome of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RunStatus {
    Complete,
    Failed,
}

/// Append a key=value line to the workflow output file named by
/// `GITHUB_OUTPUT`
///
/// A no-op outside GitHub Actions (the variable is unset).
pub fn github_output(key: &str, value: &str) -> Result<()> {
    match env::var_os("GITHUB_OUTPUT") {
        Some(path) => append_output(Path::new(&path), key, value),
        None => {
            debug!("GITHUB_OUTPUT not set, skipping output {}={}", key, value);
            Ok(())
        }
    }
}

/// Append a key=value line to an output file, creating it if needed
///
/// Appends rather than truncates: earlier workflow steps may already have
/// written outputs to the same file.
pub fn append_output(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}={}", key, value)?;
    Ok(())
}

/// Per-release outcome recorded in the run report
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseReport {
    pub release: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub validation: String,
}

/// Machine-readable summary of a sync run, written with `--report`
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_digest: Option<String>,
    pub releases: Vec<ReleaseReport>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            status: RunStatus::Failed.to_string(),
            source_digest: None,
            releases: Vec::new(),
        }
    }

    pub fn set_source_digest(&mut self, digest: &str) {
        self.source_digest = Some(digest.to_string());
    }

    pub fn push(&mut self, entry: ReleaseReport) {
        self.releases.push(entry);
    }

    pub fn finish(&mut self, status: RunStatus) {
        self.status = status.to_string();
        self.finished_at = Some(Utc::now());
    }

    /// Write the report as pretty-printed JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize run report: {}", e)))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Report the final version/status pair to GitHub Actions
pub fn report_status(version: Option<&Release>, status: RunStatus) -> Result<()> {
    if let Some(release) = version {
        github_output("version", release.as_str())?;
    }
    github_output("status", &status.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_strings() {
        assert_eq!(RunStatus::Complete.to_string(), "complete");
        assert_eq!(RunStatus::Failed.to_string(), "failed");
        assert_eq!(RunStatus::from_str("complete").unwrap(), RunStatus::Complete);
    }

    #[test]
    fn test_append_output_appends_not_truncates() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        append_output(temp.path(), "version", "1.0").unwrap();
        append_output(temp.path(), "status", "complete").unwrap();

        let content = std::fs::read_to_string(temp.path()).unwrap();
        assert_eq!(content, "version=1.0\nstatus=complete\n");
    }

    #[test]
    fn test_append_output_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outputs");
        append_output(&path, "status", "failed").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "status=failed\n");
    }

    #[test]
    fn test_run_report_serialization() {
        let mut report = RunReport::new();
        report.set_source_digest("abc123");
        report.push(ReleaseReport {
            release: "1.0".to_string(),
            status: "complete".to_string(),
            output_dir: Some(PathBuf::from("HBCD2reproschema")),
            validation: "passed".to_string(),
        });
        report.finish(RunStatus::Complete);

        let temp = tempfile::NamedTempFile::new().unwrap();
        report.write(temp.path()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(temp.path()).unwrap()).unwrap();
        assert_eq!(json["status"], "complete");
        assert_eq!(json["source_digest"], "abc123");
        assert_eq!(json["releases"][0]["release"], "1.0");
    }
}
