// src/commands/mod.rs

//! Command handlers for the nbdc2rs CLI
//!
//! Shared pieces live here: external-tool preflight, the end-of-run cleanup
//! guard, and the per-release conversion pipeline both `convert` and `sync`
//! drive.

mod convert;
mod doctor;
mod releases;
mod sync;

pub use convert::cmd_convert;
pub use doctor::cmd_doctor;
pub use releases::cmd_releases;
pub use sync::{cmd_sync, SyncOptions};

use crate::config::{Config, ToolsConfig};
use crate::error::{Error, Result};
use crate::release::Release;
use crate::reproschema::{self, ConvertOutcome, SchemaTool, ValidationOutcome};
use crate::rscript::RScript;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Presence and versions of the external tools the pipeline invokes
#[derive(Debug)]
pub struct Prerequisites {
    pub git: Option<String>,
    pub rscript: Option<String>,
    pub reproschema: Option<String>,
}

impl Prerequisites {
    /// Probe each configured tool
    pub fn check(tools: &ToolsConfig) -> Self {
        Self {
            git: find_version(&tools.git, &["--version"]),
            rscript: find_version(&tools.rscript, &["--version"]),
            reproschema: find_version(&tools.reproschema, &["--version"]),
        }
    }

    /// Names and install hints of missing tools
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.git.is_none() {
            missing.push("git");
        }
        if self.rscript.is_none() {
            missing.push("Rscript (install R)");
        }
        if self.reproschema.is_none() {
            missing.push("reproschema (pip install reproschema)");
        }
        missing
    }

    /// Fail fast when tools a command depends on are absent
    pub fn require(&self, need_git: bool, need_r: bool) -> anyhow::Result<()> {
        let mut missing = Vec::new();
        if need_git && self.git.is_none() {
            missing.push("git");
        }
        if need_r && self.rscript.is_none() {
            missing.push("Rscript (install R)");
        }
        if self.reproschema.is_none() {
            missing.push("reproschema (pip install reproschema)");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("missing required tools: {}", missing.join(", "))
        }
    }
}

/// Run a command with args and return the first line of its version output
///
/// Some tools (older R front-ends) print version banners to stderr, so
/// stderr is consulted when stdout is empty.
fn find_version(cmd: &Path, args: &[&str]) -> Option<String> {
    std::process::Command::new(cmd)
        .args(args)
        .output()
        .ok()
        .and_then(|o| {
            if !o.status.success() {
                return None;
            }
            let stdout = String::from_utf8_lossy(&o.stdout);
            let stderr = String::from_utf8_lossy(&o.stderr);
            stdout
                .lines()
                .next()
                .filter(|l| !l.trim().is_empty())
                .or_else(|| stderr.lines().next())
                .map(|l| l.trim().to_string())
        })
}

/// Removes files a run created unless retention was requested
///
/// Dropped on every exit path, so downloads, checkouts, and extracted CSVs
/// are cleaned up on failure as well as success.
pub struct CleanupGuard {
    paths: Vec<PathBuf>,
    keep: bool,
}

impl CleanupGuard {
    pub fn new(keep: bool) -> Self {
        Self {
            paths: Vec::new(),
            keep,
        }
    }

    /// Record a path for end-of-run removal
    pub fn track(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn track_all(&mut self, paths: &[PathBuf]) {
        self.paths.extend_from_slice(paths);
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if self.keep {
            if !self.paths.is_empty() {
                debug!("Keeping {} temporary path(s)", self.paths.len());
            }
            return;
        }
        for path in &self.paths {
            if path.is_dir() {
                info!("Cleaning up {}", path.display());
                if let Err(e) = std::fs::remove_dir_all(path) {
                    warn!("Failed to remove {}: {}", path.display(), e);
                }
            } else if path.exists() {
                info!("Removing temporary file {}", path.display());
                if let Err(e) = std::fs::remove_file(path) {
                    warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }
    }
}

/// Run the extract + convert + validate pipeline for one release
///
/// `rda` may be None only when `skip_extract` is set; the CSV must then
/// already exist from a previous run.
#[allow(clippy::too_many_arguments)]
pub(crate) fn convert_release(
    config: &Config,
    rscript: &RScript,
    schema: &SchemaTool,
    rda: Option<&Path>,
    release: &Release,
    skip_extract: bool,
    validate: bool,
    guard: &mut CleanupGuard,
) -> Result<(ConvertOutcome, ValidationOutcome)> {
    let csv = config
        .paths
        .data_dir
        .join(format!("hbcd_{}.csv", release.as_str()));

    if skip_extract {
        if !csv.exists() {
            return Err(Error::NotFound(format!(
                "--skip-extract requires an existing CSV at {}",
                csv.display()
            )));
        }
        info!("Skipping extraction, using existing {}", csv.display());
    } else {
        let rda = rda.ok_or_else(|| Error::NotFound("no source data file".to_string()))?;
        rscript.extract_release(rda, release, &csv)?;
        guard.track(csv.clone());
    }

    let outcome = schema.convert(&csv, &config.paths.yaml, Path::new("."))?;

    let validation = if validate {
        schema.validate(&outcome.output_dir)
    } else {
        ValidationOutcome::Skipped("validation disabled".to_string())
    };
    if let ValidationOutcome::Warnings(msg) = &validation {
        println!("Validation warnings/errors:\n{}", msg);
    }

    let summary = reproschema::summarize(&outcome.output_dir);
    println!(
        "Converted release {}: {} files ({} schemas, {} items) in {}/",
        release,
        summary.total_files,
        summary.schemas,
        summary.items,
        outcome.output_dir.display()
    );

    Ok((outcome, validation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_guard_removes_tracked_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hbcd_1.0.csv");
        std::fs::write(&file, "a,b\n").unwrap();

        {
            let mut guard = CleanupGuard::new(false);
            guard.track(file.clone());
        }
        assert!(!file.exists());
    }

    #[test]
    fn test_cleanup_guard_removes_tracked_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let checkout = dir.path().join("NBDCtoolsData");
        std::fs::create_dir_all(checkout.join("data")).unwrap();

        {
            let mut guard = CleanupGuard::new(false);
            guard.track(checkout.clone());
        }
        assert!(!checkout.exists());
    }

    #[test]
    fn test_cleanup_guard_honors_keep() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lst_dds.rda");
        std::fs::write(&file, "rda").unwrap();

        {
            let mut guard = CleanupGuard::new(true);
            guard.track(file.clone());
        }
        assert!(file.exists());
    }

    #[test]
    fn test_cleanup_guard_leaves_untracked_files() {
        let dir = tempfile::tempdir().unwrap();
        let tracked = dir.path().join("tracked.csv");
        let untracked = dir.path().join("pre_existing.csv");
        std::fs::write(&tracked, "x").unwrap();
        std::fs::write(&untracked, "y").unwrap();

        {
            let mut guard = CleanupGuard::new(false);
            guard.track(tracked.clone());
        }
        assert!(!tracked.exists());
        assert!(untracked.exists());
    }
}
