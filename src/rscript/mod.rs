// src/rscript/mod.rs

//! R subprocess driver for `.rda` inspection and CSV extraction
//!
//! The data dictionary is an R-serialized list keyed by release name, so
//! listing releases and materializing one as CSV both require R. The two
//! R programs are embedded here as constants, written to a temp file per
//! invocation, and executed with stdin nulled, output captured, and a
//! kill-on-expiry timeout.
//!
//! Protocol: the listing program prints a single `ALL_VERSIONS:` line with
//! whitespace-separated release names. Anything else on stdout is ignored.

use crate::config::ToolsConfig;
use crate::error::{Error, Result};
use crate::release::Release;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, info};
use wait_timeout::ChildExt;

/// Marker line prefix emitted by the listing program
const VERSIONS_MARKER: &str = "ALL_VERSIONS:";

/// R program: print the release names contained in an .rda file
///
/// argv: <rda-path>
const LIST_RELEASES_PROGRAM: &str = r#"
args <- commandArgs(trailingOnly = TRUE)
env <- new.env()
load(args[[1]], envir = env)
dds <- get(ls(env)[[1]], envir = env)
cat("ALL_VERSIONS:", names(dds), "\n")
"#;

/// R program: write one release of the dictionary as CSV
///
/// argv: <rda-path> <release> <csv-path>
const EXTRACT_RELEASE_PROGRAM: &str = r#"
args <- commandArgs(trailingOnly = TRUE)
env <- new.env()
load(args[[1]], envir = env)
dds <- get(ls(env)[[1]], envir = env)
release <- args[[2]]
if (!(release %in% names(dds))) {
  stop(sprintf("release '%s' not present in %s", release, args[[1]]))
}
write.csv(dds[[release]], args[[3]], row.names = FALSE)
"#;

/// Runner for the Rscript interpreter
pub struct RScript {
    program: PathBuf,
    timeout: Duration,
}

impl RScript {
    /// Create a runner from tool configuration
    pub fn new(tools: &ToolsConfig) -> Self {
        Self {
            program: tools.rscript.clone(),
            timeout: Duration::from_secs(tools.timeout_secs),
        }
    }

    /// Create a runner with an explicit interpreter path
    pub fn with_program<P: Into<PathBuf>>(program: P, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// List the releases present in an .rda file
    pub fn list_releases(&self, rda: &Path) -> Result<Vec<Release>> {
        info!("Listing releases in {}", rda.display());
        let stdout = self.run_program(LIST_RELEASES_PROGRAM, &[rda.as_os_str().to_os_string()])?;
        let releases = parse_versions(&stdout)?;
        info!(
            "Found {} release(s): {}",
            releases.len(),
            releases
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(releases)
    }

    /// Extract one release of the dictionary to a CSV file
    pub fn extract_release(&self, rda: &Path, release: &Release, csv: &Path) -> Result<()> {
        info!("Extracting release {} to {}", release, csv.display());
        if let Some(parent) = csv.parent() {
            fs::create_dir_all(parent)?;
        }
        self.run_program(
            EXTRACT_RELEASE_PROGRAM,
            &[
                rda.as_os_str().to_os_string(),
                release.as_str().into(),
                csv.as_os_str().to_os_string(),
            ],
        )?;
        if !csv.exists() {
            return Err(Error::RScript(format!(
                "R exited successfully but {} was not written",
                csv.display()
            )));
        }
        Ok(())
    }

    /// Write an R program to a temp file and execute it, returning stdout
    fn run_program(&self, source: &str, args: &[std::ffi::OsString]) -> Result<String> {
        let temp_dir = TempDir::new()?;
        let script_path = temp_dir.path().join("program.R");
        fs::write(&script_path, source)?;

        debug!(
            "Executing {} {} {:?}",
            self.program.display(),
            script_path.display(),
            args
        );

        let mut child = Command::new(&self.program)
            .arg(&script_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::RScript(format!(
                        "{} not found. Is R installed?",
                        self.program.display()
                    ))
                } else {
                    Error::RScript(format!("failed to spawn {}: {}", self.program.display(), e))
                }
            })?;

        match child.wait_timeout(self.timeout)? {
            Some(status) => {
                let output = child.wait_with_output()?;
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr);

                for line in stdout.lines() {
                    debug!("[R] {}", line);
                }

                if status.success() {
                    Ok(stdout)
                } else {
                    let code = status.code().unwrap_or(-1);
                    Err(Error::RScript(format!(
                        "Rscript exited with code {}: {}",
                        code,
                        stderr.trim()
                    )))
                }
            }
            None => {
                let _ = child.kill();
                Err(Error::Timeout {
                    tool: "Rscript".to_string(),
                    secs: self.timeout.as_secs(),
                })
            }
        }
    }
}

/// Parse release names from the listing program's stdout
///
/// The marker line may appear anywhere in the output (R sessions can print
/// startup noise first). Missing marker and empty lists are errors.
pub fn parse_versions(stdout: &str) -> Result<Vec<Release>> {
    let line = stdout
        .lines()
        .find_map(|l| l.trim().strip_prefix(VERSIONS_MARKER))
        .ok_or_else(|| {
            Error::RScript(format!(
                "R output did not contain an {} line",
                VERSIONS_MARKER
            ))
        })?;

    let releases = line
        .split_whitespace()
        .map(Release::parse)
        .collect::<Result<Vec<_>>>()?;

    if releases.is_empty() {
        return Err(Error::RScript(
            "no releases found in the data file".to_string(),
        ));
    }

    Ok(releases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versions() {
        let releases = parse_versions("ALL_VERSIONS: 1.0 2.0 \n").unwrap();
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].as_str(), "1.0");
        assert_eq!(releases[1].as_str(), "2.0");
    }

    #[test]
    fn test_parse_versions_skips_leading_noise() {
        let stdout = "Loading required package: methods\nALL_VERSIONS: 1.0\n";
        let releases = parse_versions(stdout).unwrap();
        assert_eq!(releases.len(), 1);
    }

    #[test]
    fn test_parse_versions_missing_marker() {
        let err = parse_versions("no marker here\n").unwrap_err();
        assert!(err.to_string().contains("ALL_VERSIONS"));
    }

    #[test]
    fn test_parse_versions_empty_list() {
        assert!(parse_versions("ALL_VERSIONS: \n").is_err());
    }

    #[test]
    fn test_parse_versions_invalid_token() {
        assert!(parse_versions("ALL_VERSIONS: 1.0 not-a-release\n").is_err());
    }
}
