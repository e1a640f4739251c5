// src/reproschema/mod.rs

//! ReproSchema conversion and validation via the `reproschema` CLI
//!
//! The converter writes a directory named after the YAML config's
//! `protocol_name` under the requested output path; staging renames it to
//! `<PROTOCOL>2reproschema` so the repository layout stays flat. Validation
//! runs the same CLI and is deliberately non-fatal: schema warnings are
//! reported, never block a conversion.

pub mod protocol;

use crate::config::ToolsConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::{debug, info, warn};
use wait_timeout::ChildExt;
use walkdir::WalkDir;

/// Result of staging a conversion
#[derive(Debug)]
pub struct ConvertOutcome {
    /// Final output directory (`<PROTOCOL>2reproschema`)
    pub output_dir: PathBuf,
    /// Protocol name the converter used
    pub protocol: String,
}

/// Result of running the validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Passed,
    /// Validator exited non-zero; carries its combined output
    Warnings(String),
    /// Validator could not run at all (e.g. binary missing)
    Skipped(String),
}

impl ValidationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Warnings(_) => "warnings",
            Self::Skipped(_) => "skipped",
        }
    }
}

/// Counts of generated schema files, for logging and run reports
#[derive(Debug, Default, Clone, Copy)]
pub struct OutputSummary {
    pub total_files: usize,
    pub schemas: usize,
    pub items: usize,
}

/// Wrapper around the `reproschema` command-line converter
pub struct SchemaTool {
    program: PathBuf,
    timeout: Duration,
}

impl SchemaTool {
    /// Create a tool from configuration
    pub fn new(tools: &ToolsConfig) -> Self {
        Self {
            program: tools.reproschema.clone(),
            timeout: Duration::from_secs(tools.timeout_secs),
        }
    }

    /// Create a tool with an explicit program path
    pub fn with_program<P: Into<PathBuf>>(program: P, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Convert a CSV data dictionary to a ReproSchema directory tree
    ///
    /// Runs `reproschema nbdc2reproschema --output-path <root> <csv> <yaml>`,
    /// then renames the generated `<root>/<protocol>` directory to
    /// `<root>/<PROTOCOL>2reproschema`. Stale output directories from earlier
    /// runs are removed first to avoid conflicts.
    pub fn convert(&self, csv: &Path, yaml: &Path, root: &Path) -> Result<ConvertOutcome> {
        let protocol = protocol::protocol_name(yaml)?;
        let generated_dir = root.join(&protocol);
        let final_dir = root.join(format!("{}2reproschema", protocol));

        if final_dir.exists() {
            debug!("Removing stale output {}", final_dir.display());
            fs::remove_dir_all(&final_dir)?;
        }
        if generated_dir.exists() {
            debug!("Removing stale output {}", generated_dir.display());
            fs::remove_dir_all(&generated_dir)?;
        }

        info!("Converting {} to ReproSchema format...", csv.display());
        self.run(&[
            "nbdc2reproschema".as_ref(),
            "--output-path".as_ref(),
            root.as_os_str(),
            csv.as_os_str(),
            yaml.as_os_str(),
        ])?;

        if !generated_dir.exists() {
            return Err(Error::Convert(format!(
                "expected output directory {} not found",
                generated_dir.display()
            )));
        }

        fs::rename(&generated_dir, &final_dir)?;
        info!("Conversion complete. Output in {}/", final_dir.display());

        Ok(ConvertOutcome {
            output_dir: final_dir,
            protocol,
        })
    }

    /// Validate a ReproSchema output directory
    ///
    /// Non-fatal: a failing validator is reported as warnings, and an
    /// unrunnable validator is reported as skipped.
    pub fn validate(&self, dir: &Path) -> ValidationOutcome {
        info!("Validating ReproSchema output...");
        match self.run(&["validate".as_ref(), dir.as_os_str()]) {
            Ok(_) => {
                info!("Validation passed");
                ValidationOutcome::Passed
            }
            Err(Error::Convert(msg)) => {
                warn!("Validation warnings/errors:\n{}", msg);
                ValidationOutcome::Warnings(msg)
            }
            Err(e) => {
                warn!("Could not run validation: {}", e);
                ValidationOutcome::Skipped(e.to_string())
            }
        }
    }

    /// Run the reproschema CLI with captured output and a timeout
    fn run(&self, args: &[&std::ffi::OsStr]) -> Result<String> {
        debug!("Executing {} {:?}", self.program.display(), args);

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::NotFound(format!(
                        "{} command not found. Please install reproschema-py.",
                        self.program.display()
                    ))
                } else {
                    Error::Convert(format!(
                        "failed to spawn {}: {}",
                        self.program.display(),
                        e
                    ))
                }
            })?;

        match child.wait_timeout(self.timeout)? {
            Some(status) => {
                let output = child.wait_with_output()?;
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr);

                for line in stdout.lines() {
                    debug!("[reproschema] {}", line);
                }

                if status.success() {
                    Ok(stdout)
                } else {
                    let code = status.code().unwrap_or(-1);
                    Err(Error::Convert(format!(
                        "reproschema exited with code {}: {}\n{}",
                        code,
                        stderr.trim(),
                        stdout.trim()
                    )))
                }
            }
            None => {
                let _ = child.kill();
                Err(Error::Timeout {
                    tool: "reproschema".to_string(),
                    secs: self.timeout.as_secs(),
                })
            }
        }
    }
}

/// Count generated files in an output directory
pub fn summarize(dir: &Path) -> OutputSummary {
    let mut summary = OutputSummary::default();
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        summary.total_files += 1;
        let name = entry.file_name().to_string_lossy();
        if name.contains("schema") {
            summary.schemas += 1;
        }
        if entry
            .path()
            .components()
            .any(|c| c.as_os_str() == "items")
        {
            summary.items += 1;
        }
    }
    summary
}
