// src/vcs/mod.rs

//! Git operations via the `git` binary
//!
//! Conversion results are committed, tagged, and pushed with plain git
//! invocations; exit codes decide success and captured stderr is surfaced
//! in errors. Tag names double as the record of which releases are already
//! converted.

use crate::config::ToolsConfig;
use crate::error::{Error, Result};
use crate::release::Release;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Wrapper around the git binary, bound to a working directory
pub struct GitClient {
    program: PathBuf,
    workdir: PathBuf,
}

impl GitClient {
    /// Create a client from tool configuration
    pub fn new(tools: &ToolsConfig, workdir: &Path) -> Self {
        Self {
            program: tools.git.clone(),
            workdir: workdir.to_path_buf(),
        }
    }

    /// Create a client with an explicit git path
    pub fn with_program<P: Into<PathBuf>>(program: P, workdir: &Path) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.to_path_buf(),
        }
    }

    /// Run git with the given arguments, returning stdout on success
    fn run(&self, args: &[&str]) -> Result<String> {
        debug!("Running git {:?} in {}", args, self.workdir.display());

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::Git(format!("{} not found. Is git installed?", self.program.display()))
                } else {
                    Error::Git(format!("failed to run {}: {}", self.program.display(), e))
                }
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let code = output.status.code().unwrap_or(-1);
            Err(Error::Git(format!(
                "git {} exited with code {}: {}",
                args.first().copied().unwrap_or(""),
                code,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    /// Whether the working directory is inside a git repository
    pub fn is_repo(&self) -> bool {
        self.run(&["rev-parse", "--is-inside-work-tree"])
            .map(|out| out.trim() == "true")
            .unwrap_or(false)
    }

    /// Release tags present in the repository
    ///
    /// Non-release tags are ignored. A missing repository yields an empty
    /// set: on a first run there is simply nothing converted yet.
    pub fn release_tags(&self) -> Result<BTreeSet<Release>> {
        if !self.is_repo() {
            debug!("Not a git repository, treating as no converted releases");
            return Ok(BTreeSet::new());
        }

        let stdout = self.run(&["tag", "--list", "v*"])?;
        Ok(stdout.lines().filter_map(Release::from_tag).collect())
    }

    /// Whether a path has uncommitted changes (including untracked files)
    pub fn has_changes(&self, path: &Path) -> Result<bool> {
        let stdout = self.run(&["status", "--porcelain", "--", &path.to_string_lossy()])?;
        Ok(!stdout.trim().is_empty())
    }

    /// Stage a path
    pub fn add(&self, path: &Path) -> Result<()> {
        self.run(&["add", "--", &path.to_string_lossy()])?;
        Ok(())
    }

    /// Create a commit with the given message
    pub fn commit(&self, message: &str) -> Result<()> {
        info!("Committing: {}", message);
        self.run(&["commit", "-m", message])?;
        Ok(())
    }

    /// Create an annotated tag
    pub fn tag_annotated(&self, tag: &str, message: &str) -> Result<()> {
        info!("Creating tag {}", tag);
        self.run(&["tag", "-a", tag, "-m", message])?;
        Ok(())
    }

    /// Push the current branch, optionally with tags
    pub fn push(&self, include_tags: bool) -> Result<()> {
        info!("Pushing to origin...");
        self.run(&["push"])?;
        if include_tags {
            self.run(&["push", "--tags"])?;
        }
        Ok(())
    }

    /// Shallow-clone a repository into the working directory
    pub fn clone_shallow(&self, url: &str) -> Result<()> {
        self.run(&["clone", "--depth", "1", url])?;
        Ok(())
    }
}
