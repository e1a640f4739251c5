// src/commands/sync.rs

//! Tag-driven sync: convert every release that has no git tag yet

use super::{convert_release, CleanupGuard, Prerequisites};
use crate::config::Config;
use crate::outputs::{self, ReleaseReport, RunReport, RunStatus};
use crate::release::{self, Release};
use crate::reproschema::SchemaTool;
use crate::rscript::RScript;
use crate::source;
use crate::vcs::GitClient;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Options for the sync command
#[derive(Debug, Default)]
pub struct SyncOptions {
    pub release: Option<String>,
    pub no_commit: bool,
    pub create_tag: bool,
    pub push: bool,
    pub keep_data: bool,
    pub dry_run: bool,
    pub report: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Resolve pending releases and convert each
pub fn cmd_sync(opts: SyncOptions) -> Result<()> {
    let config = Config::load(opts.config.as_deref())?;

    let prereqs = Prerequisites::check(&config.tools);
    prereqs.require(true, true)?;

    let git = GitClient::new(&config.tools, Path::new("."));
    let mut report = RunReport::new();
    let mut guard = CleanupGuard::new(opts.keep_data);

    let result = run_sync(&config, &git, &opts, &mut report, &mut guard);

    let (status, last) = match &result {
        Ok(last) => (RunStatus::Complete, last.clone()),
        Err(_) => (RunStatus::Failed, None),
    };
    report.finish(status);
    outputs::report_status(last.as_ref(), status)?;

    if let Some(path) = &opts.report {
        report.write(path)?;
        info!("Run report written to {}", path.display());
    }

    result.map(|_| ())
}

/// The sync pipeline proper; returns the last converted release
fn run_sync(
    config: &Config,
    git: &GitClient,
    opts: &SyncOptions,
    report: &mut RunReport,
    guard: &mut CleanupGuard,
) -> Result<Option<Release>> {
    // Always refresh: sync exists to pick up new upstream releases.
    let source_data = source::fetch(config, git, true)?;
    guard.track_all(source_data.created_paths());
    report.set_source_digest(&source_data.digest);

    let rscript = RScript::new(&config.tools);
    let available = match &opts.release {
        Some(r) => vec![Release::parse(r)?],
        None => rscript.list_releases(&source_data.rda_path)?,
    };
    let converted = git.release_tags()?;
    let plan = release::pending(&available, &converted);

    if plan.is_empty() {
        println!(
            "Nothing to convert: all {} release(s) are tagged",
            available.len()
        );
        return Ok(None);
    }

    println!("Pending release(s):");
    for rel in &plan {
        println!("  {} -> tag {}", rel, rel.tag());
    }
    if opts.dry_run {
        println!("Dry run, stopping before conversion");
        return Ok(None);
    }

    let commit_enabled = if opts.no_commit {
        false
    } else if git.is_repo() {
        true
    } else {
        warn!("Not inside a git repository, skipping commit/tag steps");
        false
    };

    let schema = SchemaTool::new(&config.tools);
    let mut last = None;

    for rel in &plan {
        let (outcome, validation) = match convert_release(
            config,
            &rscript,
            &schema,
            Some(&source_data.rda_path),
            rel,
            false,
            true,
            guard,
        ) {
            Ok(result) => result,
            Err(e) => {
                report.push(ReleaseReport {
                    release: rel.to_string(),
                    status: RunStatus::Failed.to_string(),
                    output_dir: None,
                    validation: "skipped".to_string(),
                });
                return Err(e.into());
            }
        };

        report.push(ReleaseReport {
            release: rel.to_string(),
            status: RunStatus::Complete.to_string(),
            output_dir: Some(outcome.output_dir.clone()),
            validation: validation.as_str().to_string(),
        });

        if commit_enabled {
            git.add(&outcome.output_dir)?;
            if git.has_changes(&outcome.output_dir)? {
                git.commit(&format!("Convert {} release {}", outcome.protocol, rel))?;
            } else {
                info!("Release {} produced no changes, skipping commit", rel);
            }
            if opts.create_tag {
                git.tag_annotated(&rel.tag(), &format!("{} Release {}", outcome.protocol, rel))?;
            }
        }

        last = Some(rel.clone());
    }

    if commit_enabled && opts.push {
        git.push(opts.create_tag)?;
    }

    Ok(last)
}
