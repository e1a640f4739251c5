// src/commands/releases.rs

//! List releases in the source data file

use super::{CleanupGuard, Prerequisites};
use crate::config::Config;
use crate::release;
use crate::rscript::RScript;
use crate::source;
use crate::vcs::GitClient;
use anyhow::Result;
use std::path::Path;

/// Print available releases, marking converted ones
pub fn cmd_releases(pending_only: bool, keep_data: bool, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    let prereqs = Prerequisites::check(&config.tools);
    if prereqs.rscript.is_none() {
        anyhow::bail!("missing required tools: Rscript (install R)");
    }

    let git = GitClient::new(&config.tools, Path::new("."));
    let mut guard = CleanupGuard::new(keep_data);

    let source_data = source::fetch(&config, &git, false)?;
    guard.track_all(source_data.created_paths());

    let rscript = RScript::new(&config.tools);
    let mut available = rscript.list_releases(&source_data.rda_path)?;
    available.sort();
    available.dedup();
    let converted = git.release_tags()?;

    if pending_only {
        for rel in release::pending(&available, &converted) {
            println!("{}", rel);
        }
        return Ok(());
    }

    println!("Releases in {}:", source_data.rda_path.display());
    for rel in &available {
        let mark = if converted.contains(rel) { "[x]" } else { "[ ]" };
        println!("  {} {}", mark, rel);
    }
    let pending = release::pending(&available, &converted);
    if pending.is_empty() {
        println!("All releases converted");
    } else {
        println!(
            "{} release(s) pending conversion (run 'nbdc2rs sync')",
            pending.len()
        );
    }
    Ok(())
}
