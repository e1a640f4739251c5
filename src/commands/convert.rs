// src/commands/convert.rs

//! Single-release conversion command

use super::{convert_release, CleanupGuard, Prerequisites};
use crate::config::Config;
use crate::outputs::{self, RunStatus};
use crate::release::Release;
use crate::reproschema::{ConvertOutcome, SchemaTool, ValidationOutcome};
use crate::rscript::RScript;
use crate::source;
use crate::vcs::GitClient;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Convert one release end to end
#[allow(clippy::too_many_arguments)]
pub fn cmd_convert(
    release: &str,
    skip_extract: bool,
    keep_data: bool,
    no_validate: bool,
    config_path: Option<&Path>,
    yaml: Option<PathBuf>,
) -> Result<()> {
    let mut config = Config::load(config_path)?;
    if let Some(yaml) = yaml {
        config.paths.yaml = yaml;
    }
    let release = Release::parse(release)?;

    let prereqs = Prerequisites::check(&config.tools);
    prereqs.require(false, !skip_extract)?;

    info!("Converting release {}", release);
    let mut guard = CleanupGuard::new(keep_data);
    let result = run_convert(&config, &release, skip_extract, no_validate, &mut guard);

    let status = if result.is_ok() {
        RunStatus::Complete
    } else {
        RunStatus::Failed
    };
    outputs::report_status(Some(&release), status)?;

    let (outcome, validation) = result?;
    if let ValidationOutcome::Skipped(reason) = &validation {
        info!("Validation skipped: {}", reason);
    }
    println!("Done! Output in {}/", outcome.output_dir.display());
    Ok(())
}

fn run_convert(
    config: &Config,
    release: &Release,
    skip_extract: bool,
    no_validate: bool,
    guard: &mut CleanupGuard,
) -> Result<(ConvertOutcome, ValidationOutcome)> {
    // With --skip-extract the CSV already exists, so the source file is
    // not needed at all.
    let source_data = if skip_extract {
        None
    } else {
        let git = GitClient::new(&config.tools, Path::new("."));
        let data = source::fetch(config, &git, false)?;
        guard.track_all(data.created_paths());
        Some(data)
    };

    let rscript = RScript::new(&config.tools);
    let schema = SchemaTool::new(&config.tools);

    let result = convert_release(
        config,
        &rscript,
        &schema,
        source_data.as_ref().map(|d| d.rda_path.as_path()),
        release,
        skip_extract,
        !no_validate,
        guard,
    )?;
    Ok(result)
}
