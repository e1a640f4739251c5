// src/commands/doctor.rs

//! Prerequisite check for the external tools the pipeline invokes

use super::Prerequisites;
use crate::config::Config;
use anyhow::Result;
use std::path::Path;

/// Report presence and versions of git, Rscript, and reproschema
pub fn cmd_doctor(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let prereqs = Prerequisites::check(&config.tools);

    println!("External tools:");
    print_tool("git", &config.tools.git, prereqs.git.as_deref());
    print_tool("Rscript", &config.tools.rscript, prereqs.rscript.as_deref());
    print_tool(
        "reproschema",
        &config.tools.reproschema,
        prereqs.reproschema.as_deref(),
    );

    let missing = prereqs.missing();
    if missing.is_empty() {
        println!("All prerequisites satisfied");
        Ok(())
    } else {
        anyhow::bail!("missing prerequisites: {}", missing.join(", "))
    }
}

fn print_tool(name: &str, program: &Path, version: Option<&str>) {
    match version {
        Some(version) => {
            let resolved = which::which(program)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| program.display().to_string());
            println!("  [x] {:<12} {} ({})", name, version, resolved);
        }
        None => {
            println!("  [ ] {:<12} not found ({})", name, program.display());
        }
    }
}
