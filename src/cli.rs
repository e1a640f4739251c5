// src/cli.rs

//! CLI definitions for the nbdc2rs conversion pipeline
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nbdc2rs")]
#[command(version)]
#[command(about = "Convert NBDC data dictionaries to ReproSchema JSON-LD", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a single release to ReproSchema
    Convert {
        /// Release version to convert (e.g. 1.0)
        #[arg(short, long)]
        release: String,

        /// Skip the R extraction step (use an existing CSV)
        #[arg(long)]
        skip_extract: bool,

        /// Keep downloaded data and extracted CSV after conversion
        #[arg(long)]
        keep_data: bool,

        /// Skip validating the generated output
        #[arg(long)]
        no_validate: bool,

        /// Path to a config file (default: ./nbdc2rs.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Converter YAML config passed to reproschema
        #[arg(long)]
        yaml: Option<PathBuf>,
    },

    /// Convert all releases that have no git tag yet
    Sync {
        /// Restrict the sync to one release
        #[arg(short, long)]
        release: Option<String>,

        /// Do not commit conversion results
        #[arg(long)]
        no_commit: bool,

        /// Create an annotated git tag per converted release
        #[arg(long)]
        create_tag: bool,

        /// Push commits (and tags) to origin
        #[arg(long)]
        push: bool,

        /// Keep downloaded data and extracted CSVs after conversion
        #[arg(long)]
        keep_data: bool,

        /// Show what would be converted without converting
        #[arg(long)]
        dry_run: bool,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Path to a config file (default: ./nbdc2rs.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List releases in the source data file
    Releases {
        /// Show only releases that are not converted yet
        #[arg(long)]
        pending: bool,

        /// Keep the fetched data file afterwards
        #[arg(long)]
        keep_data: bool,

        /// Path to a config file (default: ./nbdc2rs.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check that the required external tools are installed
    Doctor {
        /// Path to a config file (default: ./nbdc2rs.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}
