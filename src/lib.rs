// src/lib.rs

//! nbdc2rs: NBDC data-dictionary to ReproSchema conversion pipeline
//!
//! Orchestrates three external programs around a linear pipeline:
//!
//! - fetch the serialized data dictionary (`lst_dds.rda`) from the
//!   NBDCtoolsData repository (cache, raw download, or shallow clone)
//! - extract a per-release CSV with `Rscript`
//! - convert the CSV to a ReproSchema JSON-LD tree with
//!   `reproschema nbdc2reproschema` and validate the result
//! - optionally commit, tag, and push the output with `git`
//!
//! The substantive transformations live in R and reproschema-py; this
//! crate owns configuration, subprocess control, output parsing, file
//! staging and cleanup, release bookkeeping, and CI reporting.

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod hash;
pub mod outputs;
pub mod release;
pub mod reproschema;
pub mod rscript;
pub mod source;
pub mod vcs;

pub use config::{Config, PathsConfig, SourceConfig, ToolsConfig};
pub use error::{Error, Result};
pub use outputs::{RunReport, RunStatus};
pub use release::{pending, Release};
pub use reproschema::{ConvertOutcome, SchemaTool, ValidationOutcome};
pub use rscript::RScript;
pub use source::{SourceData, SourceOrigin};
pub use vcs::GitClient;
