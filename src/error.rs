// src/error.rs

//! Error types for the conversion pipeline

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the pipeline library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP download failed
    #[error("Download failed: {0}")]
    Download(String),

    /// R invocation failed
    #[error("R extraction failed: {0}")]
    RScript(String),

    /// reproschema converter failed
    #[error("Conversion failed: {0}")]
    Convert(String),

    /// git invocation failed
    #[error("git operation failed: {0}")]
    Git(String),

    /// A required file or directory is missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Release string did not parse
    #[error("Invalid release '{0}': expected dotted numeric form like 1.0")]
    InvalidRelease(String),

    /// External tool exceeded its execution timeout
    #[error("{tool} timed out after {secs} seconds")]
    Timeout { tool: String, secs: u64 },
}
