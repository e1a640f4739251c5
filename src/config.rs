// src/config.rs

//! Runtime configuration
//!
//! Settings load from a TOML file (`nbdc2rs.toml`) when one exists;
//! otherwise built-in defaults apply. Search order:
//!
//! 1. An explicit `--config` path (must exist)
//! 2. `./nbdc2rs.toml`
//! 3. `<user config dir>/nbdc2rs/config.toml`
//!
//! CLI flags override file values where both exist.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default name of the config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "nbdc2rs.toml";

/// Top-level tool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub paths: PathsConfig,
    pub tools: ToolsConfig,
}

/// Where the source data dictionary lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// GitHub repository in owner/name form
    pub repo: String,
    /// Branch holding the data file
    pub branch: String,
    /// Path of the data file within the repository
    pub data_file: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            repo: "nbdc-datahub/NBDCtoolsData".to_string(),
            branch: "main".to_string(),
            data_file: "data/lst_dds.rda".to_string(),
        }
    }
}

impl SourceConfig {
    /// Raw-content URL for the data file
    pub fn raw_url(&self) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}",
            self.repo, self.branch, self.data_file
        )
    }

    /// Clone URL for the full repository
    pub fn clone_url(&self) -> String {
        format!("https://github.com/{}.git", self.repo)
    }

    /// Directory name a clone produces ("NBDCtoolsData")
    pub fn checkout_dir(&self) -> &str {
        self.repo.rsplit('/').next().unwrap_or(&self.repo)
    }

    /// Basename of the data file ("lst_dds.rda")
    pub fn data_file_name(&self) -> &str {
        self.data_file.rsplit('/').next().unwrap_or(&self.data_file)
    }
}

/// Local paths used by the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory for downloaded data and extracted CSVs
    pub data_dir: PathBuf,
    /// Converter YAML config passed to reproschema
    pub yaml: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            yaml: PathBuf::from("hbcd_nbdc2rs.yaml"),
        }
    }
}

/// External program names/paths and execution limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub git: PathBuf,
    pub rscript: PathBuf,
    pub reproschema: PathBuf,
    /// Timeout applied to R and converter subprocesses, in seconds
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: PathBuf::from("git"),
            rscript: PathBuf::from("Rscript"),
            reproschema: PathBuf::from("reproschema"),
            timeout_secs: 600,
        }
    }
}

impl Config {
    /// Load configuration, applying the search order described above
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::NotFound(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        let local = Path::new(CONFIG_FILE_NAME);
        if local.exists() {
            return Self::from_file(local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user = config_dir.join("nbdc2rs").join("config.toml");
            if user.exists() {
                return Self::from_file(&user);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.source.repo, "nbdc-datahub/NBDCtoolsData");
        assert_eq!(config.source.checkout_dir(), "NBDCtoolsData");
        assert_eq!(config.source.data_file_name(), "lst_dds.rda");
        assert_eq!(config.paths.data_dir, PathBuf::from("data"));
        assert_eq!(config.tools.timeout_secs, 600);
    }

    #[test]
    fn test_raw_url() {
        let config = Config::default();
        assert_eq!(
            config.source.raw_url(),
            "https://raw.githubusercontent.com/nbdc-datahub/NBDCtoolsData/main/data/lst_dds.rda"
        );
        assert_eq!(
            config.source.clone_url(),
            "https://github.com/nbdc-datahub/NBDCtoolsData.git"
        );
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let temp = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        std::fs::write(
            temp.path(),
            r#"
[source]
branch = "develop"

[tools]
timeout_secs = 30
"#,
        )
        .unwrap();

        let config = Config::from_file(temp.path()).unwrap();
        assert_eq!(config.source.branch, "develop");
        // Unset fields keep their defaults
        assert_eq!(config.source.repo, "nbdc-datahub/NBDCtoolsData");
        assert_eq!(config.tools.timeout_secs, 30);
        assert_eq!(config.tools.rscript, PathBuf::from("Rscript"));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        std::fs::write(temp.path(), "this is not toml [").unwrap();
        assert!(matches!(
            Config::from_file(temp.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_explicit_missing_path_errors() {
        let result = Config::load(Some(Path::new("/nonexistent/nbdc2rs.toml")));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
