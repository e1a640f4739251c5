// src/source/mod.rs

//! Source data acquisition
//!
//! Obtains the data-dictionary file (`lst_dds.rda`) from the configured
//! repository. Resolution order:
//!
//! 1. Local cache: an existing checkout or a previously downloaded copy
//!    (skipped when a refresh is requested)
//! 2. Raw-file HTTP download from the repository's raw-content URL
//! 3. Shallow `git clone` of the whole repository as a fallback
//!
//! Files created by a fetch are recorded so end-of-run cleanup can remove
//! them; pre-existing local files are never deleted.

pub mod client;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hash;
use crate::vcs::GitClient;
use client::HttpClient;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// How the data file was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    /// Found locally, nothing fetched
    Cache,
    /// Downloaded as a single raw file
    Download,
    /// Obtained via a shallow clone of the repository
    Clone,
}

/// A located data file plus the bookkeeping cleanup needs
#[derive(Debug)]
pub struct SourceData {
    /// Path of the `.rda` file
    pub rda_path: PathBuf,
    pub origin: SourceOrigin,
    /// SHA-256 of the file content
    pub digest: String,
    /// Whether a refresh actually changed the local copy
    pub changed: bool,
    /// Paths this fetch created (candidates for cleanup)
    created: Vec<PathBuf>,
}

impl SourceData {
    /// Paths created by the fetch, for end-of-run cleanup
    pub fn created_paths(&self) -> &[PathBuf] {
        &self.created
    }
}

/// Look for an existing local copy of the data file
///
/// Checks a previous checkout of the source repository first, then the
/// configured data directory.
pub fn locate_cached(config: &Config) -> Option<PathBuf> {
    let checkout = PathBuf::from(config.source.checkout_dir()).join(&config.source.data_file);
    if checkout.exists() {
        return Some(checkout);
    }

    let downloaded = config.paths.data_dir.join(config.source.data_file_name());
    if downloaded.exists() {
        return Some(downloaded);
    }

    None
}

/// Obtain the data file
///
/// With `refresh` false an existing local copy wins. With `refresh` true the
/// file is re-downloaded and `changed` reports whether the content differs
/// from the previous copy; on download failure the function falls back to a
/// shallow clone, and finally to a stale cached copy if one exists.
pub fn fetch(config: &Config, git: &GitClient, refresh: bool) -> Result<SourceData> {
    if !refresh {
        if let Some(path) = locate_cached(config) {
            info!("Using cached data file {}", path.display());
            let digest = hash::sha256_file(&path)?;
            return Ok(SourceData {
                rda_path: path,
                origin: SourceOrigin::Cache,
                digest,
                changed: false,
                created: Vec::new(),
            });
        }
    }

    match download(config) {
        Ok(data) => Ok(data),
        Err(download_err) => {
            warn!("Raw download failed: {}", download_err);
            match clone_fallback(config, git) {
                Ok(data) => Ok(data),
                Err(clone_err) => {
                    warn!("Clone fallback failed: {}", clone_err);
                    if let Some(path) = locate_cached(config) {
                        warn!("Falling back to stale cached copy {}", path.display());
                        let digest = hash::sha256_file(&path)?;
                        return Ok(SourceData {
                            rda_path: path,
                            origin: SourceOrigin::Cache,
                            digest,
                            changed: false,
                            created: Vec::new(),
                        });
                    }
                    Err(download_err)
                }
            }
        }
    }
}

/// Download the raw data file into the data directory
fn download(config: &Config) -> Result<SourceData> {
    fs::create_dir_all(&config.paths.data_dir)?;
    let dest = config.paths.data_dir.join(config.source.data_file_name());

    // Digest of any previous copy, for change detection
    let prior_digest = if dest.exists() {
        Some(hash::sha256_file(&dest)?)
    } else {
        None
    };
    let pre_existing = prior_digest.is_some();

    let url = config.source.raw_url();
    let client = HttpClient::new()?;
    let pb = client::create_progress_bar(config.source.data_file_name());
    let bytes = client.download_file(&url, &dest, Some(&pb))?;
    pb.finish_with_message(format!("{} [done]", config.source.data_file_name()));

    let digest = hash::sha256_file(&dest)?;
    let changed = prior_digest.as_deref() != Some(digest.as_str());
    if changed {
        info!("Downloaded {} ({} bytes, sha256 {})", dest.display(), bytes, digest);
    } else {
        info!("Source data unchanged (sha256 {})", digest);
    }

    // A fresh download is ours to clean up; an overwritten pre-existing
    // file stays.
    let created = if pre_existing { Vec::new() } else { vec![dest.clone()] };

    Ok(SourceData {
        rda_path: dest,
        origin: SourceOrigin::Download,
        digest,
        changed,
        created,
    })
}

/// Shallow-clone the source repository and use the data file inside it
fn clone_fallback(config: &Config, git: &GitClient) -> Result<SourceData> {
    let checkout = PathBuf::from(config.source.checkout_dir());
    if checkout.exists() {
        debug!("Checkout {} already exists, reusing", checkout.display());
    } else {
        info!("Cloning {}...", config.source.clone_url());
        git.clone_shallow(&config.source.clone_url())?;
    }

    let rda_path = checkout.join(&config.source.data_file);
    if !rda_path.exists() {
        return Err(Error::NotFound(format!(
            "{} not present in cloned repository",
            rda_path.display()
        )));
    }

    let digest = hash::sha256_file(&rda_path)?;
    Ok(SourceData {
        rda_path,
        origin: SourceOrigin::Clone,
        digest,
        changed: true,
        created: vec![checkout],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.paths.data_dir = dir.join("data");
        config
    }

    #[test]
    fn test_locate_cached_finds_downloaded_copy() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        // Neither location exists yet
        fs::create_dir_all(&config.paths.data_dir).unwrap();
        assert!(locate_cached(&config).is_none());

        // Downloaded copy is found
        let downloaded = config.paths.data_dir.join("lst_dds.rda");
        fs::write(&downloaded, b"rda").unwrap();
        assert_eq!(locate_cached(&config), Some(downloaded));
    }

    #[test]
    fn test_fetch_uses_cache_without_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::create_dir_all(&config.paths.data_dir).unwrap();
        fs::write(config.paths.data_dir.join("lst_dds.rda"), b"rda-bytes").unwrap();

        let git = GitClient::with_program("git", std::path::Path::new("."));
        let data = fetch(&config, &git, false).unwrap();
        assert_eq!(data.origin, SourceOrigin::Cache);
        assert!(!data.changed);
        // Cached files are never cleanup candidates
        assert!(data.created_paths().is_empty());
        assert!(!data.digest.is_empty());
    }
}
