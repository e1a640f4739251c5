// src/source/client.rs

//! HTTP client for raw-file downloads
//!
//! Wrapper around reqwest's blocking client with retry support and
//! streaming writes, so the data file never has to fit in memory.

use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for HTTP requests (60 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum retry attempts for failed downloads
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds
const RETRY_DELAY_MS: u64 = 1000;

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Stream an HTTP response to a file with optional progress tracking
fn stream_response_to_file(
    mut response: reqwest::blocking::Response,
    file: &mut File,
    total_size: u64,
    progress_bar: Option<&ProgressBar>,
    display_name: &str,
) -> Result<u64> {
    if let Some(pb) = progress_bar {
        if total_size > 0 {
            pb.set_length(total_size);
            pb.set_message(display_name.to_string());
        } else {
            pb.set_message(format!("{} (unknown size)", display_name));
        }
    }

    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];

    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| Error::Download(format!("failed to read response: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])?;
        downloaded += bytes_read as u64;

        if let Some(pb) = progress_bar {
            pb.set_position(downloaded);
        }
    }

    Ok(downloaded)
}

/// Create a styled progress bar for file downloads
pub fn create_progress_bar(name: &str) -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    pb.set_message(name.to_string());
    pb
}

/// HTTP client wrapper with retry support
pub struct HttpClient {
    client: reqwest::blocking::Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new client
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::Download(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Download a URL to a file, retrying transport failures
    ///
    /// HTTP error statuses (404, 500, ...) fail immediately so callers can
    /// fall back to cloning; only connection-level failures retry. A partial
    /// file is removed before returning an error.
    pub fn download_file(
        &self,
        url: &str,
        dest: &Path,
        progress_bar: Option<&ProgressBar>,
    ) -> Result<u64> {
        info!("Downloading {}", url);

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            match self.client.get(url).send() {
                Ok(response) => break response,
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(Error::Download(format!(
                            "failed to fetch {url} after {attempt} attempts: {e}"
                        )));
                    }
                    warn!("Download attempt {} failed: {}, retrying...", attempt, e);
                    std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64));
                }
            }
        };

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let total_size = response.content_length().unwrap_or(0);
        let display_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| url.to_string());

        let mut file = File::create(dest)?;
        match stream_response_to_file(response, &mut file, total_size, progress_bar, &display_name)
        {
            Ok(bytes) => {
                debug!("Downloaded {} bytes to {}", bytes, dest.display());
                Ok(bytes)
            }
            Err(e) => {
                drop(file);
                let _ = fs::remove_file(dest);
                Err(e)
            }
        }
    }
}
