// src/repository/client.rs

//! HTTP client for the package index
//!
//! Provides a thin wrapper around reqwest for downloading the installer
//! archive. There is no retry: a failed download aborts the run.

use crate::error::{Error, Result};
use reqwest::blocking::Client;
use std::fs::File;
use std::io::{self, Read, Write};
use std::time::Duration;
use tracing::{debug, info};

/// Chunk size for streaming the response body to disk
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Timeout for the whole download (the archive is tens of megabytes)
const HTTP_TIMEOUT: Duration = Duration::from_secs(300);

/// Connection establishment timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client wrapper
pub struct RepositoryClient {
    client: Client,
}

impl RepositoryClient {
    /// Create a new repository client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(format!("setup-opentap/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::DownloadError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Stream the body of `url` into an already open file
    ///
    /// Returns the number of bytes written. Non-2xx responses are errors and
    /// leave the file untouched.
    pub fn download_to_file(&self, url: &str, file: &mut File) -> Result<u64> {
        info!("Downloading {}", url);

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::DownloadError(format!("Failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        // Body read failures are download errors, file write failures are I/O
        let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
        let mut written = 0u64;
        loop {
            let n = match response.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(Error::DownloadError(format!(
                        "Failed to read response from {url}: {e}"
                    )));
                }
            };
            file.write_all(&buffer[..n])
                .map_err(|e| Error::IoError(format!("Failed to write downloaded data: {e}")))?;
            written += n as u64;
        }
        file.flush()
            .map_err(|e| Error::IoError(format!("Failed to flush downloaded data: {e}")))?;

        debug!("Downloaded {} bytes from {}", written, url);
        Ok(written)
    }
}
