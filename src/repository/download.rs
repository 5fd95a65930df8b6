// src/repository/download.rs

//! Installer archive download
//!
//! Builds the query-parameterized download URL and fetches the archive into
//! a temporary file that lives until the caller drops it.

use crate::error::{Error, Result};
use crate::platform::Target;
use tempfile::NamedTempFile;
use tracing::debug;
use url::Url;

use super::client::RepositoryClient;

/// Path of the OpenTAP download endpoint on the package index
pub const DOWNLOAD_PATH: &str = "/3.0/DownloadPackage/OpenTAP";

/// Build the archive download URL
///
/// `version` is only sent when requested; without it the index picks the
/// latest release. Architecture and OS are always sent.
pub fn download_url(package_index: &str, version: Option<&str>, target: &Target) -> Result<String> {
    let base = format!("{}{}", package_index.trim_end_matches('/'), DOWNLOAD_PATH);
    let mut url = Url::parse(&base).map_err(|e| Error::InvalidInput {
        name: "package-index".to_string(),
        reason: format!("'{package_index}' is not a valid URL: {e}"),
    })?;

    {
        let mut query = url.query_pairs_mut();
        if let Some(version) = version {
            query.append_pair("version", version);
        }
        query.append_pair("architecture", &target.architecture);
        query.append_pair("os", target.platform.as_str());
    }

    Ok(url.into())
}

/// Download the installer archive at `url` to a temporary `.zip` file
///
/// The file is deleted when the returned handle is dropped.
pub fn download_archive(url: &str) -> Result<NamedTempFile> {
    let mut archive = tempfile::Builder::new()
        .prefix("opentap-")
        .suffix(".zip")
        .tempfile()
        .map_err(|e| Error::IoError(format!("Failed to create temporary file: {e}")))?;

    let client = RepositoryClient::new()?;
    let size = client.download_to_file(url, archive.as_file_mut())?;
    debug!("Archive stored at {} ({} bytes)", archive.path().display(), size);

    Ok(archive)
}
