// src/repository/mod.rs

//! Package repositories and the installer download
//!
//! This module provides:
//! - The repository descriptor shared by the settings documents and the
//!   image manifest
//! - Download URL construction against the package index
//! - A blocking HTTP client that streams the installer archive to disk

mod client;
mod download;

pub use client::RepositoryClient;
pub use download::{download_archive, download_url, DOWNLOAD_PATH};

use crate::error::{Error, Result};
use url::Url;

/// Default package index, also the default repository
pub const DEFAULT_PACKAGE_INDEX: &str = "https://packages.opentap.io";

/// A source of installable packages, optionally credentialed by a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    url: String,
    domain: String,
    token: Option<String>,
}

impl Repository {
    /// Create a repository descriptor
    ///
    /// The domain is always taken from the URL's host. An empty token is
    /// treated as no token.
    pub fn new(url: &str, token: Option<String>) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidInput {
            name: "repository".to_string(),
            reason: format!("'{url}' is not a valid URL: {e}"),
        })?;
        let domain = parsed
            .host_str()
            .ok_or_else(|| Error::InvalidInput {
                name: "repository".to_string(),
                reason: format!("'{url}' has no host"),
            })?
            .to_string();

        Ok(Self {
            url: url.to_string(),
            domain,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Host portion of the URL
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

/// Turn a user-supplied repository into an absolute URL
///
/// Bare hosts (`foo.com/repo`) get `https://` prepended. An existing scheme
/// is kept, lowercased.
pub fn normalize_repository_url(input: &str) -> String {
    let trimmed = input.trim();
    match trimmed.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => {
            format!("{}://{}", scheme.to_ascii_lowercase(), rest)
        }
        _ => format!("https://{trimmed}"),
    }
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Whether any repository carries a token
pub fn any_token(repositories: &[Repository]) -> bool {
    repositories.iter().any(Repository::has_token)
}
