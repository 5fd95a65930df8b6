// src/image.rs

//! Installation image manifest
//!
//! An image lists the packages to install and the repositories to resolve
//! them from. It is handed to `tap image install` as a JSON file.

use crate::error::{Error, Result};
use crate::repository::Repository;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the manifest written to the working directory
pub const IMAGE_FILE: &str = "image.json";

/// A package to install, `name[:version]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageRef {
    pub name: String,
    /// None means any version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PackageRef {
    /// Parse a single `name[:version]` entry
    pub fn parse(spec: &str) -> Result<Self> {
        let (name, version) = match spec.split_once(':') {
            Some((name, version)) => (name.trim(), Some(version.trim())),
            None => (spec.trim(), None),
        };

        if name.is_empty() {
            return Err(Error::InvalidInput {
                name: "packages".to_string(),
                reason: format!("'{spec}' has no package name"),
            });
        }

        Ok(Self {
            name: name.to_string(),
            version: version.filter(|v| !v.is_empty()).map(str::to_string),
        })
    }
}

/// Parse a comma-separated package list
///
/// Blank entries (e.g. from a trailing comma) are skipped.
pub fn parse_packages(list: &str) -> Result<Vec<PackageRef>> {
    list.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(PackageRef::parse)
        .collect()
}

/// Desired packages plus the repositories to install them from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageManifest {
    pub packages: Vec<PackageRef>,
    pub repositories: Vec<String>,
}

impl ImageManifest {
    /// Build a manifest using every configured repository, in order
    pub fn new(packages: Vec<PackageRef>, repositories: &[Repository]) -> Self {
        Self {
            packages,
            repositories: repositories.iter().map(|r| r.url().to_string()).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Write the manifest as `image.json` into `dir`
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(IMAGE_FILE);
        let json = self.to_json()?;
        debug!("Image manifest: {}", json);
        fs::write(&path, json).map_err(|e| {
            Error::IoError(format!("Failed to write {}: {e}", path.display()))
        })?;
        Ok(path)
    }
}
