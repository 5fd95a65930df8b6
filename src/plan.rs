// src/plan.rs

//! Setup plan
//!
//! Everything a run decides before touching the network or the disk: the
//! target platform, where to download from and install to, which
//! repositories to configure and which packages to install. Building the
//! plan also applies the version gate, so a rejected version fails before
//! anything is downloaded or written.

use crate::cli::{non_empty, Cli};
use crate::error::{Error, Result};
use crate::image::{parse_packages, ImageManifest, PackageRef};
use crate::platform::{host_architecture, Platform, Target};
use crate::repository::{any_token, download_url, normalize_repository_url, Repository};
use crate::settings::{AUTHENTICATION_SETTINGS_FILE, PACKAGE_MANAGER_SETTINGS_FILE};
use crate::tap::Tap;
use crate::version::check_token_support;
use std::path::PathBuf;

/// Name of the settings subdirectory inside the install directory
pub const SETTINGS_DIR: &str = "Settings";

/// Facts about the machine running the setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Operating-system identifier, e.g. `linux`, `windows`, `darwin`
    pub os: String,
    /// Architecture identifier, e.g. `x64`, `x32`, `aarch64`
    pub arch: String,
    /// Directory the run was started from
    pub current_dir: PathBuf,
}

impl Host {
    pub fn current() -> Result<Self> {
        let current_dir = std::env::current_dir()
            .map_err(|e| Error::IoError(format!("Failed to get current directory: {e}")))?;
        Ok(Self {
            os: std::env::consts::OS.to_string(),
            arch: host_architecture().to_string(),
            current_dir,
        })
    }

    pub fn platform(&self) -> Platform {
        Platform::from_host(&self.os)
    }
}

/// Resolved decisions for one setup run
#[derive(Debug, Clone)]
pub struct SetupPlan {
    pub target: Target,
    /// Requested version, None for latest
    pub version: Option<String>,
    pub download_url: String,
    pub install_dir: PathBuf,
    pub work_dir: PathBuf,
    /// Default repository first, then the additional one if configured
    pub repositories: Vec<Repository>,
    pub additional_repository: bool,
    /// Empty when no packages were requested
    pub packages: Vec<PackageRef>,
}

impl SetupPlan {
    /// Resolve the plan from inputs and host facts
    pub fn new(cli: &Cli, host: &Host) -> Result<Self> {
        let target = Target::resolve(
            non_empty(&cli.os),
            non_empty(&cli.architecture),
            &host.os,
            &host.arch,
        )?;
        let version = non_empty(&cli.version).map(str::to_string);

        let mut repositories = vec![Repository::new(
            cli.package_index.trim_end_matches('/'),
            non_empty(&cli.token).map(str::to_string),
        )?];
        let additional = non_empty(&cli.additional_repository);
        if let Some(additional) = additional {
            repositories.push(Repository::new(
                &normalize_repository_url(additional),
                non_empty(&cli.additional_repository_token).map(str::to_string),
            )?);
        }

        if let Some(version) = version.as_deref().filter(|_| any_token(&repositories)) {
            check_token_support(version)?;
        }

        let packages = match non_empty(&cli.packages) {
            Some(list) => parse_packages(list)?,
            None => Vec::new(),
        };

        let download_url = download_url(&cli.package_index, version.as_deref(), &target)?;
        let install_dir = cli
            .install_dir
            .clone()
            .unwrap_or_else(|| target.platform.install_dir());
        let work_dir = cli
            .working_dir
            .clone()
            .unwrap_or_else(|| host.current_dir.clone());

        Ok(Self {
            target,
            version,
            download_url,
            install_dir,
            work_dir,
            repositories,
            additional_repository: additional.is_some(),
            packages,
        })
    }

    pub fn settings_dir(&self) -> PathBuf {
        self.install_dir.join(SETTINGS_DIR)
    }

    /// Path of the installed `tap` executable
    pub fn executable(&self) -> PathBuf {
        self.install_dir.join(self.target.platform.executable_name())
    }

    /// Authentication settings are written only when a token exists
    pub fn writes_authentication_settings(&self) -> bool {
        any_token(&self.repositories)
    }

    /// Package manager settings are written only for an additional repository
    pub fn writes_package_manager_settings(&self) -> bool {
        self.additional_repository
    }

    pub fn authentication_settings_path(&self) -> PathBuf {
        self.settings_dir().join(AUTHENTICATION_SETTINGS_FILE)
    }

    pub fn package_manager_settings_path(&self) -> PathBuf {
        self.settings_dir().join(PACKAGE_MANAGER_SETTINGS_FILE)
    }

    /// Handle to the installed tool, running in the working directory
    pub fn tap(&self) -> Tap {
        Tap::new(self.executable(), &self.work_dir)
    }

    /// Image manifest to install, if packages were requested
    pub fn manifest(&self) -> Option<ImageManifest> {
        if self.packages.is_empty() {
            None
        } else {
            Some(ImageManifest::new(self.packages.clone(), &self.repositories))
        }
    }
}
