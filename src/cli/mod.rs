// src/cli/mod.rs
//! CLI definitions for setup-opentap
//!
//! Every input can be given as a flag or, as a CI runner passes step inputs,
//! through an `INPUT_*` environment variable. Runners set unused inputs to an
//! empty string, so empty values are treated as absent.
//!
//! The actual orchestration lives in the `commands` module.

use crate::repository::DEFAULT_PACKAGE_INDEX;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "setup-opentap")]
#[command(author = "OpenTAP Contributors")]
#[command(version)]
// --version selects the OpenTAP version to install
#[command(disable_version_flag = true)]
#[command(
    about = "Install OpenTAP on a CI runner, configure package repositories and install packages",
    long_about = None
)]
pub struct Cli {
    /// OpenTAP version to install (latest when omitted)
    #[arg(long, env = "INPUT_VERSION")]
    pub version: Option<String>,

    /// Processor architecture (detected when omitted)
    #[arg(long, env = "INPUT_ARCHITECTURE")]
    pub architecture: Option<String>,

    /// Target platform: linux, windows or macos (detected when omitted)
    #[arg(long, env = "INPUT_OS")]
    pub os: Option<String>,

    /// Comma-separated packages to install, each name[:version]
    #[arg(long, env = "INPUT_PACKAGES")]
    pub packages: Option<String>,

    /// Token for the default package repository
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Additional package repository (URL or bare host)
    #[arg(long, env = "INPUT_ADDITIONAL-REPOSITORY")]
    pub additional_repository: Option<String>,

    /// Token for the additional package repository
    #[arg(
        long,
        env = "INPUT_ADDITIONAL-REPOSITORY-TOKEN",
        hide_env_values = true
    )]
    pub additional_repository_token: Option<String>,

    /// Package index to download from, also the default repository
    #[arg(
        long,
        env = "SETUP_OPENTAP_PACKAGE_INDEX",
        default_value = DEFAULT_PACKAGE_INDEX
    )]
    pub package_index: String,

    /// Install into this directory instead of the platform default
    #[arg(long, env = "SETUP_OPENTAP_INSTALL_DIR")]
    pub install_dir: Option<PathBuf>,

    /// Directory for image.json and the tool's working directory
    #[arg(long)]
    pub working_dir: Option<PathBuf>,
}

/// Present-and-non-empty view of an optional input
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
