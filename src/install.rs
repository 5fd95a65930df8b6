// src/install.rs

//! Installation steps
//!
//! The effectful half of a setup run, one function per step, each driven by
//! a [`SetupPlan`]. The binary sequences them; a failing step aborts the run.

use crate::error::{Error, Result};
use crate::extract::{extract_archive, ExtractStrategy};
use crate::image::IMAGE_FILE;
use crate::plan::SetupPlan;
use crate::platform::Platform;
use crate::repository::download_archive;
use crate::settings::{
    authentication_settings, package_manager_settings, redacted_authentication_settings,
};
use crate::tap::Tap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Download the archive and unpack it into the install directory
///
/// `host` decides which extraction programs are tried; they are looked up in
/// `tool_path`, or in `PATH` when it is None.
pub fn fetch_and_extract(
    plan: &SetupPlan,
    host: Platform,
    tool_path: Option<&OsStr>,
) -> Result<ExtractStrategy> {
    info!(
        "Fetching OpenTAP {} for {}/{}",
        plan.version.as_deref().unwrap_or("(latest)"),
        plan.target.platform,
        plan.target.architecture
    );
    let archive = download_archive(&plan.download_url)?;

    extract_archive(
        archive.path(),
        &plan.install_dir,
        &ExtractStrategy::for_platform(host),
        tool_path,
    )
}

/// Create the settings directory and make the executable runnable
pub fn prepare_install_dir(plan: &SetupPlan) -> Result<()> {
    let settings_dir = plan.settings_dir();
    fs::create_dir_all(&settings_dir).map_err(|e| {
        Error::IoError(format!("Failed to create directory {}: {e}", settings_dir.display()))
    })?;

    if !plan.target.platform.is_windows() {
        make_executable(&plan.executable())?;
    }
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)
        .map_err(|e| Error::IoError(format!("Failed to stat {}: {e}", path.display())))?
        .permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    fs::set_permissions(path, permissions)
        .map_err(|e| Error::IoError(format!("Failed to chmod {}: {e}", path.display())))?;
    debug!("Marked {} executable", path.display());
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(path: &Path) -> Result<()> {
    debug!("Skipping chmod of {} on a non-Unix host", path.display());
    Ok(())
}

/// Write the settings documents the plan calls for
///
/// Returns the paths written. `Package Manager.xml` only when an additional
/// repository is configured, `AuthenticationSettings.xml` only when a token is.
pub fn write_settings(plan: &SetupPlan) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if plan.writes_package_manager_settings() {
        let document = package_manager_settings(&plan.repositories)?;
        let path = plan.package_manager_settings_path();
        write_document(&path, &document)?;
        info!("Configured {} package repositories", plan.repositories.len());
        written.push(path);
    }

    if plan.writes_authentication_settings() {
        let document = authentication_settings(&plan.repositories)?;
        let path = plan.authentication_settings_path();
        debug!(
            "{}:\n{}",
            path.display(),
            redacted_authentication_settings(&plan.repositories)?
        );
        write_document(&path, &document)?;
        info!("Configured repository authentication");
        written.push(path);
    }

    Ok(written)
}

fn write_document(path: &Path, document: &str) -> Result<()> {
    fs::write(path, document)
        .map_err(|e| Error::IoError(format!("Failed to write {}: {e}", path.display())))
}

/// Write `image.json` and have the installed tool apply it
///
/// Does nothing when no packages were requested.
pub fn install_packages(plan: &SetupPlan, tap: &Tap) -> Result<Option<PathBuf>> {
    let Some(manifest) = plan.manifest() else {
        debug!("No packages requested");
        return Ok(None);
    };

    let path = manifest.write_to(&plan.work_dir)?;
    info!(
        "Installing {} package(s): {}",
        manifest.packages.len(),
        manifest
            .packages
            .iter()
            .map(|p| match &p.version {
                Some(v) => format!("{}:{}", p.name, v),
                None => p.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    );
    tap.install_image(Path::new(IMAGE_FILE))?;
    Ok(Some(path))
}
