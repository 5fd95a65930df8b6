// src/tap.rs

//! Invoking the installed OpenTAP executable
//!
//! Package installation and the final package listing are done by the tool
//! itself. Both calls run to completion; a non-zero exit aborts the run with
//! the tool's own error output.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, info};

/// Handle to an installed `tap` executable
#[derive(Debug, Clone)]
pub struct Tap {
    executable: PathBuf,
    work_dir: PathBuf,
    search_path: Option<OsString>,
}

impl Tap {
    /// Create a handle that runs `executable` from `work_dir`
    pub fn new(executable: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            work_dir: work_dir.into(),
            search_path: None,
        }
    }

    /// Use this `PATH` for the child processes
    pub fn with_search_path(mut self, search_path: OsString) -> Self {
        self.search_path = Some(search_path);
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// `tap image install <image> --non-interactive --merge`
    pub fn install_image(&self, image: &Path) -> Result<String> {
        info!("Installing packages from {}", image.display());
        let args = [
            OsString::from("image"),
            OsString::from("install"),
            image.as_os_str().to_owned(),
            OsString::from("--non-interactive"),
            OsString::from("--merge"),
        ];
        self.run(&args)
    }

    /// `tap package list --installed`
    pub fn list_installed(&self) -> Result<String> {
        info!("Listing installed packages");
        let args = [
            OsString::from("package"),
            OsString::from("list"),
            OsString::from("--installed"),
        ];
        self.run(&args)
    }

    fn run(&self, args: &[OsString]) -> Result<String> {
        let command_line = self.describe(args);
        debug!("Running {} in {}", command_line, self.work_dir.display());

        let mut command = Command::new(&self.executable);
        command.args(args).current_dir(&self.work_dir);
        if let Some(path) = &self.search_path {
            command.env("PATH", path);
        }

        let output = command.output().map_err(|e| Error::SubprocessFailed {
            command: command_line.clone(),
            message: format!("failed to start: {e}"),
        })?;

        check_output(&command_line, output)
    }

    fn describe(&self, args: &[OsString]) -> String {
        let mut parts = vec![self.executable.display().to_string()];
        parts.extend(args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

/// Turn process output into its stdout, or an error carrying its stderr
fn check_output(command: &str, output: Output) -> Result<String> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        info!("{}", line);
    }

    if output.status.success() {
        return Ok(stdout);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = if stderr.trim().is_empty() {
        format!("exited with {}: {}", output.status, stdout.trim())
    } else {
        stderr.trim().to_string()
    };

    Err(Error::SubprocessFailed {
        command: command.to_string(),
        message,
    })
}
