// src/extract.rs

//! Archive extraction through external programs
//!
//! Extraction itself is delegated to tools already present on the runner.
//! Minimal container images often lack `unzip`, so extraction walks an
//! ordered list of strategies and the first one that succeeds wins.

use crate::error::{Error, Result};
use crate::platform::Platform;
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

/// One way of unpacking a zip archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractStrategy {
    /// Info-ZIP `unzip`
    Unzip,
    /// Windows PowerShell `Expand-Archive`
    WindowsPowerShell,
    /// PowerShell (Core) `Expand-Archive` through `pwsh`
    PowerShellCore,
}

impl ExtractStrategy {
    /// Ordered strategies for the host platform: native first, `pwsh` last
    pub fn for_platform(platform: Platform) -> Vec<Self> {
        match platform {
            Platform::Windows => vec![Self::WindowsPowerShell, Self::PowerShellCore],
            Platform::Linux | Platform::MacOS => vec![Self::Unzip, Self::PowerShellCore],
        }
    }

    /// Program this strategy runs
    pub fn program(&self) -> &'static str {
        match self {
            Self::Unzip => "unzip",
            Self::WindowsPowerShell => "powershell",
            Self::PowerShellCore => "pwsh",
        }
    }

    /// Arguments that extract `archive` into `dest`
    pub fn args(&self, archive: &Path, dest: &Path) -> Vec<String> {
        match self {
            Self::Unzip => vec![
                "-o".to_string(),
                "-q".to_string(),
                archive.display().to_string(),
                "-d".to_string(),
                dest.display().to_string(),
            ],
            Self::WindowsPowerShell | Self::PowerShellCore => vec![
                "-NoProfile".to_string(),
                "-NonInteractive".to_string(),
                "-Command".to_string(),
                format!(
                    "$ErrorActionPreference = 'Stop'; Expand-Archive -Path {} -DestinationPath {} -Force",
                    ps_quote(archive),
                    ps_quote(dest)
                ),
            ],
        }
    }

    /// Run this strategy once, looking the program up in `search_path`
    fn run(
        &self,
        archive: &Path,
        dest: &Path,
        search_path: Option<&OsString>,
    ) -> std::result::Result<(), String> {
        let program = which::which_in(self.program(), search_path, dest)
            .map_err(|_| format!("{} is not installed", self.program()))?;

        let args = self.args(archive, dest);
        debug!("Running {} {}", program.display(), args.join(" "));

        let output = Command::new(&program)
            .args(&args)
            .output()
            .map_err(|e| format!("failed to start {}: {e}", self.program()))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!(
                "{} exited with {}: {}",
                self.program(),
                output.status,
                stderr.trim()
            ))
        }
    }
}

impl fmt::Display for ExtractStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

/// Single-quote a path for a PowerShell command line
fn ps_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', "''"))
}

/// Extract `archive` into `dest`, trying each strategy in order
///
/// Programs are looked up in `search_path`, or in `PATH` when it is None.
/// Returns the strategy that succeeded. Only when all of them have failed is
/// [`Error::ExtractionFailed`] returned, carrying every attempt's reason.
pub fn extract_archive(
    archive: &Path,
    dest: &Path,
    strategies: &[ExtractStrategy],
    search_path: Option<&OsStr>,
) -> Result<ExtractStrategy> {
    fs::create_dir_all(dest).map_err(|e| {
        Error::IoError(format!("Failed to create directory {}: {e}", dest.display()))
    })?;

    let search_path = search_path
        .map(OsStr::to_os_string)
        .or_else(|| env::var_os("PATH"));

    let mut reasons = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        match strategy.run(archive, dest, search_path.as_ref()) {
            Ok(()) => {
                info!("Extracted {} to {} with {}", archive.display(), dest.display(), strategy);
                return Ok(*strategy);
            }
            Err(reason) => {
                warn!("Extraction with {} failed: {}", strategy, reason);
                reasons.push(reason);
            }
        }
    }

    if reasons.is_empty() {
        reasons.push("no extraction strategy available".to_string());
    }

    Err(Error::ExtractionFailed {
        archive: archive.display().to_string(),
        reasons: reasons.join("; "),
    })
}
