// src/platform.rs

//! Platform and architecture resolution
//!
//! Maps the runner's operating system to one of the three platform tags the
//! package index understands, and picks the default processor architecture.
//! Explicit inputs always win over detection.

use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Canonical platform tag used for the download query and install location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Windows,
    MacOS,
}

/// Install directory per platform
pub static INSTALL_DIRS: [(Platform, &str); 3] = [
    (Platform::Linux, "/opt/tap"),
    (Platform::Windows, "C:/Program Files/OpenTAP"),
    (Platform::MacOS, "/Users/runner/Library/OpenTAP"),
];

impl Platform {
    /// Resolve a host operating-system identifier
    ///
    /// Accepts both Rust (`windows`, `macos`) and runner-style (`win32`,
    /// `darwin`) names. Anything else, POSIX-like or unknown, is Linux.
    pub fn from_host(os: &str) -> Self {
        match os {
            "windows" | "win32" => Self::Windows,
            "macos" | "darwin" => Self::MacOS,
            _ => Self::Linux,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::MacOS => "macos",
        }
    }

    /// Fixed installation directory for this platform
    pub fn install_dir(&self) -> PathBuf {
        INSTALL_DIRS
            .iter()
            .find(|(platform, _)| platform == self)
            .map(|(_, dir)| PathBuf::from(dir))
            .unwrap_or_else(|| PathBuf::from(INSTALL_DIRS[0].1))
    }

    /// File name of the installed executable
    pub fn executable_name(&self) -> &'static str {
        match self {
            Self::Windows => "tap.exe",
            Self::Linux | Self::MacOS => "tap",
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Windows)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    /// Strict parse of an explicit platform tag
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::MacOS),
            other => Err(Error::InvalidInput {
                name: "os".to_string(),
                reason: format!("'{other}' is not one of linux, windows, macos"),
            }),
        }
    }
}

/// Default architecture for a host architecture identifier
pub fn default_architecture(host_arch: &str) -> &'static str {
    match host_arch {
        "x32" => "x86",
        _ => "x64",
    }
}

/// Architecture identifier of the machine this binary runs on
pub fn host_architecture() -> &'static str {
    // 32-bit x86 hosts report as x32
    match std::env::consts::ARCH {
        "x86" => "x32",
        other => other,
    }
}

/// Platform and architecture chosen for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub platform: Platform,
    pub architecture: String,
}

impl Target {
    /// Resolve the target from optional overrides and host identifiers
    pub fn resolve(
        os_override: Option<&str>,
        arch_override: Option<&str>,
        host_os: &str,
        host_arch: &str,
    ) -> Result<Self> {
        let platform = match os_override {
            Some(os) => os.parse()?,
            None => Platform::from_host(host_os),
        };
        let architecture = match arch_override {
            Some(arch) => arch.to_string(),
            None => default_architecture(host_arch).to_string(),
        };
        Ok(Self {
            platform,
            architecture,
        })
    }
}
