// src/version/mod.rs

//! Requested OpenTAP version handling
//!
//! Token authentication only works with recent OpenTAP releases. When a
//! specific version is requested together with a token, the version is
//! checked before anything is written.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Oldest release with token authentication, as shown to users
pub const MINIMUM_TOKEN_VERSION: &str = "9.21.1";

/// Minor version at which token authentication appeared
const MINIMUM_MINOR: u64 = 21;

/// `major.minor[.patch]`, anything after the numbers is ignored
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?").expect("version pattern is valid")
});

/// Numeric prefix of a requested version string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: Option<u64>,
}

impl RequestedVersion {
    /// Parse the leading `major.minor[.patch]` of a version string
    ///
    /// Trailing text such as `-beta.3+abc` is tolerated.
    pub fn parse(s: &str) -> Result<Self> {
        let caps = VERSION_PATTERN
            .captures(s.trim())
            .ok_or_else(|| Error::InvalidVersion(s.to_string()))?;

        let number = |i: usize| -> Result<Option<u64>> {
            caps.get(i)
                .map(|m| {
                    m.as_str()
                        .parse::<u64>()
                        .map_err(|_| Error::InvalidVersion(s.to_string()))
                })
                .transpose()
        };

        Ok(Self {
            major: number(1)?.unwrap_or_default(),
            minor: number(2)?.unwrap_or_default(),
            patch: number(3)?,
        })
    }

    /// Whether this version can use token authentication
    ///
    /// Only the minor and patch numbers are considered. `x.21` without a
    /// patch is accepted, `x.21.0` is not.
    pub fn supports_tokens(&self) -> bool {
        if self.minor < MINIMUM_MINOR {
            return false;
        }
        !(self.minor == MINIMUM_MINOR && self.patch.is_some_and(|patch| patch < 1))
    }
}

/// Reject versions too old for token authentication
pub fn check_token_support(requested: &str) -> Result<()> {
    let version = RequestedVersion::parse(requested)?;
    if version.supports_tokens() {
        Ok(())
    } else {
        Err(Error::UnsupportedVersion {
            requested: requested.to_string(),
            minimum: MINIMUM_TOKEN_VERSION.to_string(),
        })
    }
}
