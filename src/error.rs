// src/error.rs

//! Error types for the setup step
//!
//! Every failure is terminal for the run. Variants carry a human-readable
//! message so the CI failure annotation can show the underlying cause as-is.

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem operation failed
    #[error("I/O error: {0}")]
    IoError(String),

    /// HTTP client setup, network failure or non-2xx response
    #[error("Download failed: {0}")]
    DownloadError(String),

    /// Every extraction strategy was tried and none succeeded
    #[error("Failed to extract {archive}: {reasons}")]
    ExtractionFailed { archive: String, reasons: String },

    /// Requested version predates token authentication support
    #[error("Token authentication requires OpenTAP {minimum} or greater (requested {requested})")]
    UnsupportedVersion { requested: String, minimum: String },

    /// Requested version string does not look like major.minor[.patch]
    #[error("Invalid version '{0}': expected major.minor[.patch]")]
    InvalidVersion(String),

    /// A configuration input could not be interpreted
    #[error("Invalid input '{name}': {reason}")]
    InvalidInput { name: String, reason: String },

    /// Settings document could not be generated
    #[error("Failed to generate settings: {0}")]
    SettingsError(String),

    /// Image manifest could not be serialized
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The installed tool could not be started or exited unsuccessfully
    #[error("{command} failed: {message}")]
    SubprocessFailed { command: String, message: String },
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}
