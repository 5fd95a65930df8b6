// src/actions.rs

//! CI runner integration
//!
//! Talks to the runner the way workflow steps do: failure annotations on
//! stdout, and the `GITHUB_PATH` / `GITHUB_OUTPUT` files for state that
//! later steps of the same job pick up.

use crate::error::{Error, Result};
use std::env;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Escape data for a workflow command
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Mark the job step as failed with `message`
pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Whether the runner asked for debug logging
pub fn is_debug() -> bool {
    env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1")
}

/// Make `dir` searchable for later steps and for this run's subprocesses
///
/// Appends to the `GITHUB_PATH` file when the runner provides one. Returns
/// the current `PATH` with `dir` prepended.
pub fn add_path(dir: &Path) -> Result<OsString> {
    if let Some(file) = env::var_os("GITHUB_PATH") {
        append_line(Path::new(&file), &dir.display().to_string())?;
        debug!("Added {} to GITHUB_PATH", dir.display());
    }
    prepend_search_path(dir, env::var_os("PATH"))
}

/// Build a search path with `dir` in front of `current`
pub fn prepend_search_path(dir: &Path, current: Option<OsString>) -> Result<OsString> {
    let mut paths: Vec<PathBuf> = vec![dir.to_path_buf()];
    if let Some(current) = current {
        paths.extend(env::split_paths(&current).filter(|p| p != dir));
    }
    env::join_paths(paths).map_err(|e| Error::InvalidInput {
        name: "PATH".to_string(),
        reason: e.to_string(),
    })
}

/// Publish a step output when the runner provides `GITHUB_OUTPUT`
pub fn set_output(name: &str, value: &str) -> Result<()> {
    match env::var_os("GITHUB_OUTPUT") {
        Some(file) => write_output(Path::new(&file), name, value),
        None => Ok(()),
    }
}

/// Append a `name<<delimiter` block to an output file
pub fn write_output(file: &Path, name: &str, value: &str) -> Result<()> {
    let delimiter = output_delimiter(value);
    append_line(file, &format!("{name}<<{delimiter}\n{value}\n{delimiter}"))
}

/// Heredoc delimiter that does not occur in `value`
fn output_delimiter(value: &str) -> String {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let mut n = seed ^ u128::from(std::process::id());
    loop {
        let delimiter = format!("ghadelimiter_{n:x}");
        if !value.contains(&delimiter) {
            return delimiter;
        }
        n = n.wrapping_add(1);
    }
}

fn append_line(file: &Path, line: &str) -> Result<()> {
    let mut handle = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .map_err(|e| Error::IoError(format!("Failed to open {}: {e}", file.display())))?;
    writeln!(handle, "{line}")
        .map_err(|e| Error::IoError(format!("Failed to write {}: {e}", file.display())))
}
