// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use clap::Parser;
use setup_opentap::cli::Cli;
use setup_opentap::plan::{Host, SetupPlan};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

/// Scratch install and working directories for one run.
///
/// Keep the struct alive to prevent cleanup.
pub struct Sandbox {
    pub root: TempDir,
    pub install_dir: PathBuf,
    pub work_dir: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let install_dir = root.path().join("tap");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&install_dir).unwrap();
        fs::create_dir_all(&work_dir).unwrap();
        Self {
            root,
            install_dir,
            work_dir,
        }
    }

    /// Build a plan for a Linux x64 host with the sandbox directories.
    pub fn plan(&self, args: &[&str]) -> SetupPlan {
        let install_dir = self.install_dir.display().to_string();
        let work_dir = self.work_dir.display().to_string();
        let mut argv = vec![
            "setup-opentap",
            "--install-dir",
            install_dir.as_str(),
            "--working-dir",
            work_dir.as_str(),
        ];
        argv.extend_from_slice(args);

        let cli = Cli::try_parse_from(argv).unwrap();
        SetupPlan::new(&cli, &linux_host()).unwrap()
    }

    /// Arguments of every call the fake tool received, one line per call.
    pub fn tap_calls(&self) -> Vec<String> {
        match fs::read_to_string(self.work_dir.join("calls.log")) {
            Ok(log) => log.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }
}

pub fn linux_host() -> Host {
    Host {
        os: "linux".to_string(),
        arch: "x64".to_string(),
        current_dir: PathBuf::from("/"),
    }
}

/// Script body of a fake `tap` that logs its arguments to `calls.log`.
pub fn fake_tap_script(extra: &str) -> String {
    format!(
        "#!/bin/sh\necho \"$*\" >> calls.log\n{extra}\nif [ \"$1\" = package ]; then echo 'OpenTAP - 9.21.1 - Linux'; fi\n"
    )
}

/// Place a fake `tap` in `dir`.
///
/// The script is written without the executable bit; setup is expected to
/// add it.
#[cfg(unix)]
pub fn install_fake_tap(dir: &Path, extra: &str) -> PathBuf {
    let path = dir.join("tap");
    write_in_place(&path, &fake_tap_script(extra), 0o644);
    path
}

/// Write an executable shell script.
#[cfg(unix)]
pub fn write_script(path: &Path, body: &str) {
    write_in_place(path, &format!("#!/bin/sh\n{body}\n"), 0o755);
}

/// Write `contents` under a temporary name and rename it to `path`.
///
/// No writable handle to `path` exists afterwards, so executing it cannot
/// hit "text file busy".
#[cfg(unix)]
fn write_in_place(path: &Path, contents: &str, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    let file_name = path.file_name().unwrap().to_string_lossy();
    let staging = path.with_file_name(format!(".{file_name}.tmp"));
    fs::write(&staging, contents).unwrap();
    fs::set_permissions(&staging, fs::Permissions::from_mode(mode)).unwrap();
    fs::rename(&staging, path).unwrap();
}

/// Serve `body` once on a loopback port.
///
/// Returns the base URL and a handle yielding the request line received.
pub fn serve_once(body: Vec<u8>) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap_or(0) > 0 {
            if line == "\r\n" {
                break;
            }
            line.clear();
        }

        let header = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/zip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(header.as_bytes()).unwrap();
        stream.write_all(&body).unwrap();
        stream.flush().unwrap();
        request_line.trim_end().to_string()
    });
    (format!("http://{addr}"), handle)
}
