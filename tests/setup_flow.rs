// tests/setup_flow.rs

//! End-to-end setup runs against a fake installed tool.
//!
//! The package index is a loopback server and extraction runs through a
//! stand-in `unzip`, so no test needs the network or real archive tools.

#![cfg(unix)]

mod common;

use common::{fake_tap_script, install_fake_tap, serve_once, write_script, Sandbox};
use setup_opentap::extract::ExtractStrategy;
use setup_opentap::install;
use setup_opentap::platform::Platform;
use setup_opentap::Error;
use std::fs;
use std::os::unix::fs::PermissionsExt;

// =============================================================================
// FULL RUN
// =============================================================================

#[test]
fn test_token_and_package_run() {
    let sandbox = Sandbox::new();
    install_fake_tap(&sandbox.install_dir, "");
    let plan = sandbox.plan(&[
        "--version",
        "9.21.1",
        "--packages",
        "Demonstration",
        "--token",
        "abc",
    ]);

    assert!(plan
        .download_url
        .contains("version=9.21.1&architecture=x64&os=linux"));
    assert_eq!(plan.target.platform, Platform::Linux);

    install::prepare_install_dir(&plan).unwrap();
    assert!(sandbox.install_dir.join("Settings").is_dir());
    let mode = fs::metadata(sandbox.install_dir.join("tap"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o755, 0o755);

    let written = install::write_settings(&plan).unwrap();
    assert_eq!(written.len(), 1);
    let auth = fs::read_to_string(
        sandbox
            .install_dir
            .join("Settings")
            .join("AuthenticationSettings.xml"),
    )
    .unwrap();
    assert_eq!(auth.matches("<TokenInfo").count(), 1);
    assert!(auth.contains("<AccessToken>abc</AccessToken>"));
    assert!(auth.contains("<Domain>packages.opentap.io</Domain>"));
    assert!(!sandbox
        .install_dir
        .join("Settings")
        .join("Package Manager.xml")
        .exists());

    let tap = plan.tap();
    let image = install::install_packages(&plan, &tap).unwrap().unwrap();
    assert_eq!(image, sandbox.work_dir.join("image.json"));
    assert_eq!(
        fs::read_to_string(&image).unwrap(),
        r#"{"Packages":[{"Name":"Demonstration"}],"Repositories":["https://packages.opentap.io"]}"#
    );

    let listing = tap.list_installed().unwrap();
    assert!(listing.contains("OpenTAP - 9.21.1"));

    assert_eq!(
        sandbox.tap_calls(),
        vec![
            "image install image.json --non-interactive --merge".to_string(),
            "package list --installed".to_string(),
        ]
    );
}

#[test]
fn test_run_without_packages_only_lists() {
    let sandbox = Sandbox::new();
    install_fake_tap(&sandbox.install_dir, "");
    let plan = sandbox.plan(&[]);

    install::prepare_install_dir(&plan).unwrap();
    assert!(install::write_settings(&plan).unwrap().is_empty());

    let tap = plan.tap();
    assert!(install::install_packages(&plan, &tap).unwrap().is_none());
    tap.list_installed().unwrap();

    assert!(!sandbox.work_dir.join("image.json").exists());
    assert_eq!(sandbox.tap_calls(), vec!["package list --installed".to_string()]);
}

#[test]
fn test_download_extract_and_install() {
    let sandbox = Sandbox::new();
    let bin = sandbox.root.path().join("bin");
    fs::create_dir_all(&bin).unwrap();
    // unzip -o -q <archive> -d <dest>: the served "archive" is the tool itself
    write_script(&bin.join("unzip"), r#"cp "$3" "$5/tap""#);

    let (index, request) = serve_once(fake_tap_script("").into_bytes());
    let plan = sandbox.plan(&[
        "--package-index",
        index.as_str(),
        "--version",
        "9.21.1",
        "--packages",
        "Demonstration",
        "--token",
        "abc",
    ]);

    let used = install::fetch_and_extract(&plan, Platform::Linux, Some(bin.as_os_str())).unwrap();
    assert_eq!(used, ExtractStrategy::Unzip);
    assert_eq!(
        request.join().unwrap(),
        "GET /3.0/DownloadPackage/OpenTAP?version=9.21.1&architecture=x64&os=linux HTTP/1.1"
    );

    install::prepare_install_dir(&plan).unwrap();
    let written = install::write_settings(&plan).unwrap();
    assert_eq!(written.len(), 1);
    let auth = fs::read_to_string(&written[0]).unwrap();
    assert!(auth.contains("<Domain>127.0.0.1</Domain>"));

    let tap = plan.tap();
    install::install_packages(&plan, &tap).unwrap();
    assert!(tap.list_installed().unwrap().contains("OpenTAP - 9.21.1"));
    assert_eq!(
        sandbox.tap_calls(),
        vec![
            "image install image.json --non-interactive --merge".to_string(),
            "package list --installed".to_string(),
        ]
    );
}

// =============================================================================
// REPOSITORY CONFIGURATION
// =============================================================================

#[test]
fn test_additional_repository_writes_package_manager_settings() {
    let sandbox = Sandbox::new();
    install_fake_tap(&sandbox.install_dir, "");
    let plan = sandbox.plan(&[
        "--additional-repository",
        "foo.com/repo",
        "--additional-repository-token",
        "xyz",
        "--packages",
        "A:1.2.3,B",
    ]);

    install::prepare_install_dir(&plan).unwrap();
    let written = install::write_settings(&plan).unwrap();
    assert_eq!(written.len(), 2);

    let settings = sandbox.install_dir.join("Settings");
    let package_manager = fs::read_to_string(settings.join("Package Manager.xml")).unwrap();
    assert_eq!(package_manager.matches("<RepositorySettingEntry").count(), 2);
    let default_pos = package_manager
        .find("<Url>https://packages.opentap.io</Url>")
        .unwrap();
    let extra_pos = package_manager.find("<Url>https://foo.com/repo</Url>").unwrap();
    assert!(default_pos < extra_pos);

    let auth = fs::read_to_string(settings.join("AuthenticationSettings.xml")).unwrap();
    assert_eq!(auth.matches("<TokenInfo").count(), 1);
    assert!(auth.contains("<Domain>foo.com</Domain>"));

    let tap = plan.tap();
    install::install_packages(&plan, &tap).unwrap();
    assert_eq!(
        fs::read_to_string(sandbox.work_dir.join("image.json")).unwrap(),
        r#"{"Packages":[{"Name":"A","Version":"1.2.3"},{"Name":"B"}],"Repositories":["https://packages.opentap.io","https://foo.com/repo"]}"#
    );
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn test_failed_package_install_surfaces_tool_error() {
    let sandbox = Sandbox::new();
    install_fake_tap(
        &sandbox.install_dir,
        "if [ \"$1\" = image ]; then echo 'Could not resolve Nonexistent' >&2; exit 2; fi",
    );
    let plan = sandbox.plan(&["--packages", "Nonexistent"]);
    install::prepare_install_dir(&plan).unwrap();

    let err = install::install_packages(&plan, &plan.tap()).unwrap_err();
    match err {
        Error::SubprocessFailed { message, .. } => {
            assert_eq!(message, "Could not resolve Nonexistent");
        }
        other => panic!("expected SubprocessFailed, got {other:?}"),
    }
}

#[test]
fn test_missing_executable_fails_preparation() {
    let sandbox = Sandbox::new();
    let plan = sandbox.plan(&[]);

    let err = install::prepare_install_dir(&plan).unwrap_err();
    assert!(matches!(err, Error::IoError(_)));
}
