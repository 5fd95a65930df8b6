// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Optional string input that is also read from the runner environment
fn input_arg(name: &'static str, env_name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("VALUE")
        .env(env_name)
        .help(help)
}

/// Mirror of `cli::Cli` for the man page; keep the two in step
fn build_cli() -> Command {
    Command::new("setup-opentap")
        .version(env!("CARGO_PKG_VERSION"))
        .author("OpenTAP Contributors")
        .about("Install OpenTAP on a CI runner, configure package repositories and install packages")
        .disable_version_flag(true)
        .arg(input_arg(
            "version",
            "INPUT_VERSION",
            "OpenTAP version to install (latest when omitted)",
        ))
        .arg(input_arg(
            "architecture",
            "INPUT_ARCHITECTURE",
            "Processor architecture (detected when omitted)",
        ))
        .arg(input_arg(
            "os",
            "INPUT_OS",
            "Target platform: linux, windows or macos (detected when omitted)",
        ))
        .arg(input_arg(
            "packages",
            "INPUT_PACKAGES",
            "Comma-separated packages to install, each name[:version]",
        ))
        .arg(input_arg("token", "INPUT_TOKEN", "Token for the default package repository").hide_env_values(true))
        .arg(input_arg(
            "additional-repository",
            "INPUT_ADDITIONAL-REPOSITORY",
            "Additional package repository (URL or bare host)",
        ))
        .arg(
            input_arg(
                "additional-repository-token",
                "INPUT_ADDITIONAL-REPOSITORY-TOKEN",
                "Token for the additional package repository",
            )
            .hide_env_values(true),
        )
        .arg(
            input_arg(
                "package-index",
                "SETUP_OPENTAP_PACKAGE_INDEX",
                "Package index to download from, also the default repository",
            )
            // Must match repository::DEFAULT_PACKAGE_INDEX
            .default_value("https://packages.opentap.io"),
        )
        .arg(
            input_arg(
                "install-dir",
                "SETUP_OPENTAP_INSTALL_DIR",
                "Install into this directory instead of the platform default",
            )
            .value_name("PATH"),
        )
        .arg(
            Arg::new("working-dir")
                .long("working-dir")
                .value_name("PATH")
                .help("Directory for image.json and the tool's working directory"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("setup-opentap.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
