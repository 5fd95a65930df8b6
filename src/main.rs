// src/main.rs

use clap::Parser;
use setup_opentap::actions;
use setup_opentap::cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

fn main() -> ExitCode {
    // Initialize tracing subscriber for logging
    let default_level = if actions::is_debug() { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let cli = Cli::parse();

    match commands::cmd_setup(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            actions::set_failed(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
