// src/commands/setup.rs
//! The setup run: install OpenTAP, configure it, install packages, report

use anyhow::{Context, Result};
use setup_opentap::actions;
use setup_opentap::cli::Cli;
use setup_opentap::install;
use setup_opentap::plan::{Host, SetupPlan};
use tracing::{debug, info};

/// Run every setup step in order
pub fn cmd_setup(cli: &Cli) -> Result<()> {
    let host = Host::current()?;
    let plan = SetupPlan::new(cli, &host)?;
    debug!("Download URL: {}", plan.download_url);
    info!(
        "Installing OpenTAP for {}/{} into {}",
        plan.target.platform,
        plan.target.architecture,
        plan.install_dir.display()
    );

    let strategy = install::fetch_and_extract(&plan, host.platform(), None)?;
    debug!("Archive unpacked with {}", strategy);

    install::prepare_install_dir(&plan)?;
    let search_path = actions::add_path(&plan.install_dir)?;
    actions::set_output("install-dir", &plan.install_dir.display().to_string())?;

    for path in install::write_settings(&plan)? {
        debug!("Wrote {}", path.display());
    }

    let tap = plan.tap().with_search_path(search_path);
    if let Some(image) = install::install_packages(&plan, &tap)? {
        debug!("Applied {}", image.display());
    }

    let listing = tap
        .list_installed()
        .with_context(|| format!("Listing packages with {}", tap.executable().display()))?;
    actions::set_output("installed-packages", listing.trim())?;

    info!("OpenTAP is ready in {}", plan.install_dir.display());
    Ok(())
}
