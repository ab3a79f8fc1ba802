//! Entry point for the `slipway-archive` cleanup utility.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use slipway_archive::Archiver;

#[derive(Debug, Parser)]
#[command(name = "slipway-archive", about = "Move retired workspace items into a timestamped archive")]
struct Cli {
    /// Workspace root the item paths are relative to.
    #[arg(long, default_value = ".")]
    workspace_root: PathBuf,

    /// Why the items are being archived; recorded in the session log.
    #[arg(long, default_value = "General cleanup")]
    reason: String,

    /// Paths to archive, relative to the workspace root.
    #[arg(required = true)]
    items: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let archiver = Archiver::new(&cli.workspace_root);
    let report = archiver.archive(&cli.items, &cli.reason)?;

    tracing::info!(
        archived = report.archived.len(),
        skipped = report.skipped.len(),
        log = %report.log_path.display(),
        "archiving session completed"
    );
    Ok(())
}
