//! One-off utility: download property assessment data from a county FTP
//! server into a local data directory.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use suppaftp::FtpStream;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "slipway-fetch", about = "Fetch county assessment data over FTP")]
struct Cli {
    /// FTP server holding the assessment data.
    #[arg(long)]
    host: String,

    /// Remote directory to change into; falls back to the server root when
    /// missing.
    #[arg(long)]
    remote_dir: Option<String>,

    /// Directory downloaded files are written to.
    #[arg(long, default_value = "data/county")]
    output_dir: PathBuf,

    /// FTP account name.
    #[arg(long, env = "FTP_USERNAME", hide_env_values = true)]
    username: String,

    /// FTP account password.
    #[arg(long, env = "FTP_PASSWORD", hide_env_values = true)]
    password: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    info!(host = %cli.host, "starting assessment data fetch");
    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("creating output directory {}", cli.output_dir.display()))?;

    let mut ftp = FtpStream::connect((cli.host.as_str(), 21))
        .with_context(|| format!("connecting to FTP server {}", cli.host))?;
    ftp.login(&cli.username, &cli.password).context("logging in to FTP server")?;
    info!("connected to FTP server");

    if let Some(dir) = &cli.remote_dir {
        match ftp.cwd(dir) {
            Ok(()) => info!(dir = %dir, "changed to data directory"),
            Err(e) => warn!(dir = %dir, error = %e, "data directory not found, using server root"),
        }
    }

    let names = ftp.nlst(None).context("listing remote files")?;
    info!(count = names.len(), "found files on server");

    let mut downloaded = Vec::new();
    for name in names {
        if !is_data_file(&name) {
            continue;
        }
        info!(file = %name, "downloading");
        let buffer = ftp
            .retr_as_buffer(&name)
            .with_context(|| format!("downloading {name}"))?;
        let local = cli.output_dir.join(&name);
        fs::write(&local, buffer.into_inner())
            .with_context(|| format!("writing {}", local.display()))?;
        downloaded.push(name);
    }

    let _ = ftp.quit();

    write_metadata(&cli.output_dir, &cli.host, &downloaded)?;
    info!(files = downloaded.len(), "fetch complete");
    Ok(())
}

/// Data files are `.csv`, `.json`, or `.xml`; dotfiles and extensionless
/// names (directories, mostly) are skipped.
fn is_data_file(name: &str) -> bool {
    if name.starts_with('.') || !name.contains('.') {
        return false;
    }
    name.ends_with(".csv") || name.ends_with(".json") || name.ends_with(".xml")
}

fn write_metadata(output_dir: &Path, host: &str, files: &[String]) -> Result<()> {
    let metadata = serde_json::json!({
        "source": host,
        "download_date": Utc::now().to_rfc3339(),
        "files": files,
    });
    let path = output_dir.join("metadata.json");
    let body = serde_json::to_vec_pretty(&metadata).context("encoding metadata")?;
    fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "wrote metadata");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_extensions_are_accepted() {
        assert!(is_data_file("parcels.csv"));
        assert!(is_data_file("parcels.json"));
        assert!(is_data_file("parcels.xml"));
    }

    #[test]
    fn dotfiles_and_extensionless_names_are_skipped() {
        assert!(!is_data_file(".htaccess"), "dotfiles are not data");
        assert!(!is_data_file("incoming"), "extensionless names are not data");
        assert!(!is_data_file("readme.txt"), "unknown extensions are not data");
    }
}
