//! Moves retired files and directories into timestamped archive folders,
//! keeping a per-session log of what went where.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

/// Outcome of one archiving session.
#[derive(Debug)]
pub struct ArchiveReport {
    /// Items that were moved into the session directory.
    pub archived: Vec<PathBuf>,
    /// Items that were skipped because they do not exist.
    pub skipped: Vec<PathBuf>,
    /// The session log file.
    pub log_path: PathBuf,
}

/// Archives workspace items under `<workspace>/archive/<timestamp>/`.
#[derive(Debug)]
pub struct Archiver {
    workspace_root: PathBuf,
    archive_root: PathBuf,
}

impl Archiver {
    /// Archiver rooted at `workspace_root`, writing sessions under its
    /// `archive/` sub-directory.
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        let workspace_root = workspace_root.into();
        let archive_root = workspace_root.join("archive");
        Self { workspace_root, archive_root }
    }

    /// Move `items` (paths relative to the workspace root) into a fresh
    /// timestamped session directory, preserving their relative layout, and
    /// write an `archive_log.txt` describing the session.
    ///
    /// Missing items are skipped with a warning rather than failing the
    /// session; a move error is logged per item and the session continues.
    ///
    /// # Errors
    /// Fails only when the session directory or its log cannot be written.
    pub fn archive(&self, items: &[PathBuf], reason: &str) -> Result<ArchiveReport> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let session_dir = self.archive_root.join(&stamp);
        fs::create_dir_all(&session_dir)
            .with_context(|| format!("creating archive session dir {}", session_dir.display()))?;

        let mut lines = vec![
            format!("Archiving session: {}", Local::now().to_rfc3339()),
            format!("Reason: {reason}"),
            String::new(),
            "Archived items:".to_owned(),
        ];
        let mut archived = Vec::new();
        let mut skipped = Vec::new();

        for item in items {
            let source = self.workspace_root.join(item);
            if !source.exists() {
                tracing::warn!(item = %item.display(), "item not found, skipping");
                lines.push(format!("- Skipped (not found): {}", item.display()));
                skipped.push(item.clone());
                continue;
            }

            let destination = session_dir.join(item);
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }

            match fs::rename(&source, &destination) {
                Ok(()) => {
                    tracing::info!(item = %item.display(), to = %destination.display(), "moved");
                    lines.push(format!("- Moved: {} -> {}/{}", item.display(), stamp, item.display()));
                    archived.push(item.clone());
                }
                Err(e) => {
                    tracing::error!(item = %item.display(), error = %e, "failed to archive");
                    lines.push(format!("- Error archiving {}: {e}", item.display()));
                }
            }
        }

        lines.push(String::new());
        lines.push("Archiving session completed.".to_owned());

        let log_path = session_dir.join("archive_log.txt");
        fs::write(&log_path, lines.join("\n") + "\n")
            .with_context(|| format!("writing session log {}", log_path.display()))?;

        Ok(ArchiveReport { archived, skipped, log_path })
    }

    /// The directory sessions are created under.
    #[must_use]
    pub fn archive_root(&self) -> &Path {
        &self.archive_root
    }
}
