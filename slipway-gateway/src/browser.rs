//! Opens the local UI in the user's browser.
//!
//! The caller invokes this only after the server socket is bound, so the
//! page load cannot race server startup.

use std::process::Stdio;

use tokio::process::Command;

/// Spawn the platform URL opener for `url`, fire-and-forget.
///
/// Failures are logged and otherwise ignored; the UI stays reachable by
/// visiting the address manually.
pub fn open(url: String) {
    tokio::spawn(async move {
        let mut command = opener(&url);
        command.stdout(Stdio::null()).stderr(Stdio::null());
        match command.status().await {
            Ok(status) if !status.success() => {
                tracing::warn!(%url, code = status.code().unwrap_or(-1), "browser opener exited non-zero");
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "failed to run browser opener");
            }
            Ok(_) => {}
        }
    });
}

fn opener(url: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        // `start` treats its first quoted argument as a window title.
        c.args(["/C", "start", ""]).arg(url);
        c
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(url);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(all(unix, not(target_os = "macos")))]
    fn opener_uses_xdg_open_on_linux() {
        let command = opener("http://127.0.0.1:5000/");
        assert_eq!(command.as_std().get_program(), "xdg-open");
    }
}
