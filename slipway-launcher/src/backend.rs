//! Process spawn backend abstraction.
//!
//! The registry talks to child processes through this seam so its lifecycle
//! logic can be exercised in tests without touching the real platform shell.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};

use crate::{LaunchError, Platform};

/// Spawns application start scripts as background child processes.
#[async_trait]
pub trait ScriptBackend: Send + Sync {
    /// Spawn `script` with `port` exported to the child as the `PORT`
    /// environment variable. The child inherits the rest of the parent
    /// environment.
    ///
    /// # Errors
    /// Returns [`LaunchError::Spawn`] when the OS cannot create the process.
    async fn spawn(&self, app: &str, script: &Path, port: u16) -> Result<Child, LaunchError>;
}

/// Spawns scripts through the platform shell interpreter.
///
/// `cmd /C <script>` on Windows, `sh <script>` on Unix. Standard output and
/// error are discarded and the child runs detached in the background;
/// dropping the handle does not terminate it.
#[derive(Debug, Clone, Copy)]
pub struct ShellBackend {
    platform: Platform,
}

impl ShellBackend {
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl ScriptBackend for ShellBackend {
    async fn spawn(&self, app: &str, script: &Path, port: u16) -> Result<Child, LaunchError> {
        let mut command = match self.platform {
            Platform::Windows => {
                let mut c = Command::new("cmd");
                c.arg("/C").arg(script);
                c
            }
            Platform::Unix => {
                let mut c = Command::new("sh");
                c.arg(script);
                c
            }
        };

        command
            .env("PORT", port.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| LaunchError::Spawn { app: app.to_owned(), reason: e.to_string() })
    }
}
