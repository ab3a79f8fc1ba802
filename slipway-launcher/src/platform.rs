//! Host platform detection and the start-script convention.
//!
//! Each launchable application is a directory under the apps root carrying a
//! platform-specific start script: `run.bat` on Windows, `run.sh` on Unix
//! systems. The script must bind the port handed to it via the `PORT`
//! environment variable.

use std::path::{Path, PathBuf};

use crate::LaunchError;

/// Operating system families the launcher can start scripts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// Classify the host the launcher is running on.
    ///
    /// # Errors
    /// Returns [`LaunchError::UnsupportedPlatform`] when the host OS is not
    /// recognized.
    pub fn host() -> Result<Self, LaunchError> {
        Self::from_os(std::env::consts::OS)
    }

    /// Classify an OS name as reported by [`std::env::consts::OS`].
    ///
    /// # Errors
    /// Returns [`LaunchError::UnsupportedPlatform`] for any name other than
    /// `windows`, `linux`, or `macos`.
    pub fn from_os(os: &str) -> Result<Self, LaunchError> {
        match os {
            "windows" => Ok(Self::Windows),
            "linux" | "macos" => Ok(Self::Unix),
            other => Err(LaunchError::UnsupportedPlatform { os: other.to_owned() }),
        }
    }

    /// File name of the per-app start script on this platform.
    #[must_use]
    pub fn script_name(self) -> &'static str {
        match self {
            Self::Windows => "run.bat",
            Self::Unix => "run.sh",
        }
    }

    /// Path of the start script for `app` under `apps_dir`.
    #[must_use]
    pub fn script_path(self, apps_dir: &Path, app: &str) -> PathBuf {
        apps_dir.join(app).join(self.script_name())
    }
}
