//! Error types for the launcher crate.

use std::path::PathBuf;

/// Errors that can occur while launching a sub-application.
///
/// Each variant is fatal to the launch call that produced it and to nothing
/// else; callers receive these as values, never as panics.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LaunchError {
    /// Host operating system is not one the launcher knows how to start
    /// scripts on.
    #[error("unsupported operating system: {os}")]
    UnsupportedPlatform { os: String },

    /// The expected start script is missing on disk.
    #[error("startup script not found for {app} at {path}")]
    ScriptNotFound { app: String, path: PathBuf },

    /// Every candidate port in the scanned range was already bound.
    #[error("no free ports available between {start} and {end}")]
    NoFreePorts { start: u16, end: u16 },

    /// The OS failed to create the child process.
    #[error("failed to launch {app}: {reason}")]
    Spawn { app: String, reason: String },
}

impl LaunchError {
    /// Stable machine-readable discriminant for serialized error payloads.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            LaunchError::UnsupportedPlatform { .. } => "unsupported_platform",
            LaunchError::ScriptNotFound { .. } => "script_not_found",
            LaunchError::NoFreePorts { .. } => "no_free_ports",
            LaunchError::Spawn { .. } => "spawn_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_error_display_includes_context() {
        let err = LaunchError::ScriptNotFound {
            app: "Alpha".to_owned(),
            path: PathBuf::from("apps/Alpha/run.sh"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Alpha"), "Display must include the app name");
        assert!(msg.contains("run.sh"), "Display must include the script path");
    }

    #[test]
    fn launch_error_kind_is_stable_per_variant() {
        let err = LaunchError::NoFreePorts { start: 8000, end: 9000 };
        assert_eq!(err.kind(), "no_free_ports");

        let err = LaunchError::Spawn {
            app: "Alpha".to_owned(),
            reason: "exec failed".to_owned(),
        };
        assert_eq!(err.kind(), "spawn_failed");

        let err = LaunchError::UnsupportedPlatform { os: "plan9".to_owned() };
        assert_eq!(err.kind(), "unsupported_platform");
    }
}
