//! Launch registry — tracks at most one child process per application name.

use std::path::PathBuf;
use std::time::Duration;

use indexmap::IndexMap;
use tokio::process::Child;
use tokio::sync::Mutex;

use crate::backend::{ScriptBackend, ShellBackend};
use crate::port::{find_free_port, PortRange};
use crate::record::{AppStatus, LaunchRecord, Launched, RecordSnapshot, StatusReport, StopOutcome};
use crate::{LaunchError, Platform};

/// Default grace period between the termination request and the forced kill.
const STOP_GRACE: Duration = Duration::from_secs(1);

/// Settings for a [`Registry`].
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Directory holding one sub-directory per launchable application.
    pub apps_dir: PathBuf,
    /// Ports scanned when assigning a port to a new child.
    pub ports: PortRange,
    /// How long a stopped child gets to exit before it is killed.
    pub grace: Duration,
}

impl RegistryConfig {
    /// Config with the default port range and grace period.
    #[must_use]
    pub fn new(apps_dir: impl Into<PathBuf>) -> Self {
        Self {
            apps_dir: apps_dir.into(),
            ports: PortRange::DEFAULT,
            grace: STOP_GRACE,
        }
    }
}

/// In-memory registry of launched sub-applications.
///
/// Owned by the server for its lifetime and passed by handle into request
/// handlers; all operations take `&self` and serialize on a single async
/// mutex, so concurrent requests are safe. Records are never removed — a
/// name that exited or was stopped keeps its record until it is relaunched,
/// which silently replaces it.
pub struct Registry<B: ScriptBackend = ShellBackend> {
    backend: B,
    platform: Platform,
    config: RegistryConfig,
    entries: Mutex<IndexMap<String, LaunchRecord>>,
}

impl Registry<ShellBackend> {
    /// Registry for the running host, spawning through the platform shell.
    ///
    /// # Errors
    /// Returns [`LaunchError::UnsupportedPlatform`] when the host OS is not
    /// recognized.
    pub fn for_host(config: RegistryConfig) -> Result<Self, LaunchError> {
        let platform = Platform::host()?;
        Ok(Self::with_backend(ShellBackend::new(platform), platform, config))
    }
}

impl<B: ScriptBackend> Registry<B> {
    /// Registry with an explicit backend and platform.
    #[must_use]
    pub fn with_backend(backend: B, platform: Platform, config: RegistryConfig) -> Self {
        Self {
            backend,
            platform,
            config,
            entries: Mutex::new(IndexMap::new()),
        }
    }

    /// Settings this registry was built with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Launch the named application on a freshly allocated port.
    ///
    /// Allocation and spawn happen under the registry lock, so two in-flight
    /// launches can never be handed the same port. A failed launch inserts
    /// no record. Relaunching a name whose child is still running replaces
    /// the record and leaves the previous child running untracked.
    ///
    /// # Errors
    /// Returns [`LaunchError::ScriptNotFound`] when the start script is
    /// missing, [`LaunchError::NoFreePorts`] when the scan range is
    /// exhausted, or [`LaunchError::Spawn`] when the OS cannot create the
    /// process.
    pub async fn launch(&self, name: &str) -> Result<Launched, LaunchError> {
        let script = self.platform.script_path(&self.config.apps_dir, name);
        if !script.exists() {
            return Err(LaunchError::ScriptNotFound {
                app: name.to_owned(),
                path: script,
            });
        }

        let mut entries = self.entries.lock().await;

        let leased: Vec<u16> = entries
            .values()
            .filter(|r| r.status == AppStatus::Running)
            .map(|r| r.port)
            .collect();
        let port = find_free_port(self.config.ports, &leased).await?;

        let child = self.backend.spawn(name, &script, port).await?;
        let record = LaunchRecord::new(port, child);
        let launched = Launched { launch_id: record.launch_id, port };

        if let Some(displaced) = entries.insert(name.to_owned(), record) {
            if displaced.status == AppStatus::Running {
                tracing::warn!(
                    app = name,
                    old_port = displaced.port,
                    "relaunch displaced a record that was still running; the old child is now untracked"
                );
            }
        }
        tracing::info!(app = name, port, "launched");

        Ok(launched)
    }

    /// Report liveness of the named application.
    ///
    /// Polls the child without blocking. This is pull-based: staleness
    /// between actual process death and the observed status is bounded only
    /// by how often callers poll.
    pub async fn status(&self, name: &str) -> StatusReport {
        let mut entries = self.entries.lock().await;
        let Some(record) = entries.get_mut(name) else {
            return StatusReport::NotLaunched;
        };

        match record.child.try_wait() {
            Ok(None) => StatusReport::Running { port: record.port },
            Ok(Some(exit)) => {
                record.status = AppStatus::Exited;
                StatusReport::Exited { port: record.port, exit_code: exit.code() }
            }
            Err(e) => {
                tracing::warn!(app = name, error = %e, "liveness poll failed");
                record.status = AppStatus::Exited;
                StatusReport::Exited { port: record.port, exit_code: None }
            }
        }
    }

    /// Stop the named application: ask it to exit, then kill it if it is
    /// still alive once the grace period lapses.
    ///
    /// The grace sleep happens under the registry lock, blocking other
    /// registry calls for its duration. One escalation, no retries.
    pub async fn stop(&self, name: &str) -> StopOutcome {
        let mut entries = self.entries.lock().await;
        let Some(record) = entries.get_mut(name) else {
            return StopOutcome::NotLaunched;
        };

        match record.child.try_wait() {
            Ok(None) => {}
            _ => return StopOutcome::NotRunning,
        }

        request_exit(&mut record.child);
        tokio::time::sleep(self.config.grace).await;

        let forced = match record.child.try_wait() {
            Ok(None) => {
                if let Err(e) = record.child.start_kill() {
                    tracing::warn!(app = name, error = %e, "forced kill failed");
                }
                true
            }
            _ => false,
        };
        let _ = record.child.wait().await;

        record.status = AppStatus::Stopped;
        tracing::info!(app = name, forced, "stopped");
        StopOutcome::Stopped { forced }
    }

    /// Snapshot of every known record, oldest launch first.
    pub async fn entries(&self) -> Vec<RecordSnapshot> {
        let entries = self.entries.lock().await;
        entries
            .iter()
            .map(|(name, record)| RecordSnapshot {
                name: name.clone(),
                launch_id: record.launch_id,
                port: record.port,
                launched_at: record.launched_at,
                status: record.status,
            })
            .collect()
    }

    /// Names under the apps directory that carry a start script for this
    /// platform, sorted. A missing apps directory yields an empty list.
    pub async fn discover(&self) -> Vec<String> {
        let mut names = Vec::new();
        let Ok(mut dir) = tokio::fs::read_dir(&self.config.apps_dir).await else {
            return names;
        };
        while let Ok(Some(entry)) = dir.next_entry().await {
            if entry.path().join(self.platform.script_name()).exists() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_owned());
                }
            }
        }
        names.sort();
        names
    }

    /// Stop every tracked child that is still running.
    ///
    /// Called by the owning server on shutdown so children do not outlive
    /// the session.
    pub async fn shutdown(&self) {
        let names: Vec<String> = self.entries.lock().await.keys().cloned().collect();
        for name in names {
            if let StopOutcome::Stopped { forced } = self.stop(&name).await {
                tracing::info!(app = %name, forced, "stopped during shutdown");
            }
        }
    }
}

/// Ask the child to exit without waiting for it.
///
/// SIGTERM on Unix. Windows console scripts have no graceful equivalent, so
/// the request there is an immediate kill, matching the platform's
/// terminate semantics.
#[cfg(unix)]
fn request_exit(child: &mut Child) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else { return };
    let Ok(raw) = i32::try_from(pid) else { return };
    if let Err(e) = kill(Pid::from_raw(raw), Signal::SIGTERM) {
        tracing::warn!(pid = raw, error = %e, "graceful termination signal failed");
    }
}

#[cfg(not(unix))]
fn request_exit(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        tracing::warn!(error = %e, "termination request failed");
    }
}
