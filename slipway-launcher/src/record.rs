//! Launch records and the serializable outcome types of registry operations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::process::Child;
use uuid::Uuid;

/// Last observed lifecycle state of a tracked child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppStatus {
    /// Spawned and not yet observed dead.
    Running,
    /// Observed dead on a liveness poll.
    Exited,
    /// Terminated by an explicit stop request.
    Stopped,
}

/// One tracked sub-application process.
///
/// Created on launch and kept for the life of the registry, even after the
/// child exits. Dropping a record does NOT terminate the child; a record
/// displaced by a relaunch leaves its process running untracked.
#[derive(Debug)]
pub struct LaunchRecord {
    /// Identifier for this particular launch; a relaunch gets a fresh one.
    pub launch_id: Uuid,
    /// Port handed to the child via the `PORT` environment variable.
    /// Immutable after launch.
    pub port: u16,
    /// When the child was spawned.
    pub launched_at: DateTime<Utc>,
    /// Last observed lifecycle state.
    pub status: AppStatus,
    /// The spawned child process.
    pub(crate) child: Child,
}

impl LaunchRecord {
    pub(crate) fn new(port: u16, child: Child) -> Self {
        Self {
            launch_id: Uuid::new_v4(),
            port,
            launched_at: Utc::now(),
            status: AppStatus::Running,
            child,
        }
    }
}

/// Successful launch payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Launched {
    /// Identifier of the launch that was just recorded.
    pub launch_id: Uuid,
    /// Port assigned to the child.
    pub port: u16,
}

/// Liveness report for a named application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusReport {
    /// No launch record exists for the name.
    NotLaunched,
    /// The child process was alive at poll time.
    Running { port: u16 },
    /// The child has terminated. `exit_code` is `None` when it was killed by
    /// a signal rather than exiting on its own.
    Exited { port: u16, exit_code: Option<i32> },
}

/// Outcome of a stop request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StopOutcome {
    /// No launch record exists for the name.
    NotLaunched,
    /// A record exists but its process had already terminated.
    NotRunning,
    /// The process was terminated. `forced` is set when the grace period
    /// lapsed and the child had to be killed.
    #[serde(rename = "success")]
    Stopped { forced: bool },
}

/// Serializable snapshot of one registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSnapshot {
    pub name: String,
    pub launch_id: Uuid,
    pub port: u16,
    pub launched_at: DateTime<Utc>,
    pub status: AppStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_report_serializes_with_status_tag() {
        let report = StatusReport::Running { port: 8001 };
        let json = match serde_json::to_value(&report) {
            Ok(v) => v,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(json["status"], "running");
        assert_eq!(json["port"], 8001);
    }

    #[test]
    fn exited_report_carries_nullable_exit_code() {
        let voluntary = StatusReport::Exited { port: 8002, exit_code: Some(0) };
        let json = match serde_json::to_value(&voluntary) {
            Ok(v) => v,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(json["status"], "exited");
        assert_eq!(json["exit_code"], 0);

        let signaled = StatusReport::Exited { port: 8002, exit_code: None };
        let json = match serde_json::to_value(&signaled) {
            Ok(v) => v,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert!(json["exit_code"].is_null(), "signal death must serialize exit_code as null");
    }

    #[test]
    fn stop_outcome_success_variant_uses_success_tag() {
        let json = match serde_json::to_value(StopOutcome::Stopped { forced: false }) {
            Ok(v) => v,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(json["status"], "success");

        let json = match serde_json::to_value(StopOutcome::NotRunning) {
            Ok(v) => v,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(json["status"], "not_running");
    }
}
