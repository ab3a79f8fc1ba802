//! Child process lifecycle management for the Slipway desktop launcher.
//!
//! Handles free-port discovery, start-script resolution, and the launch /
//! status / stop lifecycle of sibling sub-applications.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod backend;
pub mod error;
pub mod platform;
pub mod port;
pub mod record;
pub mod registry;

pub use backend::{ScriptBackend, ShellBackend};
pub use error::LaunchError;
pub use platform::Platform;
pub use port::{find_free_port, PortRange};
pub use record::{AppStatus, LaunchRecord, Launched, RecordSnapshot, StatusReport, StopOutcome};
pub use registry::{Registry, RegistryConfig};
