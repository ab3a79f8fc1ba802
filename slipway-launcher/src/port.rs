//! Loopback port scanning.

use tokio::net::TcpListener;

use crate::LaunchError;

/// Half-open range of candidate ports, scanned lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    /// First candidate port, inclusive.
    pub start: u16,
    /// Upper bound, exclusive.
    pub end: u16,
}

impl PortRange {
    /// Default scan range for sub-application ports.
    pub const DEFAULT: Self = Self { start: 8000, end: 9000 };
}

impl Default for PortRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Find the first port in `range` that accepts a loopback bind.
///
/// Ports listed in `leased` are skipped without probing, so a port already
/// handed to a child that has not bound it yet is not handed out twice by
/// this process. The successful probe bind is released immediately; the
/// contract only guarantees the port was free at check time — another
/// process can still take it before the child binds.
///
/// # Errors
/// Returns [`LaunchError::NoFreePorts`] when every candidate in the range is
/// leased or already bound.
pub async fn find_free_port(range: PortRange, leased: &[u16]) -> Result<u16, LaunchError> {
    for port in range.start..range.end {
        if leased.contains(&port) {
            continue;
        }
        if let Ok(listener) = TcpListener::bind(("127.0.0.1", port)).await {
            drop(listener);
            return Ok(port);
        }
    }
    Err(LaunchError::NoFreePorts { start: range.start, end: range.end })
}
