//! Platform adapter port (interface).

use crate::domain::{Process, ProcessDetails};
use crate::error::Result;
use crate::platform::PlatformKind;

/// Capability set every OS-family adapter provides.
///
/// Callers validate ports and PIDs before calling in; adapters classify raw
/// tool failures into the crate's error taxonomy.
pub trait PlatformAdapter: Send + Sync {
    /// OS family this adapter targets.
    fn kind(&self) -> PlatformKind;

    /// Find the processes bound to `port`. An empty list means the port is free.
    fn find_process_by_port(
        &self,
        port: u16,
    ) -> impl std::future::Future<Output = Result<Vec<Process>>> + Send;

    /// Look up the owner, name and command line of a single process.
    fn get_process_details(
        &self,
        pid: u32,
    ) -> impl std::future::Future<Output = Result<ProcessDetails>> + Send;

    /// Terminate a process, gracefully first and forcefully if it survives.
    ///
    /// Returns `Ok(false)` when the process is still running after the forced
    /// signal.
    fn kill_process(&self, pid: u32) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Whether the host OS belongs to this adapter's family. Never fails.
    fn is_compatible(&self) -> bool {
        PlatformKind::current().map_or(false, |host| host == self.kind())
    }
}
