//! Port inspection and termination engine.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::adapters::{mentions_network, Adapter, SystemCommandRunner};
use crate::config::ManagerConfig;
use crate::domain::{validate_pid, validate_port, NumericInput, Process, ProcessDetails};
use crate::error::{Error, Result};
use crate::platform::{select_adapter_for, PlatformKind};
use crate::ports::{CommandRunner, PlatformAdapter};

/// Operation label attached to network errors raised by [`PortManager::check_port`].
const PORT_CHECK_OPERATION: &str = "port check";

/// Entry point for looking up and terminating the processes on a port.
///
/// The platform adapter is selected lazily on the first operation (or an
/// explicit [`init`](Self::init)) and kept for the manager's lifetime. A
/// failed initialization leaves the manager uninitialized.
pub struct PortManager<R = SystemCommandRunner> {
    runner: R,
    config: ManagerConfig,
    os: String,
    adapter: RwLock<Option<Arc<Adapter<R>>>>,
}

impl PortManager<SystemCommandRunner> {
    /// Create a manager that runs real system commands with default timing.
    pub fn new() -> Self {
        Self::with_runner(SystemCommandRunner::new(), ManagerConfig::default())
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        Self::with_runner(SystemCommandRunner::new(), config)
    }
}

impl Default for PortManager<SystemCommandRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner + Clone> PortManager<R> {
    pub fn with_runner(runner: R, config: ManagerConfig) -> Self {
        Self {
            runner,
            config,
            os: std::env::consts::OS.to_string(),
            adapter: RwLock::new(None),
        }
    }

    /// Select the adapter for `os` instead of the host's OS identifier.
    ///
    /// The adapter's compatibility check still looks at the real host.
    pub fn for_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.adapter.read().is_some()
    }

    /// OS family of the selected adapter, once initialized.
    pub fn platform(&self) -> Option<PlatformKind> {
        self.adapter.read().as_ref().map(|a| a.kind())
    }

    /// Select and verify the platform adapter. Idempotent.
    pub fn init(&self) -> Result<PlatformKind> {
        self.adapter().map(|a| a.kind())
    }

    fn adapter(&self) -> Result<Arc<Adapter<R>>> {
        if let Some(adapter) = self.adapter.read().as_ref() {
            return Ok(Arc::clone(adapter));
        }

        let mut slot = self.adapter.write();
        if let Some(adapter) = slot.as_ref() {
            return Ok(Arc::clone(adapter));
        }

        let factory = select_adapter_for(&self.os).map_err(|e| match e {
            e @ Error::System { .. } => e,
            other => Error::system(format!("Failed to initialize port manager: {}", other)),
        })?;

        let adapter = factory.build(self.runner.clone(), &self.config);
        if !adapter.is_compatible() {
            return Err(Error::system(format!(
                "The {} adapter is not compatible with this host ({})",
                adapter.kind(),
                std::env::consts::OS
            )));
        }

        debug!(platform = %adapter.kind(), "Port manager initialized");
        let adapter = Arc::new(adapter);
        *slot = Some(Arc::clone(&adapter));
        Ok(adapter)
    }

    /// List the processes bound to `port`.
    pub async fn check_port(&self, port: impl Into<NumericInput>) -> Result<Vec<Process>> {
        let input = port.into();
        let adapter = self.adapter()?;
        let port = validate_port(input)?;

        debug!(port = port, "Checking port");
        adapter
            .find_process_by_port(port)
            .await
            .map_err(|e| normalize(e, Some(port)))
    }

    /// Terminate `pid`. `Ok(false)` means it survived the forced signal.
    pub async fn kill_process(&self, pid: impl Into<NumericInput>) -> Result<bool> {
        let input = pid.into();
        let adapter = self.adapter()?;
        let pid = validate_pid(input)?;

        debug!(pid = pid, "Killing process");
        adapter.kill_process(pid).await.map_err(|e| normalize(e, None))
    }

    pub async fn get_process_details(&self, pid: impl Into<NumericInput>) -> Result<ProcessDetails> {
        let input = pid.into();
        let adapter = self.adapter()?;
        let pid = validate_pid(input)?;

        adapter
            .get_process_details(pid)
            .await
            .map_err(|e| normalize(e, None))
    }

    /// Whether nothing is bound to `port`.
    pub async fn is_port_available(&self, port: impl Into<NumericInput>) -> Result<bool> {
        Ok(self.check_port(port).await?.is_empty())
    }
}

/// Pass taxonomy errors through; wrap everything else as a system error, or
/// as a network error for port checks whose message hints at the network.
fn normalize(err: Error, checked_port: Option<u16>) -> Error {
    if err.is_taxonomy() {
        return err;
    }

    let message = err.to_string();
    if let Some(port) = checked_port {
        if mentions_network(&message) || message.to_lowercase().contains("unreachable") {
            return Error::network(message, Some(port), PORT_CHECK_OPERATION);
        }
    }
    Error::system(message)
}
