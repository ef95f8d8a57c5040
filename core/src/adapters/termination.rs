//! Two-phase process termination shared by all adapters.
//!
//! 1. Send the graceful signal (SIGTERM / `taskkill`)
//! 2. Wait for the graceful grace period
//! 3. If the process is gone, report success
//! 4. Otherwise send the forced signal (SIGKILL / `taskkill /F`)
//! 5. Wait for the shorter forced grace period
//! 6. Report whether the process is gone

use tokio::time::sleep;
use tracing::debug;

use crate::config::ManagerConfig;
use crate::error::Result;

/// Strength of a termination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Signal {
    Graceful,
    Forced,
}

/// What the terminate command reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignalOutcome {
    /// The request was accepted.
    Delivered,
    /// The process no longer exists.
    AlreadyGone,
    /// The graceful request was refused because only a forced kill works.
    ForceRequired,
}

/// Platform hooks the state machine drives.
pub(crate) trait Terminator: Sync {
    /// Deliver `signal` to `pid`. Permission and unexpected failures are errors.
    fn send_signal(
        &self,
        pid: u32,
        signal: Signal,
    ) -> impl std::future::Future<Output = Result<SignalOutcome>> + Send;

    /// Best-effort liveness check. Any failure reads as "not running".
    fn is_process_running(&self, pid: u32) -> impl std::future::Future<Output = bool> + Send;
}

/// Terminate `pid`, escalating to the forced signal only if it survives.
pub(crate) async fn terminate<T: Terminator>(
    terminator: &T,
    pid: u32,
    config: &ManagerConfig,
) -> Result<bool> {
    debug!(pid = pid, "Attempting graceful kill");

    match terminator.send_signal(pid, Signal::Graceful).await? {
        SignalOutcome::AlreadyGone => {
            debug!(pid = pid, "Process not found, already terminated");
            return Ok(true);
        }
        SignalOutcome::ForceRequired => {
            debug!(pid = pid, "Graceful signal refused, forced kill required");
        }
        SignalOutcome::Delivered => {
            debug!(pid = pid, "Graceful signal sent, waiting for process to terminate");
        }
    }

    sleep(config.graceful_wait()).await;

    if !terminator.is_process_running(pid).await {
        debug!(pid = pid, "Process terminated after graceful signal");
        return Ok(true);
    }

    debug!(pid = pid, "Process still running, sending forced signal");
    if terminator.send_signal(pid, Signal::Forced).await? == SignalOutcome::AlreadyGone {
        debug!(pid = pid, "Process not found during force kill");
        return Ok(true);
    }

    sleep(config.force_wait()).await;

    let running = terminator.is_process_running(pid).await;
    debug!(pid = pid, running = running, "Liveness after forced signal");
    Ok(!running)
}
