//! Engine configuration.
//!
//! freeport keeps no configuration file. Callers build a [`ManagerConfig`]
//! (or deserialize one from JSON) and hand it to the engine explicitly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Pause between the graceful signal and the first liveness check.
pub const DEFAULT_GRACEFUL_WAIT_MS: u64 = 1000;

/// Pause between the forced signal and the final liveness check.
pub const DEFAULT_FORCE_WAIT_MS: u64 = 500;

/// Tunables for the port inspection and termination engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Milliseconds to wait after the graceful termination signal.
    #[serde(default = "default_graceful_wait_ms", rename = "gracefulWaitMs")]
    pub graceful_wait_ms: u64,

    /// Milliseconds to wait after the forced termination signal.
    #[serde(default = "default_force_wait_ms", rename = "forceWaitMs")]
    pub force_wait_ms: u64,
}

fn default_graceful_wait_ms() -> u64 {
    DEFAULT_GRACEFUL_WAIT_MS
}

fn default_force_wait_ms() -> u64 {
    DEFAULT_FORCE_WAIT_MS
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            graceful_wait_ms: default_graceful_wait_ms(),
            force_wait_ms: default_force_wait_ms(),
        }
    }
}

impl ManagerConfig {
    /// Parse a configuration from JSON, filling in defaults for missing keys.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn graceful_wait(&self) -> Duration {
        Duration::from_millis(self.graceful_wait_ms)
    }

    pub fn force_wait(&self) -> Duration {
        Duration::from_millis(self.force_wait_ms)
    }

    /// No pauses at all between termination steps.
    pub fn without_delays() -> Self {
        Self {
            graceful_wait_ms: 0,
            force_wait_ms: 0,
        }
    }
}
