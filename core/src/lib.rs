//! freeport Core Library
//!
//! Finds the processes bound to a local TCP/UDP port and terminates them.
//! Provides functionality to:
//! - Look up the processes holding a port
//! - Inspect a single process (owner, name, command line)
//! - Kill a process gracefully, escalating to a forced kill if it survives
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure data models and validation
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: External system implementations
//! - `application`: Use case services
//!
//! # Platform Support
//! - Linux, macOS, BSD: Uses `lsof`, `ps` and `kill` commands
//! - Windows: Uses `netstat`, `tasklist` and `taskkill` commands

// Hexagonal architecture layers
pub mod domain;
pub mod ports;
pub mod adapters;
pub mod application;

pub mod config;
pub mod error;
pub mod platform;

#[cfg(test)]
pub(crate) mod testing;

// Re-export domain types (primary API)
pub use domain::{validate_pid, validate_port, NumericInput, Process, ProcessDetails, Protocol};

// Re-export other commonly used types
pub use adapters::{Adapter, SystemCommandRunner, UnixAdapter, WindowsAdapter};
pub use application::PortManager;
pub use config::ManagerConfig;
pub use error::{Error, ErrorKind, Result};
pub use platform::{detect, select_adapter, PlatformKind};
pub use ports::{CommandOutput, CommandRunner, Invocation, PlatformAdapter};
