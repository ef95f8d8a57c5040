//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with external systems. Implementations live in `adapters`.

mod adapter;
mod command;

pub use adapter::PlatformAdapter;
pub use command::{CommandOutput, CommandRunner, Invocation};
