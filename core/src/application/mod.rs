//! Application layer - Use case services.
//!
//! This module contains application services that orchestrate
//! domain logic and adapter interactions:
//! - Accept raw caller input and validate it into domain types
//! - Use ports (traits) for external dependencies
//! - Return domain types as outputs

mod port_manager;

pub use port_manager::PortManager;
