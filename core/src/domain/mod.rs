//! Domain layer - Pure data models and validation.
//!
//! This module contains domain entities that represent core business concepts.
//! These types have no I/O dependencies and can be tested in isolation.

mod process;
pub mod validation;

// Re-export all domain types
pub use process::{Process, ProcessDetails, Protocol};
pub use validation::{validate_pid, validate_port, NumericInput};
