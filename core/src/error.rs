//! Error types for the freeport-core library.

use thiserror::Error;

/// Result type alias for freeport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Discriminant of an [`Error`], for callers that only care about the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Permission,
    System,
    Network,
    UnsupportedPlatform,
    Json,
}

/// Errors that can occur while inspecting ports or terminating processes.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed caller input (bad port or PID).
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Insufficient OS privilege to inspect or terminate.
    #[error("Permission denied: {message}")]
    Permission { message: String, pid: Option<u32> },

    /// A diagnostic or termination tool is missing, misbehaved, or produced
    /// output we could not make sense of.
    #[error("{message}")]
    System {
        message: String,
        command: Option<String>,
        exit_code: Option<i32>,
    },

    /// A lookup failure that points at the networking layer.
    #[error("Network error during {operation}: {message}")]
    Network {
        message: String,
        port: Option<u16>,
        operation: String,
    },

    /// Host OS is neither a Unix nor a Windows family system.
    #[error("Platform not supported: {0}")]
    UnsupportedPlatform(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn permission(message: impl Into<String>, pid: Option<u32>) -> Self {
        Error::Permission {
            message: message.into(),
            pid,
        }
    }

    /// A system error with no command context.
    pub fn system(message: impl Into<String>) -> Self {
        Error::System {
            message: message.into(),
            command: None,
            exit_code: None,
        }
    }

    /// A system error attributed to a specific command invocation.
    pub fn command_failed(
        message: impl Into<String>,
        command: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Error::System {
            message: message.into(),
            command: Some(command.into()),
            exit_code,
        }
    }

    pub fn network(
        message: impl Into<String>,
        port: Option<u16>,
        operation: impl Into<String>,
    ) -> Self {
        Error::Network {
            message: message.into(),
            port,
            operation: operation.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Permission { .. } => ErrorKind::Permission,
            Error::System { .. } => ErrorKind::System,
            Error::Network { .. } => ErrorKind::Network,
            Error::UnsupportedPlatform(_) => ErrorKind::UnsupportedPlatform,
            Error::Json(_) => ErrorKind::Json,
        }
    }

    /// Whether this error already belongs to the four-kind taxonomy exposed
    /// to callers (validation, permission, system, network).
    pub fn is_taxonomy(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::Permission | ErrorKind::System | ErrorKind::Network
        )
    }
}
