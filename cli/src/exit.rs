//! Exit codes and error reporting for the freeport CLI.

use std::process::ExitCode;

use freeport_core::{Error, ErrorKind};

/// Exit codes for the freeport command. 2 is left to clap for usage errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeportExitCode {
    /// Successful execution
    Success = 0,
    /// Port still in use (or the user declined to kill)
    Busy = 1,
    /// Invalid port or PID
    InvalidInput = 3,
    /// Permission denied
    PermissionDenied = 4,
    /// Tool missing or misbehaving
    SystemError = 5,
    /// Lookup failed at the network layer
    NetworkError = 6,
}

impl From<FreeportExitCode> for ExitCode {
    fn from(code: FreeportExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Exit code for an error bubbled up to `main`.
pub fn code_for(err: &anyhow::Error) -> FreeportExitCode {
    match err.downcast_ref::<Error>().map(Error::kind) {
        Some(ErrorKind::Validation) => FreeportExitCode::InvalidInput,
        Some(ErrorKind::Permission) => FreeportExitCode::PermissionDenied,
        Some(ErrorKind::Network) => FreeportExitCode::NetworkError,
        _ => FreeportExitCode::SystemError,
    }
}

/// Remedy to print under an error, if there is an obvious one.
pub fn hint(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<Error>()?.kind() {
        ErrorKind::Permission => Some(if cfg!(windows) {
            "Re-run from an Administrator shell."
        } else {
            "Re-run with sudo."
        }),
        ErrorKind::Network => Some("Check the network stack and try again."),
        _ => None,
    }
}

pub fn report(err: &anyhow::Error) {
    eprintln!("error: {}", err);
    if let Some(hint) = hint(err) {
        eprintln!("hint: {}", hint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(FreeportExitCode::Success as u8, 0);
        assert_eq!(FreeportExitCode::Busy as u8, 1);
        assert_eq!(FreeportExitCode::InvalidInput as u8, 3);
        assert_eq!(FreeportExitCode::PermissionDenied as u8, 4);
        assert_eq!(FreeportExitCode::SystemError as u8, 5);
        assert_eq!(FreeportExitCode::NetworkError as u8, 6);
    }

    #[test]
    fn test_code_for_core_errors() {
        let err = anyhow::Error::from(Error::validation("port", "bad"));
        assert_eq!(code_for(&err), FreeportExitCode::InvalidInput);

        let err = anyhow::Error::from(Error::permission("denied", Some(1)));
        assert_eq!(code_for(&err), FreeportExitCode::PermissionDenied);
        assert!(hint(&err).is_some());

        let err = anyhow::Error::from(Error::network("timeout", Some(80), "port check"));
        assert_eq!(code_for(&err), FreeportExitCode::NetworkError);

        let err = anyhow::Error::from(Error::system("lsof is not installed"));
        assert_eq!(code_for(&err), FreeportExitCode::SystemError);
        assert!(hint(&err).is_none());
    }

    #[test]
    fn test_code_for_foreign_errors() {
        let err = anyhow::anyhow!("stdout closed");
        assert_eq!(code_for(&err), FreeportExitCode::SystemError);
        assert!(hint(&err).is_none());
    }
}
