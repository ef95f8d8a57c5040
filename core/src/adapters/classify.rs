//! Classification of raw command failures into the error taxonomy.
//!
//! Adapters call these right after a command returns so that nothing past the
//! adapter boundary ever sees a raw `CommandOutput` or `io::Error`.

use std::io;

use crate::error::Error;
use crate::ports::{CommandOutput, Invocation};

/// Substrings (lowercase) that mean the OS refused access.
const PERMISSION_MARKERS: &[&str] = &[
    "permission denied",
    "operation not permitted",
    "access is denied",
    "access denied",
];

/// Substrings (lowercase) that point at the networking layer.
const NETWORK_MARKERS: &[&str] = &["network", "connection", "timeout", "timed out"];

/// Substrings (lowercase) a socket lister prints for a malformed port.
const BAD_PORT_MARKERS: &[&str] = &[
    "unacceptable port",
    "invalid port",
    "bad port",
    "malformed",
];

/// Exit status socket listers use for "nothing matched".
const NO_MATCH_STATUS: i32 = 1;

fn contains_any(haystack: &str, markers: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    markers.iter().any(|m| lower.contains(m))
}

pub(crate) fn is_permission_denied(text: &str) -> bool {
    contains_any(text, PERMISSION_MARKERS)
}

/// Whether a message suggests a network-layer failure.
pub(crate) fn mentions_network(text: &str) -> bool {
    contains_any(text, NETWORK_MARKERS)
}

/// The tool's conventional "no matches" result: status 1 with nothing on stdout.
pub(crate) fn is_no_match(output: &CommandOutput) -> bool {
    output.status == Some(NO_MATCH_STATUS) && output.stdout.trim().is_empty()
}

/// Map a failure to spawn a command.
pub(crate) fn spawn_failure(invocation: &Invocation, err: &io::Error, install_hint: &str) -> Error {
    match err.kind() {
        io::ErrorKind::NotFound => Error::command_failed(
            format!(
                "{} is not installed or not on PATH. {}",
                invocation.program, install_hint
            ),
            invocation.to_string(),
            None,
        ),
        io::ErrorKind::PermissionDenied => Error::permission(
            format!("not allowed to execute {}", invocation.program),
            None,
        ),
        _ => Error::command_failed(
            format!("failed to run {}: {}", invocation, err),
            invocation.to_string(),
            None,
        ),
    }
}

/// Generic failure wrapping the command string and exit code.
pub(crate) fn unexpected_failure(invocation: &Invocation, output: &CommandOutput) -> Error {
    let detail = output.stderr.trim();
    let detail = if detail.is_empty() {
        output.stdout.trim()
    } else {
        detail
    };
    let status = output
        .status
        .map_or_else(|| "a signal".to_string(), |c| format!("status {}", c));
    let message = if detail.is_empty() {
        format!("{} exited with {}", invocation, status)
    } else {
        format!("{} exited with {}: {}", invocation, status, detail)
    };
    Error::command_failed(message, invocation.to_string(), output.status)
}

/// Classify a failed port lookup by its output, most specific cause first.
///
/// Returns `None` when nothing recognizable was printed; the caller decides
/// between "no matches" and [`unexpected_failure`].
pub(crate) fn lookup_failure(
    invocation: &Invocation,
    output: &CommandOutput,
    port: u16,
    operation: &str,
) -> Option<Error> {
    let text = output.combined();
    let text = text.trim();

    if is_permission_denied(text) {
        return Some(Error::permission(
            format!("{} reported: {}", invocation.program, text),
            None,
        ));
    }
    if mentions_network(text) {
        return Some(Error::network(text.to_string(), Some(port), operation));
    }
    if contains_any(text, BAD_PORT_MARKERS) {
        return Some(Error::validation("port", text.to_string()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::fail;

    fn lsof() -> Invocation {
        Invocation::new("lsof", ["-i", ":3000", "-P", "-n"])
    }

    #[test]
    fn test_no_match_convention() {
        assert!(is_no_match(&fail(1, "", "")));
        assert!(is_no_match(&fail(1, "  \n", "")));
        assert!(!is_no_match(&fail(1, "COMMAND PID", "")));
        assert!(!is_no_match(&fail(2, "", "")));
    }

    #[test]
    fn test_spawn_not_found_names_tool() {
        let err = io::Error::new(io::ErrorKind::NotFound, "nope");
        let e = spawn_failure(&lsof(), &err, "Install lsof.");
        assert_eq!(e.kind(), ErrorKind::System);
        assert!(e.to_string().contains("lsof is not installed"));
        assert!(e.to_string().contains("Install lsof."));
    }

    #[test]
    fn test_lookup_failure_priority() {
        let denied = fail(1, "", "lsof: Permission denied");
        assert_eq!(
            lookup_failure(&lsof(), &denied, 3000, "op").unwrap().kind(),
            ErrorKind::Permission
        );

        let net = fail(1, "", "connection timed out");
        match lookup_failure(&lsof(), &net, 3000, "find process by port").unwrap() {
            Error::Network {
                port, operation, ..
            } => {
                assert_eq!(port, Some(3000));
                assert_eq!(operation, "find process by port");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let bad = fail(1, "", "lsof: unacceptable port specification in: -i :x");
        assert_eq!(
            lookup_failure(&lsof(), &bad, 3000, "op").unwrap().kind(),
            ErrorKind::Validation
        );

        assert!(lookup_failure(&lsof(), &fail(1, "", ""), 3000, "op").is_none());
    }

    #[test]
    fn test_unexpected_failure_carries_command_and_code() {
        match unexpected_failure(&lsof(), &fail(2, "", "boom")) {
            Error::System {
                message,
                command,
                exit_code,
            } => {
                assert!(message.contains("boom"));
                assert_eq!(command.as_deref(), Some("lsof -i :3000 -P -n"));
                assert_eq!(exit_code, Some(2));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
