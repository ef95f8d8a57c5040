//! Subprocess-backed command runner.

use std::io;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::ports::{CommandOutput, CommandRunner, Invocation};

/// Runs commands as real child processes via tokio.
///
/// No timeout is applied; a hung tool hangs the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    async fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        debug!(command = %invocation, "Running command");

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let result = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(command = %invocation, status = ?result.status, "Command finished");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_not_found() {
        let runner = SystemCommandRunner::new();
        let inv = Invocation::new("freeport-definitely-not-a-real-tool", Vec::<String>::new());
        let err = runner.run(&inv).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_streams_and_status() {
        let runner = SystemCommandRunner::new();
        let inv = Invocation::new("sh", ["-c", "echo out; echo err >&2; exit 3"]);
        let output = runner.run(&inv).await.unwrap();
        assert_eq!(output.status, Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert!(!output.success());
    }
}
