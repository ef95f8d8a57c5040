//! External command execution port (interface).

use std::fmt;

/// A single external command to run: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Stdout and stderr joined, for keyword matching.
    pub fn combined(&self) -> String {
        format!("{} {}", self.stdout, self.stderr)
    }
}

/// Port for running external diagnostic and termination tools.
///
/// Implementations must not interpret the output; classification happens in
/// the adapters right after the call returns. A spawn failure (e.g. the tool
/// is not installed) is reported as an `Err`.
pub trait CommandRunner: Send + Sync {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl std::future::Future<Output = std::io::Result<CommandOutput>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display_quotes_spaces() {
        let inv = Invocation::new("tasklist", ["/FI", "PID eq 42", "/FO", "CSV", "/NH"]);
        assert_eq!(inv.to_string(), "tasklist /FI \"PID eq 42\" /FO CSV /NH");

        let inv = Invocation::new("lsof", ["-i", ":3000", "-P", "-n"]);
        assert_eq!(inv.to_string(), "lsof -i :3000 -P -n");
    }

    #[test]
    fn test_output_success() {
        let ok = CommandOutput {
            status: Some(0),
            ..Default::default()
        };
        assert!(ok.success());
        let signalled = CommandOutput::default();
        assert!(!signalled.success());
    }
}
