//! Unix adapter using lsof, ps and kill.
//!
//! Uses the following system commands:
//! - `lsof -i :PORT -P -n` to list sockets on a port
//! - `ps -p PID -o pid=,user=,comm=,args=` for process details
//! - `ps -p PID -o pid=` to check if a process is running
//! - `kill -TERM PID` / `kill -KILL PID` to terminate

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use super::classify;
use super::command::SystemCommandRunner;
use super::termination::{self, Signal, SignalOutcome, Terminator};
use crate::config::ManagerConfig;
use crate::domain::{Process, ProcessDetails, Protocol};
use crate::error::{Error, Result};
use crate::platform::PlatformKind;
use crate::ports::{CommandRunner, Invocation, PlatformAdapter};

const LOOKUP_OPERATION: &str = "find process by port";
const LSOF_HINT: &str =
    "Install it with your package manager (e.g. `apt install lsof` or `dnf install lsof`).";
const PS_HINT: &str = "Install procps (or your platform's ps) and try again.";
const KILL_HINT: &str = "Install procps (or your platform's kill) and try again.";

/// Adapter for Linux, macOS and the BSDs.
pub struct UnixAdapter<R = SystemCommandRunner> {
    runner: R,
    config: ManagerConfig,
}

impl<R: CommandRunner> UnixAdapter<R> {
    pub fn new(runner: R, config: ManagerConfig) -> Self {
        Self { runner, config }
    }

    fn lsof(port: u16) -> Invocation {
        Invocation::new("lsof", ["-i".to_string(), format!(":{}", port), "-P".into(), "-n".into()])
    }

    /// Parse lsof output into one `Process` per distinct PID.
    ///
    /// Expected lsof output format:
    /// ```text
    /// COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
    /// node     34805  code   19u  IPv6 0x3d8015e195af1f3f      0t0  TCP [::1]:3000 (LISTEN)
    /// ```
    ///
    /// Only listening or established TCP sockets are kept. UDP sockets have no
    /// state and are always kept.
    fn parse_lsof_output(output: &str, port: u16) -> Vec<Process> {
        let mut processes = Vec::new();
        let mut seen: HashSet<u32> = HashSet::new();

        // Skip header line
        for line in output.lines().skip(1) {
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 9 {
                continue;
            }

            let name = components[0].replace("\\x20", " ").replace("\\x2f", "/");

            let pid: u32 = match components[1].parse() {
                Ok(p) => p,
                Err(_) => continue,
            };

            let user = components[2];
            let address_type = components[4];
            let node = components[7];
            let state = components[8..].join(" ");

            let protocol = if node.eq_ignore_ascii_case("UDP") || state.to_uppercase().contains("UDP")
            {
                Protocol::Udp
            } else {
                Protocol::Tcp
            };

            let relevant = state.contains("LISTEN")
                || state.contains("ESTABLISHED")
                || protocol == Protocol::Udp;
            if !relevant {
                trace!(pid = pid, state = %state, "Skipping socket in irrelevant state");
                continue;
            }

            if !seen.insert(pid) {
                continue;
            }

            trace!(pid = pid, address_type = address_type, protocol = %protocol, "Matched socket");
            match Process::new(pid, name.clone(), user, protocol, port, name) {
                Ok(process) => processes.push(process),
                Err(e) => debug!(pid = pid, error = %e, "Discarding unparsable lsof line"),
            }
        }

        processes
    }

    /// Parse a `ps -o pid=,user=,comm=,args=` row.
    ///
    /// Fields are split on whitespace, so a `comm` containing spaces (Linux
    /// allows e.g. `tmux: server`) shifts its tail into the command.
    fn parse_ps_details(output: &str, pid: u32) -> Result<ProcessDetails> {
        let line = output.lines().map(str::trim).find(|l| !l.is_empty()).ok_or_else(|| {
            Error::system(format!("Process {} not found", pid))
        })?;

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(Error::system(format!(
                "Invalid output format from ps for process {}: '{}'",
                pid, line
            )));
        }

        let parsed_pid: u32 = fields[0].parse().map_err(|_| {
            Error::system(format!(
                "Invalid output format from ps for process {}: '{}'",
                pid, line
            ))
        })?;

        let name = fields[2].to_string();
        let args = fields[3..].join(" ");
        let command = if args.is_empty() { name.clone() } else { args };

        Ok(ProcessDetails {
            pid: parsed_pid,
            user: fields[1].to_string(),
            name,
            command,
        })
    }
}

impl<R: CommandRunner> PlatformAdapter for UnixAdapter<R> {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Unix
    }

    async fn find_process_by_port(&self, port: u16) -> Result<Vec<Process>> {
        let invocation = Self::lsof(port);
        let output = self
            .runner
            .run(&invocation)
            .await
            .map_err(|e| classify::spawn_failure(&invocation, &e, LSOF_HINT))?;

        if !output.success() {
            if let Some(err) = classify::lookup_failure(&invocation, &output, port, LOOKUP_OPERATION)
            {
                return Err(err);
            }
            if classify::is_no_match(&output) {
                debug!(port = port, "No process bound to port");
                return Ok(Vec::new());
            }
            return Err(classify::unexpected_failure(&invocation, &output));
        }

        let processes = Self::parse_lsof_output(&output.stdout, port);
        debug!(port = port, count = processes.len(), "Port lookup finished");
        Ok(processes)
    }

    async fn get_process_details(&self, pid: u32) -> Result<ProcessDetails> {
        let invocation = Invocation::new(
            "ps",
            ["-p".to_string(), pid.to_string(), "-o".into(), "pid=,user=,comm=,args=".into()],
        );
        let output = self
            .runner
            .run(&invocation)
            .await
            .map_err(|e| classify::spawn_failure(&invocation, &e, PS_HINT))?;

        if !output.success() {
            if classify::is_permission_denied(&output.combined()) {
                return Err(Error::permission(
                    format!("not allowed to inspect process {}", pid),
                    Some(pid),
                ));
            }
            if output.stdout.trim().is_empty() {
                return Err(Error::command_failed(
                    format!("Process {} not found", pid),
                    invocation.to_string(),
                    output.status,
                ));
            }
            return Err(classify::unexpected_failure(&invocation, &output));
        }

        Self::parse_ps_details(&output.stdout, pid)
    }

    async fn kill_process(&self, pid: u32) -> Result<bool> {
        termination::terminate(self, pid, &self.config).await
    }
}

impl<R: CommandRunner> Terminator for UnixAdapter<R> {
    async fn send_signal(&self, pid: u32, signal: Signal) -> Result<SignalOutcome> {
        let name = match signal {
            Signal::Graceful => "-TERM",
            Signal::Forced => "-KILL",
        };
        debug!(pid = pid, signal = name, "Sending signal to process");

        let invocation = Invocation::new("kill", [name.to_string(), pid.to_string()]);
        let output = self
            .runner
            .run(&invocation)
            .await
            .map_err(|e| classify::spawn_failure(&invocation, &e, KILL_HINT))?;

        if output.success() {
            return Ok(SignalOutcome::Delivered);
        }

        let text = output.combined();
        if text.to_lowercase().contains("no such process") {
            debug!(pid = pid, "Process not found");
            return Ok(SignalOutcome::AlreadyGone);
        }

        if classify::is_permission_denied(&text) {
            warn!(pid = pid, "Permission denied to kill process");
            return Err(Error::permission(
                format!("not allowed to signal process {}", pid),
                Some(pid),
            ));
        }

        Err(classify::unexpected_failure(&invocation, &output))
    }

    async fn is_process_running(&self, pid: u32) -> bool {
        let invocation = Invocation::new("ps", ["-p".to_string(), pid.to_string(), "-o".into(), "pid=".into()]);
        match self.runner.run(&invocation).await {
            Ok(output) => {
                // ps -p exits 0 with the pid on stdout if the process exists, 1 if not
                let running = output.success() && !output.stdout.trim().is_empty();
                debug!(pid = pid, running = running, "Process running check");
                running
            }
            Err(e) => {
                warn!(pid = pid, error = %e, "Failed to check if process is running");
                false
            }
        }
    }
}
