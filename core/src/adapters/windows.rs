//! Windows adapter using netstat, tasklist and taskkill.
//!
//! Uses the following system commands:
//! - `netstat -ano` to list all connections with owning PIDs
//! - `tasklist /FI "PID eq xxx" /FO CSV /NH` for details and liveness
//! - `taskkill /PID xxx` for graceful termination
//! - `taskkill /PID xxx /F` for forced termination

use std::collections::HashSet;

use regex::Regex;
use tracing::{debug, warn};

use super::classify;
use super::command::SystemCommandRunner;
use super::termination::{self, Signal, SignalOutcome, Terminator};
use crate::config::ManagerConfig;
use crate::domain::{Process, ProcessDetails, Protocol};
use crate::error::{Error, Result};
use crate::platform::PlatformKind;
use crate::ports::{CommandRunner, Invocation, PlatformAdapter};

const LOOKUP_OPERATION: &str = "find process by port";
const SYSTEM_HINT: &str = "It ships with Windows; check that System32 is on PATH.";

/// taskkill messages meaning the process is already gone.
const GONE_MARKERS: &[&str] = &[
    "not found",
    "could not be found",
    "no running instance",
    "already been terminated",
    "has exited",
];

/// Adapter for Windows hosts.
pub struct WindowsAdapter<R = SystemCommandRunner> {
    runner: R,
    config: ManagerConfig,
}

impl<R: CommandRunner> WindowsAdapter<R> {
    pub fn new(runner: R, config: ManagerConfig) -> Self {
        Self { runner, config }
    }

    fn tasklist(pid: u32) -> Invocation {
        Invocation::new(
            "tasklist",
            ["/FI".to_string(), format!("PID eq {}", pid), "/FO".into(), "CSV".into(), "/NH".into()],
        )
    }

    /// Extract the distinct PIDs bound to `port` from `netstat -ano` output.
    ///
    /// Example output:
    /// ```text
    /// Active Connections
    ///
    ///   Proto  Local Address          Foreign Address        State           PID
    ///   TCP    0.0.0.0:3000           0.0.0.0:0              LISTENING       5432
    ///   UDP    0.0.0.0:3000           *:*                                    812
    /// ```
    ///
    /// TCP rows carry a state column and are kept only when listening or
    /// established; UDP rows have no state and are always kept.
    fn parse_netstat_output(output: &str, port_pattern: &Regex) -> Vec<(u32, Protocol)> {
        let mut results = Vec::new();
        let mut seen: HashSet<u32> = HashSet::new();

        for line in output.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                continue;
            }

            if !port_pattern.is_match(parts[1]) {
                continue;
            }

            let (protocol, pid_field) = match parts[0].to_uppercase().as_str() {
                "TCP" => {
                    if parts.len() < 5 {
                        continue;
                    }
                    if parts[3] != "LISTENING" && parts[3] != "ESTABLISHED" {
                        continue;
                    }
                    (Protocol::Tcp, parts[4])
                }
                "UDP" => (Protocol::Udp, parts[3]),
                _ => continue,
            };

            let pid: u32 = match pid_field.parse() {
                Ok(p) if p > 0 => p,
                _ => continue,
            };

            if seen.insert(pid) {
                results.push((pid, protocol));
            }
        }

        results
    }

    /// Parse a CSV line, handling quoted fields
    fn parse_csv_line(line: &str) -> Vec<&str> {
        let mut fields = Vec::new();
        let mut in_quotes = false;
        let mut field_start: Option<usize> = None;

        for (i, c) in line.char_indices() {
            match c {
                '"' => {
                    if in_quotes {
                        if let Some(start) = field_start {
                            fields.push(&line[start..i]);
                        }
                        field_start = None;
                        in_quotes = false;
                    } else {
                        in_quotes = true;
                        field_start = Some(i + 1);
                    }
                }
                ',' if !in_quotes => {
                    if let Some(start) = field_start.take() {
                        fields.push(&line[start..i]);
                    }
                }
                _ => {
                    if field_start.is_none() && !in_quotes {
                        field_start = Some(i);
                    }
                }
            }
        }

        if let Some(start) = field_start {
            if !in_quotes {
                fields.push(&line[start..]);
            }
        }

        fields
    }

    /// Parse a `tasklist /FO CSV /NH` row:
    /// `"node.exe","5432","Console","1","45,000 K"`.
    fn parse_tasklist_details(output: &str, pid: u32) -> Result<ProcessDetails> {
        let line = output.lines().map(str::trim).find(|l| !l.is_empty());
        let line = match line {
            Some(l) if !l.starts_with("INFO:") => l,
            _ => return Err(Error::system(format!("Process {} not found", pid))),
        };

        let fields = Self::parse_csv_line(line);
        if fields.len() < 5 {
            return Err(Error::system(format!(
                "Invalid output format from tasklist for process {}: '{}'",
                pid, line
            )));
        }

        let parsed_pid: u32 = fields[1].parse().map_err(|_| {
            Error::system(format!(
                "Invalid output format from tasklist for process {}: '{}'",
                pid, line
            ))
        })?;

        // The CSV listing has no owner column; the session name stands in for it.
        let user = if fields[2] == "Services" {
            "SYSTEM".to_string()
        } else {
            fields[2].to_string()
        };

        Ok(ProcessDetails {
            pid: parsed_pid,
            user,
            name: fields[0].to_string(),
            command: fields[0].to_string(),
        })
    }
}

fn non_blank(value: String) -> String {
    if value.trim().is_empty() {
        "Unknown".to_string()
    } else {
        value
    }
}

impl<R: CommandRunner> PlatformAdapter for WindowsAdapter<R> {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Windows
    }

    async fn find_process_by_port(&self, port: u16) -> Result<Vec<Process>> {
        let invocation = Invocation::new("netstat", ["-ano"]);
        let output = self
            .runner
            .run(&invocation)
            .await
            .map_err(|e| classify::spawn_failure(&invocation, &e, SYSTEM_HINT))?;

        if !output.success() {
            if let Some(err) = classify::lookup_failure(&invocation, &output, port, LOOKUP_OPERATION)
            {
                return Err(err);
            }
            if classify::is_no_match(&output) {
                return Ok(Vec::new());
            }
            return Err(classify::unexpected_failure(&invocation, &output));
        }

        // Anchored so that :3000 does not match :30000
        let pattern = Regex::new(&format!(r":{}(\s|$)", port))
            .map_err(|e| Error::system(format!("Failed to build port pattern: {}", e)))?;

        let mut processes = Vec::new();
        for (pid, protocol) in Self::parse_netstat_output(&output.stdout, &pattern) {
            let details = match self.get_process_details(pid).await {
                Ok(d) => d,
                Err(e) => {
                    warn!(pid = pid, error = %e, "Failed to get process details");
                    ProcessDetails::unknown(pid)
                }
            };

            match Process::new(
                pid,
                non_blank(details.name),
                non_blank(details.user),
                protocol,
                port,
                details.command,
            ) {
                Ok(process) => processes.push(process),
                Err(e) => debug!(pid = pid, error = %e, "Discarding netstat entry"),
            }
        }

        debug!(port = port, count = processes.len(), "Port lookup finished");
        Ok(processes)
    }

    async fn get_process_details(&self, pid: u32) -> Result<ProcessDetails> {
        let invocation = Self::tasklist(pid);
        let output = self
            .runner
            .run(&invocation)
            .await
            .map_err(|e| classify::spawn_failure(&invocation, &e, SYSTEM_HINT))?;

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

        Self::parse_tasklist_details(&output.stdout, pid)
    }

    async fn kill_process(&self, pid: u32) -> Result<bool> {
        termination::terminate(self, pid, &self.config).await
    }
}

impl<R: CommandRunner> Terminator for WindowsAdapter<R> {
    async fn send_signal(&self, pid: u32, signal: Signal) -> Result<SignalOutcome> {
        let force = signal == Signal::Forced;
        debug!(pid = pid, force = force, "Executing taskkill");

        let mut args = vec!["/PID".to_string(), pid.to_string()];
        if force {
            args.push("/F".to_string());
        }
        let invocation = Invocation::new("taskkill", args);
        let output = self
            .runner
            .run(&invocation)
            .await
            .map_err(|e| classify::spawn_failure(&invocation, &e, SYSTEM_HINT))?;

        if output.success() {
            debug!(pid = pid, force = force, "taskkill succeeded");
            return Ok(SignalOutcome::Delivered);
        }

        let text = output.combined();
        let lower = text.to_lowercase();

        if GONE_MARKERS.iter().any(|m| lower.contains(m)) {
            debug!(pid = pid, "Process not found");
            return Ok(SignalOutcome::AlreadyGone);
        }

        if classify::is_permission_denied(&text) {
            warn!(pid = pid, "Access denied to kill process");
            return Err(Error::permission(
                format!("not allowed to terminate process {}", pid),
                Some(pid),
            ));
        }

        // Console apps refuse WM_CLOSE: "can only be terminated forcefully"
        if !force && lower.contains("forcefully") {
            return Ok(SignalOutcome::ForceRequired);
        }

        Err(classify::unexpected_failure(&invocation, &output))
    }

    async fn is_process_running(&self, pid: u32) -> bool {
        match self.runner.run(&Self::tasklist(pid)).await {
            Ok(output) => {
                // tasklist prints "INFO: No tasks are running..." if not found
                let running = output.success()
                    && !output.stdout.contains("INFO:")
                    && output.stdout.contains(&format!("\"{}\"", pid));
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
