//! Kill command - terminate the processes bound to a port.

use anyhow::Result;
use freeport_core::{validate_pid, CommandRunner, Error, PortManager, Process};
use serde::Serialize;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

use super::print_processes;
use crate::exit::FreeportExitCode;

#[derive(Serialize)]
struct KillResult {
    pid: u32,
    name: String,
    killed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn run<R: CommandRunner + Clone>(
    manager: &PortManager<R>,
    port: &str,
    only_pid: Option<&str>,
    yes: bool,
    json: bool,
) -> Result<FreeportExitCode> {
    let mut targets = manager.check_port(port).await?;
    let port = port.trim();

    if let Some(pid) = only_pid {
        let pid = validate_pid(pid)?;
        targets.retain(|p| p.pid() == pid);
        if targets.is_empty() {
            return Err(Error::validation(
                "pid",
                format!("process {} is not bound to port {}", pid, port),
            )
            .into());
        }
    }

    if targets.is_empty() {
        if json {
            println!("[]");
        } else {
            println!("Port {} is already free.", port);
        }
        return Ok(FreeportExitCode::Success);
    }

    if !json {
        print_processes(&targets);
        println!();
    }

    if !yes && !confirm(&targets, port).await? {
        eprintln!("Aborted.");
        return Ok(FreeportExitCode::Busy);
    }

    let mut results = Vec::with_capacity(targets.len());
    let mut first_error: Option<Error> = None;

    for p in &targets {
        let outcome = manager.kill_process(p.pid()).await;
        let (killed, error) = match &outcome {
            Ok(true) => (true, None),
            Ok(false) => {
                warn!(pid = p.pid(), "Process survived the forced signal");
                (false, None)
            }
            Err(e) => {
                warn!(pid = p.pid(), error = %e, "Failed to kill process");
                (false, Some(e.to_string()))
            }
        };

        if !json {
            match &error {
                Some(e) => println!("Could not kill {} (PID {}): {}", p.name(), p.pid(), e),
                None if killed => println!("Killed {} (PID {})", p.name(), p.pid()),
                None => println!("{} (PID {}) is still running", p.name(), p.pid()),
            }
        }

        if let Err(e) = outcome {
            first_error.get_or_insert(e);
        }
        results.push(KillResult {
            pid: p.pid(),
            name: p.name().to_string(),
            killed,
            error,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    if let Some(err) = first_error {
        return Err(err.into());
    }

    Ok(if results.iter().all(|r| r.killed) {
        FreeportExitCode::Success
    } else {
        FreeportExitCode::Busy
    })
}

/// Ask on stderr so stdout stays machine-readable. End of input counts as "no".
async fn confirm(targets: &[Process], port: &str) -> Result<bool> {
    let mut stderr = io::stderr();
    stderr
        .write_all(
            format!(
                "Kill {} process(es) on port {}? [y/N] ",
                targets.len(),
                port
            )
            .as_bytes(),
        )
        .await?;
    stderr.flush().await?;

    let mut answer = String::new();
    BufReader::new(io::stdin()).read_line(&mut answer).await?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
