//! Check command - list the processes bound to a port.

use anyhow::Result;
use freeport_core::{CommandRunner, PortManager};

use super::print_processes;
use crate::exit::FreeportExitCode;

pub async fn run<R: CommandRunner + Clone>(
    manager: &PortManager<R>,
    port: &str,
    json: bool,
) -> Result<FreeportExitCode> {
    let processes = manager.check_port(port).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&processes)?);
        return Ok(FreeportExitCode::Success);
    }

    if processes.is_empty() {
        println!("Port {} is free.", port.trim());
        return Ok(FreeportExitCode::Success);
    }

    print_processes(&processes);
    println!("\nTotal: {} processes", processes.len());
    Ok(FreeportExitCode::Success)
}
