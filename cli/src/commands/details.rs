//! Details command - show a single process.

use anyhow::Result;
use freeport_core::{CommandRunner, PortManager};

use crate::exit::FreeportExitCode;

pub async fn run<R: CommandRunner + Clone>(
    manager: &PortManager<R>,
    pid: &str,
    json: bool,
) -> Result<FreeportExitCode> {
    let details = manager.get_process_details(pid).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        println!("PID:     {}", details.pid);
        println!("Name:    {}", details.name);
        println!("User:    {}", details.user);
        println!("Command: {}", details.command);
    }

    Ok(FreeportExitCode::Success)
}
