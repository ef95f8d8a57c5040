//! Free command - report whether a port is available.

use anyhow::Result;
use freeport_core::{CommandRunner, PortManager};
use serde::Serialize;

use crate::exit::FreeportExitCode;

#[derive(Serialize)]
struct Availability<'a> {
    port: &'a str,
    available: bool,
}

pub async fn run<R: CommandRunner + Clone>(
    manager: &PortManager<R>,
    port: &str,
    json: bool,
) -> Result<FreeportExitCode> {
    let available = manager.is_port_available(port).await?;
    let port = port.trim();

    if json {
        println!("{}", serde_json::to_string(&Availability { port, available })?);
    } else if available {
        println!("Port {} is free.", port);
    } else {
        println!("Port {} is in use.", port);
    }

    Ok(if available {
        FreeportExitCode::Success
    } else {
        FreeportExitCode::Busy
    })
}
