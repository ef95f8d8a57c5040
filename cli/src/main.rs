//! freeport CLI - Free up ports held by stale processes
//!
//! A command-line tool for finding the processes bound to a port,
//! inspecting them, and terminating them.

mod commands;
mod exit;
mod logging;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use freeport_core::config::{DEFAULT_FORCE_WAIT_MS, DEFAULT_GRACEFUL_WAIT_MS};
use freeport_core::{ManagerConfig, PortManager};
use tracing::debug;

#[derive(Parser)]
#[command(name = "freeport")]
#[command(author, version, about = "Find and kill the processes holding a port")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Milliseconds to wait after the graceful termination signal
    #[arg(long, global = true, default_value_t = DEFAULT_GRACEFUL_WAIT_MS)]
    graceful_wait_ms: u64,

    /// Milliseconds to wait after the forced termination signal
    #[arg(long, global = true, default_value_t = DEFAULT_FORCE_WAIT_MS)]
    force_wait_ms: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// List the processes bound to a port
    #[command(alias = "ls")]
    Check {
        /// Port number (1-65535)
        port: String,
    },

    /// Kill the processes bound to a port
    Kill {
        /// Port number (1-65535)
        port: String,

        /// Only kill this process (must be bound to the port)
        #[arg(long)]
        pid: Option<String>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show owner, name and command line of a process
    Details {
        /// Process ID
        pid: String,
    },

    /// Exit with status 0 if the port is free, 1 if it is in use
    Free {
        /// Port number (1-65535)
        port: String,
    },
}

impl Cli {
    fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            graceful_wait_ms: self.graceful_wait_ms,
            force_wait_ms: self.force_wait_ms,
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<exit::FreeportExitCode> {
    let config = cli.manager_config();
    debug!(
        graceful_wait_ms = config.graceful_wait_ms,
        force_wait_ms = config.force_wait_ms,
        json = cli.json,
        "Dispatching command"
    );
    let manager = PortManager::with_config(config);

    match cli.command {
        Commands::Check { port } => commands::check::run(&manager, &port, cli.json).await,
        Commands::Kill { port, pid, yes } => {
            commands::kill::run(&manager, &port, pid.as_deref(), yes, cli.json).await
        }
        Commands::Details { pid } => commands::details::run(&manager, &pid, cli.json).await,
        Commands::Free { port } => commands::free::run(&manager, &port, cli.json).await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(code) => code.into(),
        Err(err) => {
            exit::report(&err);
            exit::code_for(&err).into()
        }
    }
}
