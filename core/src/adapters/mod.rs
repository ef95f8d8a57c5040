//! Adapters layer - External system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`.
//! Each OS family gets its own adapter; [`Adapter`] dispatches to the one
//! chosen at startup.

mod classify;
mod command;
mod termination;
mod unix;
mod windows;

pub(crate) use classify::mentions_network;
pub use command::SystemCommandRunner;
pub use unix::UnixAdapter;
pub use windows::WindowsAdapter;

use crate::domain::{Process, ProcessDetails};
use crate::error::Result;
use crate::platform::PlatformKind;
use crate::ports::{CommandRunner, PlatformAdapter};

/// The adapter selected for the host, one variant per OS family.
pub enum Adapter<R = SystemCommandRunner> {
    Unix(UnixAdapter<R>),
    Windows(WindowsAdapter<R>),
}

impl<R: CommandRunner> PlatformAdapter for Adapter<R> {
    fn kind(&self) -> PlatformKind {
        match self {
            Adapter::Unix(a) => a.kind(),
            Adapter::Windows(a) => a.kind(),
        }
    }

    async fn find_process_by_port(&self, port: u16) -> Result<Vec<Process>> {
        match self {
            Adapter::Unix(a) => a.find_process_by_port(port).await,
            Adapter::Windows(a) => a.find_process_by_port(port).await,
        }
    }

    async fn get_process_details(&self, pid: u32) -> Result<ProcessDetails> {
        match self {
            Adapter::Unix(a) => a.get_process_details(pid).await,
            Adapter::Windows(a) => a.get_process_details(pid).await,
        }
    }

    async fn kill_process(&self, pid: u32) -> Result<bool> {
        match self {
            Adapter::Unix(a) => a.kill_process(pid).await,
            Adapter::Windows(a) => a.kill_process(pid).await,
        }
    }

    fn is_compatible(&self) -> bool {
        match self {
            Adapter::Unix(a) => a.is_compatible(),
            Adapter::Windows(a) => a.is_compatible(),
        }
    }
}
