//! Platform selection.
//!
//! Maps the host OS identifier onto one of the supported OS families and
//! hands out a factory for the matching adapter.

use std::fmt;

use crate::adapters::{Adapter, UnixAdapter, WindowsAdapter};
use crate::config::ManagerConfig;
use crate::error::{Error, Result};
use crate::ports::CommandRunner;

/// `std::env::consts::OS` values handled by the Unix adapter.
const UNIX_FAMILY: &[&str] = &[
    "linux", "macos", "freebsd", "openbsd", "netbsd", "dragonfly", "solaris", "illumos",
];

/// OS family with its own set of diagnostic tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    /// `lsof`, `ps` and `kill`.
    Unix,
    /// `netstat`, `tasklist` and `taskkill`.
    Windows,
}

impl PlatformKind {
    /// Classify an OS identifier as reported by `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Result<Self> {
        if os == "windows" {
            Ok(PlatformKind::Windows)
        } else if UNIX_FAMILY.contains(&os) {
            Ok(PlatformKind::Unix)
        } else {
            Err(Error::UnsupportedPlatform(os.to_string()))
        }
    }

    /// Family of the host this binary is running on.
    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformKind::Unix => f.write_str("unix"),
            PlatformKind::Windows => f.write_str("windows"),
        }
    }
}

/// Detect the host's OS family.
pub fn detect() -> Result<PlatformKind> {
    PlatformKind::current()
}

/// Deferred constructor for the adapter matching a detected family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterFactory {
    kind: PlatformKind,
}

impl AdapterFactory {
    pub fn kind(&self) -> PlatformKind {
        self.kind
    }

    pub fn build<R: CommandRunner>(&self, runner: R, config: &ManagerConfig) -> Adapter<R> {
        match self.kind {
            PlatformKind::Unix => Adapter::Unix(UnixAdapter::new(runner, config.clone())),
            PlatformKind::Windows => Adapter::Windows(WindowsAdapter::new(runner, config.clone())),
        }
    }
}

/// Select the adapter factory for the host OS.
pub fn select_adapter() -> Result<AdapterFactory> {
    select_adapter_for(std::env::consts::OS)
}

/// Select the adapter factory for an explicit OS identifier.
pub fn select_adapter_for(os: &str) -> Result<AdapterFactory> {
    let kind = PlatformKind::from_os(os)?;
    Ok(AdapterFactory { kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::ports::PlatformAdapter;
    use crate::testing::ScriptedRunner;

    #[test]
    fn test_from_os() {
        assert_eq!(PlatformKind::from_os("linux").unwrap(), PlatformKind::Unix);
        assert_eq!(PlatformKind::from_os("macos").unwrap(), PlatformKind::Unix);
        assert_eq!(PlatformKind::from_os("freebsd").unwrap(), PlatformKind::Unix);
        assert_eq!(
            PlatformKind::from_os("windows").unwrap(),
            PlatformKind::Windows
        );
    }

    #[test]
    fn test_unsupported_os() {
        let err = PlatformKind::from_os("haiku").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedPlatform);
        assert!(err.to_string().contains("haiku"));

        assert!(select_adapter_for("redox").is_err());
    }

    #[test]
    fn test_detect_host() {
        if cfg!(any(unix, windows)) {
            let kind = detect().unwrap();
            assert_eq!(kind == PlatformKind::Windows, cfg!(windows));
        }
    }

    #[test]
    fn test_factory_builds_matching_adapter() {
        let config = ManagerConfig::default();

        let unix = select_adapter_for("linux")
            .unwrap()
            .build(ScriptedRunner::new(), &config);
        assert_eq!(unix.kind(), PlatformKind::Unix);
        assert!(matches!(unix, Adapter::Unix(_)));

        let windows = select_adapter_for("windows")
            .unwrap()
            .build(ScriptedRunner::new(), &config);
        assert_eq!(windows.kind(), PlatformKind::Windows);
        assert_eq!(windows.is_compatible(), cfg!(windows));
    }
}
