//! Process records discovered on a port.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::{validate_pid, validate_port};
use crate::error::{Error, Result};

// ============================================================================
// Protocol
// ============================================================================

/// Transport protocol a socket is bound with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TCP" => Ok(Protocol::Tcp),
            "UDP" => Ok(Protocol::Udp),
            other => Err(Error::validation(
                "protocol",
                format!("'{}' is not one of TCP, UDP", other),
            )),
        }
    }
}

// ============================================================================
// Process
// ============================================================================

/// A process bound to a port.
///
/// Every field is validated in [`Process::new`]; an invalid `Process` cannot be
/// constructed or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ProcessRecord", into = "ProcessRecord")]
pub struct Process {
    pid: u32,
    name: String,
    user: String,
    protocol: Protocol,
    port: u16,
    command: String,
}

/// Unvalidated wire shape of a [`Process`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProcessRecord {
    pid: i64,
    name: String,
    user: String,
    protocol: String,
    port: i64,
    #[serde(default)]
    command: String,
}

impl Process {
    /// Build a validated process record.
    ///
    /// Fails with a validation error if the pid is not positive, the name or
    /// user is blank, or the port is outside 1..=65535.
    pub fn new(
        pid: u32,
        name: impl Into<String>,
        user: impl Into<String>,
        protocol: Protocol,
        port: u16,
        command: impl Into<String>,
    ) -> Result<Self> {
        let pid = validate_pid(pid)?;
        let port = validate_port(port)?;

        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::validation("name", "process name must not be empty"));
        }

        let user = user.into();
        if user.trim().is_empty() {
            return Err(Error::validation("user", "process user must not be empty"));
        }

        Ok(Self {
            pid,
            name,
            user,
            protocol,
            port,
            command: command.into(),
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Full invocation, or the process name when nothing better was found.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Object form of this record.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::Value::from(ProcessRecord::from(self.clone()))
    }

    /// Rebuild a record from its object form, validating every field.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let record: ProcessRecord = serde_json::from_value(value)?;
        Self::try_from(record)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let record: ProcessRecord = serde_json::from_str(json)?;
        Self::try_from(record)
    }
}

impl TryFrom<ProcessRecord> for Process {
    type Error = Error;

    fn try_from(record: ProcessRecord) -> Result<Self> {
        let pid = validate_pid(record.pid)?;
        let port = validate_port(record.port)?;
        let protocol = record.protocol.parse()?;
        Process::new(pid, record.name, record.user, protocol, port, record.command)
    }
}

impl From<Process> for ProcessRecord {
    fn from(p: Process) -> Self {
        Self {
            pid: i64::from(p.pid),
            name: p.name,
            user: p.user,
            protocol: p.protocol.as_str().to_string(),
            port: i64::from(p.port),
            command: p.command,
        }
    }
}

impl From<ProcessRecord> for serde_json::Value {
    fn from(record: ProcessRecord) -> Self {
        serde_json::json!({
            "pid": record.pid,
            "name": record.name,
            "user": record.user,
            "protocol": record.protocol,
            "port": record.port,
            "command": record.command,
        })
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (PID {}) {} :{} as {}",
            self.name, self.pid, self.protocol, self.port, self.user
        )
    }
}

// ============================================================================
// ProcessDetails
// ============================================================================

/// Result of a per-PID detail lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDetails {
    pub pid: u32,
    pub user: String,
    pub name: String,
    pub command: String,
}

impl ProcessDetails {
    /// Placeholder used when a detail lookup fails.
    pub fn unknown(pid: u32) -> Self {
        Self {
            pid,
            user: "Unknown".to_string(),
            name: "Unknown".to_string(),
            command: "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn node() -> Process {
        Process::new(1234, "node", "dev", Protocol::Tcp, 3000, "node server.js").unwrap()
    }

    #[test]
    fn test_accessors_echo_inputs() {
        let p = node();
        assert_eq!(p.pid(), 1234);
        assert_eq!(p.name(), "node");
        assert_eq!(p.user(), "dev");
        assert_eq!(p.protocol(), Protocol::Tcp);
        assert_eq!(p.port(), 3000);
        assert_eq!(p.command(), "node server.js");
    }

    #[test]
    fn test_empty_command_is_allowed() {
        let p = Process::new(7, "dnsmasq", "nobody", Protocol::Udp, 53, "").unwrap();
        assert_eq!(p.command(), "");
    }

    #[test]
    fn test_each_invalid_field_rejected() {
        let cases = [
            Process::new(0, "node", "dev", Protocol::Tcp, 3000, ""),
            Process::new(1, "", "dev", Protocol::Tcp, 3000, ""),
            Process::new(1, "   ", "dev", Protocol::Tcp, 3000, ""),
            Process::new(1, "node", "", Protocol::Tcp, 3000, ""),
            Process::new(1, "node", "dev", Protocol::Tcp, 0, ""),
        ];
        for case in cases {
            assert_eq!(case.unwrap_err().kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn test_protocol_parsing() {
        assert_eq!("tcp".parse::<Protocol>().unwrap(), Protocol::Tcp);
        assert_eq!(" UDP ".parse::<Protocol>().unwrap(), Protocol::Udp);
        assert!("SCTP".parse::<Protocol>().is_err());
        assert_eq!(Protocol::Udp.to_string(), "UDP");
    }

    #[test]
    fn test_value_round_trip() {
        let p = node();
        let value = p.to_value();
        assert_eq!(value["protocol"], "TCP");
        assert_eq!(value["pid"], 1234);
        assert_eq!(Process::from_value(value).unwrap(), p);
    }

    #[test]
    fn test_json_round_trip() {
        let p = Process::new(53, "dnsmasq", "nobody", Protocol::Udp, 53, "").unwrap();
        let json = p.to_json().unwrap();
        assert_eq!(Process::from_json(&json).unwrap(), p);
    }

    #[test]
    fn test_deserialize_rejects_invalid_records() {
        let bad_protocol =
            r#"{"pid":1,"name":"x","user":"u","protocol":"SCTP","port":80,"command":""}"#;
        assert_eq!(
            Process::from_json(bad_protocol).unwrap_err().kind(),
            ErrorKind::Validation
        );

        let bad_port = r#"{"pid":1,"name":"x","user":"u","protocol":"TCP","port":70000}"#;
        assert!(Process::from_json(bad_port).is_err());

        let bad_pid = r#"{"pid":-4,"name":"x","user":"u","protocol":"TCP","port":80}"#;
        assert!(serde_json::from_str::<Process>(bad_pid).is_err());

        let not_json = "{pid";
        assert_eq!(
            Process::from_json(not_json).unwrap_err().kind(),
            ErrorKind::Json
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(node().to_string(), "node (PID 1234) TCP :3000 as dev");
    }

    #[test]
    fn test_protocol_display_honours_width() {
        assert_eq!(format!("{:<6}|", Protocol::Tcp), "TCP   |");
        assert_eq!(format!("{:>5}", Protocol::Udp), "  UDP");
    }

    #[test]
    fn test_unknown_details() {
        let d = ProcessDetails::unknown(99);
        assert_eq!(d.pid, 99);
        assert_eq!(d.name, "Unknown");
        assert_eq!(d.user, "Unknown");
        assert_eq!(d.command, "Unknown");
    }
}
