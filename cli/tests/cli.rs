//! End-to-end tests for the freeport binary.
//!
//! Only input rejection is exercised here so nothing on the host is touched.
#![allow(deprecated)] // cargo_bin is deprecated but still functional

use assert_cmd::Command;
use predicates::prelude::*;

fn freeport() -> Command {
    Command::cargo_bin("freeport").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    freeport().arg("--help").assert().success().stdout(
        predicate::str::contains("check")
            .and(predicate::str::contains("kill"))
            .and(predicate::str::contains("details"))
            .and(predicate::str::contains("free")),
    );
}

#[test]
fn test_missing_port_is_usage_error() {
    freeport().arg("check").assert().code(2);
}

#[test]
fn test_port_zero_is_invalid() {
    freeport()
        .args(["check", "0"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid port"));
}

#[test]
fn test_non_numeric_port_is_invalid() {
    freeport()
        .args(["free", "abc"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not an integer"));
}

#[test]
fn test_out_of_range_port_is_invalid_for_kill() {
    freeport()
        .args(["kill", "70000", "--yes"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid port"));
}

#[test]
fn test_pid_zero_is_invalid() {
    freeport()
        .args(["details", "0"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid pid"));
}
