//! Subcommand implementations.

pub mod check;
pub mod details;
pub mod free;
pub mod kill;

use freeport_core::Process;

/// Print processes as a table.
pub fn print_processes(processes: &[Process]) {
    println!(
        "{:<8} {:<20} {:<12} {:<6} {:<6} COMMAND",
        "PID", "PROCESS", "USER", "PROTO", "PORT"
    );
    println!("{}", "-".repeat(80));

    for p in processes {
        println!(
            "{:<8} {:<20} {:<12} {:<6} {:<6} {}",
            p.pid(),
            truncate(p.name(), 20),
            truncate(p.user(), 12),
            p.protocol(),
            p.port(),
            truncate(p.command(), 40)
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 1).collect();
        format!("{}…", head)
    }
}
