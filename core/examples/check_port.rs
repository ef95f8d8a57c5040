//! Example: Show the processes holding a port.
//!
//! Run with: `cargo run -p freeport-core --example check_port -- 3000`

use freeport_core::PortManager;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let port = std::env::args().nth(1).unwrap_or_else(|| "3000".to_string());
    println!("Checking port {}...\n", port);

    let manager = PortManager::new();

    match manager.check_port(port.as_str()).await {
        Ok(processes) => {
            if processes.is_empty() {
                println!("Port {} is free.", port);
                return;
            }

            println!(
                "{:<8} {:<20} {:<12} {:<6} {}",
                "PID", "PROCESS", "USER", "PROTO", "COMMAND"
            );
            println!("{}", "-".repeat(80));

            for p in &processes {
                println!(
                    "{:<8} {:<20} {:<12} {:<6} {}",
                    p.pid(),
                    p.name(),
                    p.user(),
                    p.protocol(),
                    p.command()
                );
            }

            println!("\nTotal: {} processes", processes.len());
        }
        Err(e) => {
            eprintln!("Error checking port: {}", e);
        }
    }
}
