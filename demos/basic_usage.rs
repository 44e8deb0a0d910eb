//! Basic logger usage example
//!
//! Demonstrates the process-wide logger on the console: every level,
//! printf-style arguments, duplicate suppression and shutdown statistics.
//!
//! Run with: cargo run --example basic_usage

use rust_clog::prelude::*;
use rust_clog::{catastrophe, debug, error, fail, info, success, warning};

fn main() -> Result<()> {
    println!("=== Rust CLog - Basic Usage Example ===\n");

    let mut config = Config::default();
    config.console.colors = true;
    api::try_init(config)?;

    println!("1. Logging at every level:");
    debug!("Demo", "This is a debug message");
    info!("Demo", "This is an info message");
    success!("Demo", "This is a success message");
    warning!("Demo", "This is a warning message");
    fail!("Demo", "This is a fail message");
    error!("Demo", "This is an error message");
    catastrophe!("Demo", "This is a catastrophe message");

    println!("\n2. Template arguments:");
    info!("Server", "listening on %s:%d", "0.0.0.0", 8080);
    warning!("Disk", "%.1f%% used on %q", 91.25, "/var");

    println!("\n3. Consecutive duplicates collapse into one summary:");
    for _ in 0..5 {
        warning!("Sensor", "temperature above threshold");
    }
    info!("Sensor", "temperature back to normal");

    api::shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    let stats = api::get_stats();
    println!("\n4. Statistics:");
    println!("   Accepted:   {}", stats.accepted);
    println!("   Emitted:    {}", stats.emitted);
    println!("   Suppressed: {}", stats.suppressed);
    println!("   Dropped:    {}", stats.total_dropped());

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
