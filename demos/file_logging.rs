//! File logging example
//!
//! Routes levels to per-level files, sharing one file between two levels,
//! keeps debug output off the console and observes errors with a hook.
//!
//! Run with: cargo run --example file_logging

use rust_clog::prelude::*;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust CLog - File Logging Example ===\n");

    let log_dir = std::env::temp_dir().join("rust_clog_demo");
    let errors_seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&errors_seen);

    let mut config = Config::default()
        .route_level(Level::Info, "app.log")
        .route_level(Level::Warning, "problems.log")
        .route_level(Level::Error, "problems.log")
        .omit_console_level(Level::Debug)
        .add_level_hook(
            Level::Error,
            Arc::new(move |_: &Event| {
                counter.fetch_add(1, Ordering::Relaxed);
            }),
        );
    config.file.base_dir = Some(log_dir.clone());
    api::try_init(config)?;

    api::debug("Worker", "console omits this, no file either", vec![]);
    api::info("Worker", "job %d started", vec![Param::from(1)]);
    api::warning("Worker", "job %d is slow", vec![Param::from(1)]);
    api::error("Worker", "job %d failed: %s", vec![Param::from(1), Param::from("timeout")]);

    api::shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    for name in ["app.log", "problems.log"] {
        let path = log_dir.join(name);
        println!("--- {} ---", path.display());
        print!("{}", fs::read_to_string(&path)?);
    }
    println!(
        "\nError hook fired {} time(s)",
        errors_seen.load(Ordering::Relaxed)
    );

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
