//! File logging example
//!
//! Demonstrates flat-map initialization: every level writes to one rotating
//! file, and levels more verbose than `level` are discarded.
//!
//! Run with: cargo run --example file_logging

use leveled_logger::prelude::*;
use std::collections::HashMap;

fn main() -> Result<()> {
    println!("=== Leveled Logger - File Logging Example ===\n");

    let logs = Logs::new();

    let mut data = HashMap::new();
    data.insert("path".to_string(), "logs/application.log".to_string());
    data.insert("size".to_string(), "4096".to_string());
    data.insert("level".to_string(), "debug".to_string());
    data.insert("backups".to_string(), "3".to_string());

    let floor = logs.init_from_map(&data)?;
    println!("1. Logging to 'logs/application.log' with floor {}:", floor);

    logs.infof(format_args!("Application started"))?;
    logs.debugf(format_args!("Loading configuration..."))?;
    logs.warnf(format_args!("Using default settings for some options"))?;
    logs.errorf(format_args!("Failed to load optional plugin"))?;
    logs.tracef(format_args!("Trace output is discarded"))?;

    println!("\n2. Writing enough records to rotate the file:");
    for i in 1..=100 {
        logs.info(&("processing item", i, 100))?;
        if i % 25 == 0 {
            logs.warnf(format_args!("Checkpoint at item {}", i))?;
        }
    }

    // Buffered records reach the disk only on flush
    logs.flush()?;

    let metrics = logs.metrics();
    println!(
        "\n   written: {}, discarded: {}, failures: {}",
        metrics.written_count(),
        metrics.discarded_count(),
        metrics.write_failures()
    );

    println!("\n=== Example completed successfully! ===");
    println!("Check 'logs/application.log' and its numbered backups");

    Ok(())
}
