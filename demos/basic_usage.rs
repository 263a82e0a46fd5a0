//! Basic logger usage example
//!
//! Demonstrates per-level console writers, the logging macros and floor
//! cascading on the process-wide service.
//!
//! Run with: cargo run --example basic_usage

use leveled_logger::prelude::*;
use leveled_logger::writers::{ConsoleColor, ConsoleStream};
use leveled_logger::{facade, info, infof, tracef, warn, warnf};

fn main() -> Result<()> {
    println!("=== Leveled Logger - Basic Usage Example ===\n");

    // One colored console writer per level
    let palette = [
        (Severity::Critical, ConsoleColor::Magenta),
        (Severity::Error, ConsoleColor::Red),
        (Severity::Warn, ConsoleColor::Yellow),
        (Severity::Info, ConsoleColor::Green),
        (Severity::Debug, ConsoleColor::Cyan),
        (Severity::Trace, ConsoleColor::White),
    ];
    for (level, color) in palette {
        let writer = ConsoleWriter::with_colors(ConsoleStream::Stdout, color, ConsoleColor::Default);
        facade::set_writer(
            level,
            Some(Box::new(writer)),
            format!("[{}] ", level.label()),
            Flags::STD | Flags::SHORT_FILE,
        );
    }

    println!("1. Logging at every level:");
    facade::criticalf(format_args!("This is a critical message"))?;
    facade::errorf(format_args!("This is an error message"))?;
    warnf!("This is a warning message")?;
    infof!("This is an info message")?;
    facade::debugf(format_args!("This is a debug message"))?;
    tracef!("This is a trace message")?;

    println!("\n2. Println-style calls encode their arguments as JSON:");
    info!("user", 42, true)?;
    warn!(vec!["disk", "nearly", "full"], 93.5)?;

    println!("\n3. Floor set to INFO - debug and trace are discarded:");
    facade::set_floor("info")?;
    facade::tracef(format_args!("Trace message (hidden)"))?;
    facade::debugf(format_args!("Debug message (hidden)"))?;
    infof!("Info message (visible)")?;

    println!("\n4. Broadcast reaches every configured level:");
    facade::allf(format_args!("shutting down"))?;

    facade::flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
