//! JSON configuration example
//!
//! Demonstrates declarative per-level writers and a custom writer kind.
//!
//! Run with: cargo run --example json_config

use leveled_logger::prelude::*;

/// Counts bytes instead of writing them anywhere
struct ByteCounter {
    total: usize,
}

impl Writer for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.total += buf.len();
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        println!("   byte counter saw {} bytes", self.total);
        Ok(())
    }

    fn name(&self) -> &str {
        "counter"
    }
}

const CONFIG: &str = r#"{
    "logs": {
        "critical": {"kind": "console", "output": "stderr", "foreground": "white",
                     "background": "red", "prefix": "[CRITICAL] ", "flag": "std|shortfile"},
        "error":    {"kind": "console", "output": "stderr", "foreground": "red",
                     "prefix": "[ERROR] ", "flag": 19},
        "warn":     {"kind": "console", "output": "stdout", "foreground": "yellow",
                     "prefix": "[WARN] ", "flag": "log.Ltime"},
        "info":     {"kind": "console", "output": "stdout", "foreground": "green",
                     "prefix": "[INFO] "},
        "debug":    {"kind": "counter"},
        "trace":    {"kind": "discard"}
    }
}"#;

fn main() -> Result<()> {
    println!("=== Leveled Logger - JSON Configuration Example ===\n");

    let logs = Logs::builder()
        .factory("counter", |_| Ok(Box::new(ByteCounter { total: 0 }) as Box<dyn Writer>))
        .build();

    let levels = logs.init_from_json_str(CONFIG)?;
    println!("1. Configured levels: {:?}\n", levels);

    logs.criticalf(format_args!("Critical condition"))?;
    logs.errorf(format_args!("Error code: {}", 500))?;
    logs.warnf(format_args!("Retry {} of {}", 1, 3))?;
    logs.info(&("request", "/index.html", 200))?;
    logs.debugf(format_args!("counted, never printed"))?;
    logs.tracef(format_args!("dropped by the discard writer"))?;

    println!("\n2. A rejected document leaves the configuration untouched:");
    match logs.init_from_json_str(r#"{"info": {"kind": "pager"}}"#) {
        Ok(_) => println!("   unexpectedly accepted"),
        Err(e) => println!("   rejected: {}", e),
    }
    logs.infof(format_args!("still logging to the console"))?;

    println!("\n3. Flushing every writer:");
    logs.flush()?;

    println!("\n4. Pretty printing bypasses the levels:");
    leveled_logger::facade::pretty(&serde_json::json!({"levels": levels, "ok": true}))?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
