//! # Leveled Logger
//!
//! A leveled logging facility with six fixed severities, each bound to its
//! own writer, prefix and header flags.
//!
//! ## Features
//!
//! - **Per-level routing**: critical, error, warn, info, debug and trace each
//!   write to their own console, rotating file or custom writer
//! - **Declarative setup**: JSON documents or a flat `path`/`size`/`level` map
//! - **Floor cascading**: levels more verbose than the floor are discarded
//! - **Thread safe**: one complete record per writer lock, no interleaving
//!
//! ## Example
//!
//! ```
//! use leveled_logger::prelude::*;
//!
//! let logs = Logs::new();
//! logs.init_from_json_str(r#"{"error": {"kind": "discard", "prefix": "[E] "}}"#)
//!     .unwrap();
//! logs.errorf(format_args!("request {} failed", 7)).unwrap();
//! logs.flush().unwrap();
//! ```

pub mod core;
pub mod facade;
pub mod macros;
pub mod writers;

pub mod prelude {
    pub use crate::core::{
        Attributes, Config, Flags, LevelLogger, LoggerError, LoggerMetrics, Logs, LogsBuilder,
        Result, Severity, Writer,
    };
    pub use crate::writers::{DiscardWriter, MemoryWriter};
    #[cfg(feature = "console")]
    pub use crate::writers::ConsoleWriter;
    #[cfg(feature = "file")]
    pub use crate::writers::{RotatingFileWriter, RotationPolicy};
}

pub use crate::core::{
    Attributes, Config, Flags, LevelBinding, LevelLogger, LevelRegistry, LoggerError,
    LoggerMetrics, Logs, LogsBuilder, Result, Severity, SharedWriter, Writer, WriterFactories,
};
#[cfg(feature = "console")]
pub use crate::writers::ConsoleWriter;
#[cfg(feature = "file")]
pub use crate::writers::RotatingFileWriter;
pub use crate::writers::{DiscardWriter, MemoryWriter};
