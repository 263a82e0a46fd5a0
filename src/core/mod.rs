//! Core logging types: levels, bindings, configuration and the service

pub mod config;
pub mod error;
pub mod factory;
pub mod flags;
pub mod logs;
pub mod metrics;
pub mod record;
pub mod registry;
pub mod severity;
pub mod writer;

pub use config::{Attributes, Config};
pub use error::{LoggerError, Result};
pub use factory::{WriterConstructor, WriterFactories};
pub use flags::Flags;
pub use logs::{Logs, LogsBuilder, FATAL_EXIT_CODE};
pub use metrics::LoggerMetrics;
pub use registry::{LevelBinding, LevelLogger, LevelRegistry};
pub use severity::Severity;
pub use writer::{share, SharedWriter, Writer};
