//! Logging service
//!
//! [`Logs`] owns a [`LevelRegistry`] and the [`WriterFactories`] used to
//! configure it. Tests and embedders create their own instance; the
//! [`facade`](crate::facade) module wraps one process-wide instance.

use super::{
    config::{Attributes, Config},
    error::{LoggerError, Result},
    factory::WriterFactories,
    flags::Flags,
    metrics::LoggerMetrics,
    registry::{LevelBinding, LevelLogger, LevelRegistry},
    severity::Severity,
    writer::{share, Writer},
};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::path::Path;

/// Exit status used by [`Logs::fatal`] and [`Logs::fatalf`]
pub const FATAL_EXIT_CODE: i32 = 2;

pub struct Logs {
    registry: LevelRegistry,
    factories: RwLock<WriterFactories>,
    /// Serializes reconfigurations so two applies never interleave
    reconfigure: Mutex<()>,
}

impl Logs {
    /// A service with every level discarding and the built-in writer kinds
    #[must_use]
    pub fn new() -> Self {
        Self::with_factories(WriterFactories::with_defaults())
    }

    #[must_use]
    pub fn with_factories(factories: WriterFactories) -> Self {
        Self {
            registry: LevelRegistry::new(),
            factories: RwLock::new(factories),
            reconfigure: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.registry.metrics()
    }

    /// Register a writer kind; replaces an existing kind of the same name.
    pub fn register_writer<F>(&self, kind: impl Into<String>, constructor: F)
    where
        F: Fn(&Attributes) -> Result<Box<dyn Writer>> + Send + Sync + 'static,
    {
        self.factories.write().register(kind, constructor);
    }

    /// Build a writer through the factory registry without installing it
    pub fn build_writer(&self, kind: &str, attrs: &Attributes) -> Result<Box<dyn Writer>> {
        self.factories.read().build(kind, attrs)
    }

    /// Install `writer` on `level`; `None` discards the level.
    ///
    /// The previous writer is not flushed. Call [`Logs::flush`] first when
    /// its buffered tail matters.
    pub fn set_writer(
        &self,
        level: Severity,
        writer: Option<Box<dyn Writer>>,
        prefix: impl Into<String>,
        flags: Flags,
    ) {
        let _guard = self.reconfigure.lock();
        self.registry.set(level, writer.map(share), prefix, flags);
        self.metrics().record_reconfiguration();
    }

    /// Same as [`Logs::set_writer`] with a numeric level index (0 = critical)
    pub fn set_writer_index(
        &self,
        index: usize,
        writer: Option<Box<dyn Writer>>,
        prefix: impl Into<String>,
        flags: Flags,
    ) -> Result<()> {
        let _guard = self.reconfigure.lock();
        self.registry.set_index(index, writer.map(share), prefix, flags)?;
        self.metrics().record_reconfiguration();
        Ok(())
    }

    /// Discard every level more verbose than the named floor
    pub fn set_floor(&self, name: &str) -> Result<Severity> {
        let _guard = self.reconfigure.lock();
        let floor = self.registry.set_floor(name)?;
        self.metrics().record_reconfiguration();
        Ok(floor)
    }

    /// Install the writers described by `config`.
    ///
    /// Every entry is resolved and every writer built before any level is
    /// touched, so on error the registry is exactly as it was. Returns the
    /// levels that were reconfigured.
    pub fn apply_config(&self, config: &Config) -> Result<Vec<Severity>> {
        let bindings = config.prepare(&self.factories.read())?;

        let _guard = self.reconfigure.lock();
        let levels = bindings.iter().map(|(level, _)| *level).collect();
        for (level, binding) in bindings {
            self.registry.install(level, binding);
        }
        self.metrics().record_reconfiguration();
        Ok(levels)
    }

    /// Parse a JSON configuration document and apply it
    pub fn init_from_json_str(&self, text: &str) -> Result<Vec<Severity>> {
        self.apply_config(&Config::from_json_str(text)?)
    }

    /// Read a JSON configuration file and apply it
    pub fn init_from_json_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Severity>> {
        self.apply_config(&Config::from_json_file(path)?)
    }

    /// Configure every level to write to one rotating file.
    ///
    /// `data` needs `path` and `size`; `level` (default `info`) becomes the
    /// floor, so more verbose levels are discarded.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use leveled_logger::Logs;
    /// use std::collections::HashMap;
    ///
    /// let logs = Logs::new();
    /// let mut data = HashMap::new();
    /// data.insert("path".to_string(), "/tmp/app.log".to_string());
    /// data.insert("size".to_string(), "1048576".to_string());
    /// data.insert("level".to_string(), "debug".to_string());
    /// logs.init_from_map(&data).unwrap();
    /// ```
    pub fn init_from_map(&self, data: &HashMap<String, String>) -> Result<Severity> {
        let (config, floor) = Config::from_flat_map(data)?;
        let bindings = config.prepare(&self.factories.read())?;

        // Levels above the floor go straight to discard so no reader ever
        // sees them bound to the file
        let _guard = self.reconfigure.lock();
        for (level, binding) in bindings {
            if level > floor {
                self.registry.install(level, LevelBinding::discard());
            } else {
                self.registry.install(level, binding);
            }
        }
        self.metrics().record_reconfiguration();
        Ok(floor)
    }

    /// Discard every level
    pub fn reset(&self) {
        let _guard = self.reconfigure.lock();
        self.registry.reset();
    }

    /// Flush every installed writer
    pub fn flush(&self) -> Result<()> {
        self.registry.flush_all()
    }

    /// Handle for `level`; never unusable
    pub fn logger(&self, level: Severity) -> LevelLogger {
        self.registry.get(level)
    }

    pub fn critical_logger(&self) -> LevelLogger {
        self.logger(Severity::Critical)
    }

    pub fn error_logger(&self) -> LevelLogger {
        self.logger(Severity::Error)
    }

    pub fn warn_logger(&self) -> LevelLogger {
        self.logger(Severity::Warn)
    }

    pub fn info_logger(&self) -> LevelLogger {
        self.logger(Severity::Info)
    }

    pub fn debug_logger(&self) -> LevelLogger {
        self.logger(Severity::Debug)
    }

    pub fn trace_logger(&self) -> LevelLogger {
        self.logger(Severity::Trace)
    }

    /// Serialize `value` as JSON and write it to `level`
    #[track_caller]
    pub fn log<T: Serialize + ?Sized>(&self, level: Severity, value: &T) -> Result<()> {
        self.logger(level).println(value)
    }

    /// Write a formatted record to `level`
    #[track_caller]
    pub fn logf(&self, level: Severity, args: fmt::Arguments<'_>) -> Result<()> {
        self.logger(level).printf(args)
    }

    #[inline]
    #[track_caller]
    pub fn critical<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.log(Severity::Critical, value)
    }

    #[inline]
    #[track_caller]
    pub fn criticalf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.logf(Severity::Critical, args)
    }

    #[inline]
    #[track_caller]
    pub fn error<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.log(Severity::Error, value)
    }

    #[inline]
    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.logf(Severity::Error, args)
    }

    #[inline]
    #[track_caller]
    pub fn warn<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.log(Severity::Warn, value)
    }

    #[inline]
    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.logf(Severity::Warn, args)
    }

    #[inline]
    #[track_caller]
    pub fn info<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.log(Severity::Info, value)
    }

    #[inline]
    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.logf(Severity::Info, args)
    }

    #[inline]
    #[track_caller]
    pub fn debug<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.log(Severity::Debug, value)
    }

    #[inline]
    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.logf(Severity::Debug, args)
    }

    #[inline]
    #[track_caller]
    pub fn trace<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.log(Severity::Trace, value)
    }

    #[inline]
    #[track_caller]
    pub fn tracef(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.logf(Severity::Trace, args)
    }

    /// Write one JSON record to every level's writer, whatever the floor.
    ///
    /// Discarded levels drop it. Every level is attempted; the first error
    /// is returned.
    #[track_caller]
    pub fn all<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let location = Location::caller();
        let message = self.encode(value)?;
        self.broadcast(location, &message)
    }

    /// Formatted variant of [`Logs::all`]
    #[track_caller]
    pub fn allf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.broadcast(Location::caller(), &args.to_string())
    }

    /// Broadcast, flush, then exit the process with status 2
    #[track_caller]
    pub fn fatal<T: Serialize + ?Sized>(&self, value: &T) -> ! {
        let location = Location::caller();
        let message = self.encode_lossy(value);
        self.broadcast_and_flush(location, &message);
        std::process::exit(FATAL_EXIT_CODE)
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.broadcast_and_flush(Location::caller(), &args.to_string());
        std::process::exit(FATAL_EXIT_CODE)
    }

    /// Broadcast, flush, then panic with the message
    #[track_caller]
    pub fn panic<T: Serialize + ?Sized>(&self, value: &T) -> ! {
        let location = Location::caller();
        let message = self.encode_lossy(value);
        self.broadcast_and_flush(location, &message);
        panic!("{}", message)
    }

    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        let message = args.to_string();
        self.broadcast_and_flush(Location::caller(), &message);
        panic!("{}", message)
    }

    /// Broadcast and flush, then hand back a [`LoggerError::Fatal`] for the
    /// caller to propagate instead of unwinding or exiting.
    #[track_caller]
    pub fn fatal_error(&self, args: fmt::Arguments<'_>) -> LoggerError {
        let message = args.to_string();
        self.broadcast_and_flush(Location::caller(), &message);
        LoggerError::Fatal(message)
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| {
            self.metrics().record_encode_failure();
            LoggerError::from(e)
        })
    }

    /// Terminating paths still need a message when encoding fails
    fn encode_lossy<T: Serialize + ?Sized>(&self, value: &T) -> String {
        self.encode(value)
            .unwrap_or_else(|e| format!("<unencodable fatal message: {}>", e))
    }

    fn broadcast(&self, location: &Location<'_>, message: &str) -> Result<()> {
        let mut first_error = None;
        for level in Severity::ALL {
            if let Err(e) = self.logger(level).output_at(Some(location), message) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn broadcast_and_flush(&self, location: &Location<'_>, message: &str) {
        if let Err(e) = self.broadcast(location, message) {
            eprintln!("[LOGGER ERROR] Failed to broadcast fatal record: {}", e);
        }
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before terminating: {}", e);
        }
    }
}

impl Default for Logs {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for level in Severity::ALL {
            map.entry(&level, &self.logger(level));
        }
        map.finish()
    }
}

/// Builder for constructing [`Logs`] with a fluent API
///
/// # Example
/// ```
/// use leveled_logger::prelude::*;
///
/// let buffer = MemoryWriter::new();
/// let logs = Logs::builder()
///     .writer(Severity::Info, buffer.clone(), "[INFO] ", Flags::NONE)
///     .floor(Severity::Warn)
///     .build();
///
/// logs.infof(format_args!("dropped")).unwrap();
/// assert!(buffer.contents().is_empty());
/// ```
pub struct LogsBuilder {
    factories: WriterFactories,
    writers: Vec<(Severity, Box<dyn Writer>, String, Flags)>,
    floor: Option<Severity>,
}

impl LogsBuilder {
    /// Create a new builder with the built-in writer kinds
    pub fn new() -> Self {
        Self {
            factories: WriterFactories::with_defaults(),
            writers: Vec::new(),
            floor: None,
        }
    }

    /// Register an additional writer kind
    #[must_use = "builder methods return a new value"]
    pub fn factory<F>(mut self, kind: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&Attributes) -> Result<Box<dyn Writer>> + Send + Sync + 'static,
    {
        self.factories.register(kind, constructor);
        self
    }

    /// Install a writer on one level
    #[must_use = "builder methods return a new value"]
    pub fn writer<W: Writer + 'static>(
        mut self,
        level: Severity,
        writer: W,
        prefix: impl Into<String>,
        flags: Flags,
    ) -> Self {
        self.writers.push((level, Box::new(writer), prefix.into(), flags));
        self
    }

    /// Discard every level more verbose than `floor`
    #[must_use = "builder methods return a new value"]
    pub fn floor(mut self, floor: Severity) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn build(self) -> Logs {
        let logs = Logs::with_factories(self.factories);
        for (level, writer, prefix, flags) in self.writers {
            logs.registry.set(level, Some(share(writer)), prefix, flags);
        }
        if let Some(floor) = self.floor {
            logs.registry.set_floor_level(floor);
        }
        logs
    }
}

impl Default for LogsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logs {
    /// Create a builder for Logs
    #[must_use]
    pub fn builder() -> LogsBuilder {
        LogsBuilder::new()
    }
}
