//! Per-level logger registry
//!
//! Exactly six bindings exist for the lifetime of a registry, one per
//! [`Severity`]. Each binding is an immutable `(writer, prefix, flags)`
//! triple behind its own lock; reconfiguration swaps the whole triple, so a
//! log call observes either the old binding or the new one, never a mix.

use super::{
    error::{LoggerError, Result},
    flags::Flags,
    metrics::LoggerMetrics,
    record::format_record,
    severity::Severity,
    writer::SharedWriter,
};
use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Writer, prefix and flags currently installed for one level
pub struct LevelBinding {
    writer: Option<SharedWriter>,
    prefix: String,
    flags: Flags,
}

impl LevelBinding {
    pub fn new(writer: Option<SharedWriter>, prefix: impl Into<String>, flags: Flags) -> Self {
        Self {
            writer,
            prefix: prefix.into(),
            flags,
        }
    }

    /// A binding that drops every record
    pub fn discard() -> Self {
        Self::new(None, "", Flags::NONE)
    }

    pub fn writer(&self) -> Option<&SharedWriter> {
        self.writer.as_ref()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }
}

impl fmt::Debug for LevelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelBinding")
            .field("writer", &self.writer.as_ref().map(|w| w.lock().name().to_string()))
            .field("prefix", &self.prefix)
            .field("flags", &self.flags)
            .finish()
    }
}

/// Handle to the binding of one level at the time it was fetched.
///
/// A handle is always usable: when the level has no writer every call
/// succeeds and writes nothing.
#[derive(Clone)]
pub struct LevelLogger {
    level: Severity,
    binding: Arc<LevelBinding>,
    metrics: Arc<LoggerMetrics>,
}

impl LevelLogger {
    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn prefix(&self) -> &str {
        self.binding.prefix()
    }

    pub fn flags(&self) -> Flags {
        self.binding.flags()
    }

    /// Whether records reach a writer at all
    pub fn is_enabled(&self) -> bool {
        self.binding.writer.is_some()
    }

    pub fn writer(&self) -> Option<&SharedWriter> {
        self.binding.writer()
    }

    /// Write one record, attributing it to the caller's source location.
    #[track_caller]
    pub fn output(&self, message: &str) -> Result<()> {
        self.output_at(Some(Location::caller()), message)
    }

    /// Write one record with an explicit source location.
    pub fn output_at(&self, location: Option<&Location<'_>>, message: &str) -> Result<()> {
        let Some(writer) = self.binding.writer.as_ref() else {
            self.metrics.record_discarded();
            return Ok(());
        };

        let mut line = String::with_capacity(self.binding.prefix.len() + message.len() + 48);
        format_record(
            &mut line,
            &self.binding.prefix,
            self.binding.flags,
            Utc::now(),
            location,
            message,
        );

        // One lock acquisition per record keeps records from interleaving
        match writer.lock().write(line.as_bytes()) {
            Ok(()) => {
                self.metrics.record_written();
                Ok(())
            }
            Err(e) => {
                self.metrics.record_write_failure();
                Err(e)
            }
        }
    }

    /// Serialize `value` as JSON and write it as one record.
    ///
    /// Encoding failures are counted and returned rather than dropped.
    #[track_caller]
    pub fn println<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let location = Location::caller();
        if !self.is_enabled() {
            self.metrics.record_discarded();
            return Ok(());
        }
        let encoded = serde_json::to_string(value).map_err(|e| {
            self.metrics.record_encode_failure();
            LoggerError::from(e)
        })?;
        self.output_at(Some(location), &encoded)
    }

    /// Write one record formatted from `args`
    #[track_caller]
    pub fn printf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        let location = Location::caller();
        if !self.is_enabled() {
            self.metrics.record_discarded();
            return Ok(());
        }
        match args.as_str() {
            Some(text) => self.output_at(Some(location), text),
            None => self.output_at(Some(location), &args.to_string()),
        }
    }

    /// Flush the bound writer, if any
    pub fn flush(&self) -> Result<()> {
        match self.binding.writer.as_ref() {
            Some(writer) => writer.lock().flush(),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for LevelLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelLogger")
            .field("level", &self.level)
            .field("binding", &self.binding)
            .finish()
    }
}

/// Indexed table of the six level bindings
pub struct LevelRegistry {
    slots: [RwLock<Arc<LevelBinding>>; Severity::COUNT],
    metrics: Arc<LoggerMetrics>,
}

impl LevelRegistry {
    /// Create a registry with every level discarding
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(LoggerMetrics::new()))
    }

    pub fn with_metrics(metrics: Arc<LoggerMetrics>) -> Self {
        Self {
            slots: std::array::from_fn(|_| RwLock::new(Arc::new(LevelBinding::discard()))),
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<LoggerMetrics> {
        &self.metrics
    }

    /// Replace the binding of `level`.
    ///
    /// `None` installs a discard binding. The outgoing writer is released
    /// without being flushed.
    pub fn set(
        &self,
        level: Severity,
        writer: Option<SharedWriter>,
        prefix: impl Into<String>,
        flags: Flags,
    ) {
        self.install(level, LevelBinding::new(writer, prefix, flags));
    }

    /// Replace the binding of the level with numeric index `index`
    pub fn set_index(
        &self,
        index: usize,
        writer: Option<SharedWriter>,
        prefix: impl Into<String>,
        flags: Flags,
    ) -> Result<()> {
        let level = Severity::from_index(index).ok_or(LoggerError::InvalidLevelIndex {
            index,
            max: Severity::COUNT,
        })?;
        self.set(level, writer, prefix, flags);
        Ok(())
    }

    pub fn install(&self, level: Severity, binding: LevelBinding) {
        *self.slots[level.index()].write() = Arc::new(binding);
    }

    /// Handle bound to the current binding of `level`
    pub fn get(&self, level: Severity) -> LevelLogger {
        LevelLogger {
            level,
            binding: Arc::clone(&self.slots[level.index()].read()),
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// Discard every level strictly more verbose than the named floor.
    ///
    /// Levels at or below the floor keep their bindings.
    pub fn set_floor(&self, name: &str) -> Result<Severity> {
        let floor: Severity = name.parse()?;
        self.set_floor_level(floor);
        Ok(floor)
    }

    pub fn set_floor_level(&self, floor: Severity) {
        for level in floor.more_verbose() {
            self.set(level, None, "", Flags::NONE);
        }
    }

    /// Install discard bindings on every level
    pub fn reset(&self) {
        for level in Severity::ALL {
            self.set(level, None, "", Flags::NONE);
        }
    }

    /// Flush every bound writer once.
    ///
    /// All writers are attempted; the first error is returned.
    pub fn flush_all(&self) -> Result<()> {
        let mut seen: Vec<SharedWriter> = Vec::with_capacity(Severity::COUNT);
        for level in Severity::ALL {
            let binding = Arc::clone(&self.slots[level.index()].read());
            if let Some(writer) = binding.writer() {
                if !seen.iter().any(|w| Arc::ptr_eq(w, writer)) {
                    seen.push(Arc::clone(writer));
                }
            }
        }

        let mut first_error = None;
        for writer in seen {
            if let Err(e) = writer.lock().flush() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
