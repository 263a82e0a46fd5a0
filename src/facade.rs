//! Process-wide default logging service
//!
//! Free functions forwarding to one lazily created [`Logs`]. Every level
//! discards until the process configures it, typically once at startup:
//!
//! ```no_run
//! use leveled_logger::facade;
//!
//! facade::init_from_json_file("logs.json").unwrap();
//! facade::infof(format_args!("listening on {}", 8080)).unwrap();
//! facade::flush().unwrap();
//! ```

use crate::core::{
    Attributes, Config, Flags, LevelLogger, LoggerError, Logs, Result, Severity, Writer,
};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

static DEFAULT: OnceLock<Logs> = OnceLock::new();

/// The process-wide service
pub fn logs() -> &'static Logs {
    DEFAULT.get_or_init(Logs::new)
}

pub fn register_writer<F>(kind: impl Into<String>, constructor: F)
where
    F: Fn(&Attributes) -> Result<Box<dyn Writer>> + Send + Sync + 'static,
{
    logs().register_writer(kind, constructor)
}

pub fn set_writer(
    level: Severity,
    writer: Option<Box<dyn Writer>>,
    prefix: impl Into<String>,
    flags: Flags,
) {
    logs().set_writer(level, writer, prefix, flags)
}

pub fn set_writer_index(
    index: usize,
    writer: Option<Box<dyn Writer>>,
    prefix: impl Into<String>,
    flags: Flags,
) -> Result<()> {
    logs().set_writer_index(index, writer, prefix, flags)
}

pub fn set_floor(name: &str) -> Result<Severity> {
    logs().set_floor(name)
}

pub fn apply_config(config: &Config) -> Result<Vec<Severity>> {
    logs().apply_config(config)
}

pub fn init_from_json_str(text: &str) -> Result<Vec<Severity>> {
    logs().init_from_json_str(text)
}

pub fn init_from_json_file<P: AsRef<Path>>(path: P) -> Result<Vec<Severity>> {
    logs().init_from_json_file(path)
}

/// See [`Logs::init_from_map`]
pub fn init_from_map(data: &HashMap<String, String>) -> Result<Severity> {
    logs().init_from_map(data)
}

pub fn reset() {
    logs().reset()
}

/// Flush every writer of the default service
pub fn flush() -> Result<()> {
    logs().flush()
}

pub fn logger(level: Severity) -> LevelLogger {
    logs().logger(level)
}

pub fn critical_logger() -> LevelLogger {
    logs().critical_logger()
}

pub fn error_logger() -> LevelLogger {
    logs().error_logger()
}

pub fn warn_logger() -> LevelLogger {
    logs().warn_logger()
}

pub fn info_logger() -> LevelLogger {
    logs().info_logger()
}

pub fn debug_logger() -> LevelLogger {
    logs().debug_logger()
}

pub fn trace_logger() -> LevelLogger {
    logs().trace_logger()
}

#[track_caller]
pub fn log<T: Serialize + ?Sized>(level: Severity, value: &T) -> Result<()> {
    logs().log(level, value)
}

#[track_caller]
pub fn logf(level: Severity, args: fmt::Arguments<'_>) -> Result<()> {
    logs().logf(level, args)
}

#[track_caller]
pub fn critical<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    logs().critical(value)
}

#[track_caller]
pub fn criticalf(args: fmt::Arguments<'_>) -> Result<()> {
    logs().criticalf(args)
}

#[track_caller]
pub fn error<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    logs().error(value)
}

#[track_caller]
pub fn errorf(args: fmt::Arguments<'_>) -> Result<()> {
    logs().errorf(args)
}

#[track_caller]
pub fn warn<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    logs().warn(value)
}

#[track_caller]
pub fn warnf(args: fmt::Arguments<'_>) -> Result<()> {
    logs().warnf(args)
}

#[track_caller]
pub fn info<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    logs().info(value)
}

#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) -> Result<()> {
    logs().infof(args)
}

#[track_caller]
pub fn debug<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    logs().debug(value)
}

#[track_caller]
pub fn debugf(args: fmt::Arguments<'_>) -> Result<()> {
    logs().debugf(args)
}

#[track_caller]
pub fn trace<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    logs().trace(value)
}

#[track_caller]
pub fn tracef(args: fmt::Arguments<'_>) -> Result<()> {
    logs().tracef(args)
}

#[track_caller]
pub fn all<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    logs().all(value)
}

#[track_caller]
pub fn allf(args: fmt::Arguments<'_>) -> Result<()> {
    logs().allf(args)
}

#[track_caller]
pub fn fatal<T: Serialize + ?Sized>(value: &T) -> ! {
    logs().fatal(value)
}

#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) -> ! {
    logs().fatalf(args)
}

#[track_caller]
pub fn panic<T: Serialize + ?Sized>(value: &T) -> ! {
    logs().panic(value)
}

#[track_caller]
pub fn panicf(args: fmt::Arguments<'_>) -> ! {
    logs().panicf(args)
}

#[track_caller]
pub fn fatal_error(args: fmt::Arguments<'_>) -> LoggerError {
    logs().fatal_error(args)
}

/// Indented JSON rendering of `value`
pub fn pretty_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Print `value` as indented JSON on stdout.
///
/// Not a log record: no writer, prefix or floor is involved.
pub fn pretty<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = pretty_string(value)?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", rendered)?;
    Ok(())
}

/// Print the `{:#?}` rendering of `value` on stdout
pub fn dump<T: fmt::Debug + ?Sized>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{:#?}", value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    struct Endpoint {
        host: &'static str,
        port: u16,
    }

    #[test]
    fn test_pretty_string_indents_two_spaces() {
        let text = pretty_string(&Endpoint { host: "db", port: 5432 }).unwrap();
        assert_eq!(text, "{\n  \"host\": \"db\",\n  \"port\": 5432\n}");
    }

    #[test]
    fn test_default_instance_is_shared() {
        assert!(std::ptr::eq(logs(), logs()));
    }

    #[test]
    fn test_dump_accepts_unsized_values() {
        dump(&vec![1, 2]).unwrap();
        dump("plain text").unwrap();
        dump(&[Endpoint { host: "db", port: 5432 }][..]).unwrap();
    }
}
