//! Buffered file writer with size-based rotation
//!
//! Records are buffered in memory and written to `path`. Before a record
//! that would push the file past the rotation threshold, the current file is
//! moved to `path.1` (older backups shift to `path.2`, `path.3`, ...) and a
//! fresh file is opened.

use crate::core::{Attributes, LoggerError, Result, Writer};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;
const MAX_DELETION_FAILURES: usize = 5;

/// Configuration for [`RotatingFileWriter`]
///
/// # Examples
///
/// ```
/// use leveled_logger::writers::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(1024 * 1024)
///     .with_max_backups(7)
///     .with_compression(true)
///     .with_flush_interval(Duration::from_secs(1));
/// assert_eq!(policy.max_bytes, 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RotationPolicy {
    /// Rotation threshold in bytes; 0 never rotates
    pub max_bytes: u64,
    /// Maximum number of rotated files to keep
    pub max_backup_files: usize,
    /// Whether to gzip rotated files
    pub compress: bool,
    /// Capacity of the in-memory buffer
    pub buffer_capacity: usize,
    /// Flush automatically once this much time passed since the last flush.
    ///
    /// Checked on the next write only; an idle writer keeps its buffered
    /// tail until an explicit flush or drop.
    pub flush_interval: Option<Duration>,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 0,
            max_backup_files: 5,
            compress: false,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            flush_interval: None,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backup_files = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_buffer_capacity(mut self, bytes: usize) -> Self {
        self.buffer_capacity = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = (!interval.is_zero()).then_some(interval);
        self
    }

    /// Read `size`, `backups`, `compress`, `buffer` and `flush_interval_ms`
    /// from configuration attributes. Absent attributes keep their defaults.
    pub fn from_attrs(attrs: &Attributes) -> Result<Self> {
        let mut policy = Self::new();
        if let Some(size) = non_empty(attrs, "size") {
            policy.max_bytes = parse_number(size, "size")?;
        }
        if let Some(backups) = non_empty(attrs, "backups") {
            policy.max_backup_files = parse_number(backups, "backups")?;
        }
        if let Some(compress) = non_empty(attrs, "compress") {
            policy.compress = parse_bool(compress, "compress")?;
        }
        if let Some(buffer) = non_empty(attrs, "buffer") {
            policy.buffer_capacity = parse_number(buffer, "buffer")?;
        }
        if let Some(interval) = non_empty(attrs, "flush_interval_ms") {
            let millis: u64 = parse_number(interval, "flush_interval_ms")?;
            policy = policy.with_flush_interval(Duration::from_millis(millis));
        }
        Ok(policy)
    }
}

fn non_empty<'a>(attrs: &'a Attributes, key: &str) -> Option<&'a str> {
    attrs.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_number<T: std::str::FromStr>(value: &str, attribute: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| LoggerError::invalid_attribute(attribute, value, e.to_string()))
}

fn parse_bool(value: &str, attribute: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(LoggerError::invalid_attribute(attribute, value, "expected a boolean")),
    }
}

/// Rotating, buffered file writer
///
/// # Examples
///
/// ```no_run
/// use leveled_logger::writers::{RotatingFileWriter, RotationPolicy};
///
/// let policy = RotationPolicy::new().with_max_size(10 * 1024 * 1024);
/// let writer = RotatingFileWriter::with_policy("/var/log/app.log", policy).unwrap();
/// ```
pub struct RotatingFileWriter {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    last_flush: Instant,
    /// Counter for consecutive deletion failures (reset on successful deletion)
    deletion_failure_count: usize,
    /// Size at which a rotation is retried after a failed one; 0 when none failed
    retry_rotation_at: u64,
}

impl RotatingFileWriter {
    /// Open `path` without rotation
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Open `path` with a custom policy, creating parent directories.
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        if base_path.as_os_str().is_empty() {
            return Err(LoggerError::missing_attribute("file writer", "path"));
        }

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_append(&base_path)?;

        Ok(Self {
            writer: Some(BufWriter::with_capacity(policy.buffer_capacity, file)),
            base_path,
            policy,
            current_size,
            last_flush: Instant::now(),
            deletion_failure_count: 0,
            retry_rotation_at: 0,
        })
    }

    /// Construct from configuration attributes; `path` is required.
    pub fn from_attrs(attrs: &Attributes) -> Result<Self> {
        let path = non_empty(attrs, "path")
            .ok_or_else(|| LoggerError::missing_attribute("file writer", "path"))?;
        let policy = RotationPolicy::from_attrs(attrs)?;
        Self::with_policy(path, policy)
    }

    fn open_append(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_writer(path.display().to_string(), format!("Failed to open: {}", e))
            })?;
        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_writer(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();
        Ok((file, size))
    }

    /// Whether writing `incoming` more bytes would cross the threshold
    fn should_rotate(&self, incoming: usize) -> bool {
        let threshold = self.policy.max_bytes.max(self.retry_rotation_at);
        self.policy.max_bytes > 0
            && self.current_size > 0
            && self.current_size + incoming as u64 > threshold
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        self.remove_oldest_backup()?;

        for i in (1..self.policy.max_backup_files).rev() {
            let old_path = self.backup_path(i);
            let new_path = self.backup_path(i + 1);
            let old_compressed = gz_path(&old_path);

            if old_compressed.exists() {
                replace_file(&old_compressed, &gz_path(&new_path))?;
            } else if old_path.exists() {
                replace_file(&old_path, &new_path)?;
            }
        }

        if self.policy.max_backup_files > 0 && self.base_path.exists() {
            let backup = self.backup_path(1);
            fs::rename(&self.base_path, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;
            if self.policy.compress {
                compress_file(&backup)?;
            }
        } else if self.base_path.exists() {
            // No backups kept: start over in place
            fs::remove_file(&self.base_path)?;
        }

        let (file, size) = Self::open_append(&self.base_path).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to create new log file: {}", e),
            )
        })?;
        self.writer = Some(BufWriter::with_capacity(self.policy.buffer_capacity, file));
        self.current_size = size;
        self.retry_rotation_at = 0;
        Ok(())
    }

    fn remove_oldest_backup(&mut self) -> Result<()> {
        if self.policy.max_backup_files == 0 {
            return Ok(());
        }
        let oldest = self.backup_path(self.policy.max_backup_files);
        let mut deletion_failed = false;

        for candidate in [gz_path(&oldest), oldest] {
            if candidate.exists() {
                if let Err(e) = fs::remove_file(&candidate) {
                    deletion_failed = true;
                    eprintln!(
                        "[LOGGER WARN] Failed to remove oldest backup {}: {} (failure #{}/{})",
                        candidate.display(),
                        e,
                        self.deletion_failure_count + 1,
                        MAX_DELETION_FAILURES
                    );
                }
            }
        }

        if !deletion_failed {
            self.deletion_failure_count = 0;
            return Ok(());
        }
        self.deletion_failure_count += 1;
        if self.deletion_failure_count >= MAX_DELETION_FAILURES {
            return Err(LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!(
                    "Rotation aborted: failed to delete old backup files {} consecutive times",
                    self.deletion_failure_count
                ),
            ));
        }
        Ok(())
    }

    /// Backup file path for the given index
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log")
            .to_string();
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    /// Recover after a failed rotation by continuing on the current file
    fn recover(&mut self, error: LoggerError) -> Result<()> {
        eprintln!(
            "[LOGGER WARN] Log rotation failed: {}. Continuing with current file.",
            error
        );
        if self.writer.is_none() {
            match Self::open_append(&self.base_path) {
                Ok((file, size)) => {
                    self.writer = Some(BufWriter::with_capacity(self.policy.buffer_capacity, file));
                    self.current_size = size;
                }
                Err(reopen_err) => {
                    eprintln!(
                        "[LOGGER ERROR] Failed to reopen log file after rotation failure: {}",
                        reopen_err
                    );
                    return Err(error);
                }
            }
        }
        // Let the file grow another full threshold before retrying
        self.retry_rotation_at = self.current_size + self.policy.max_bytes;
        Ok(())
    }

    /// Logical size of the current file, buffered bytes included
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

impl Writer for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        if self.should_rotate(buf.len()) {
            if let Err(e) = self.rotate() {
                self.recover(e)?;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::other("File writer not initialized"))?;
        writer.write_all(buf).map_err(|e| {
            LoggerError::file_writer(
                self.base_path.display().to_string(),
                format!("Failed to write log record: {}", e),
            )
        })?;
        self.current_size += buf.len() as u64;

        if let Some(interval) = self.policy.flush_interval {
            if self.last_flush.elapsed() >= interval {
                self.flush()?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_writer(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        self.last_flush = Instant::now();
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for RotatingFileWriter {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                eprintln!(
                    "[LOGGER WARN] Failed to flush {} on close: {}",
                    self.base_path.display(),
                    e
                );
            }
        }
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

/// Rename, falling back to remove-then-rename where rename refuses to
/// replace an existing destination
fn replace_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    if to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to).map_err(|e| {
        LoggerError::file_rotation(
            from.display().to_string(),
            format!("Failed to rotate backup files: {}", e),
        )
    })
}

/// Gzip `path` next to itself and remove the original once the compressed
/// copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{copy, BufReader};

    let gz = gz_path(path);
    let mut temp = gz.clone().into_os_string();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    let result = (|| -> std::io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&temp)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&temp, &gz)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARN] Compressed {} but failed to remove the original: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_policy_from_attrs() {
        let policy = RotationPolicy::from_attrs(&attrs(&[
            ("size", "1048576"),
            ("backups", "3"),
            ("compress", "true"),
            ("flush_interval_ms", "250"),
        ]))
        .unwrap();

        assert_eq!(policy.max_bytes, 1_048_576);
        assert_eq!(policy.max_backup_files, 3);
        assert!(policy.compress);
        assert_eq!(policy.flush_interval, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_policy_rejects_bad_size() {
        let err = RotationPolicy::from_attrs(&attrs(&[("size", "1MB")])).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidAttribute { .. }));
        assert!(err.to_string().contains("size"));
    }

    #[test]
    fn test_missing_path() {
        let err = RotatingFileWriter::from_attrs(&attrs(&[("size", "10")]))
            .err()
            .unwrap();
        assert!(matches!(err, LoggerError::MissingAttribute { .. }));
    }

    #[test]
    fn test_buffered_until_flush() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("buffered.log");

        let mut writer = RotatingFileWriter::new(&log_path).unwrap();
        writer.write(b"first record\n").unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");

        writer.flush().unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "first record\n");
        assert_eq!(writer.current_size(), 13);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested").join("deeper").join("app.log");

        let writer = RotatingFileWriter::new(&log_path).unwrap();
        assert_eq!(writer.path(), log_path);
        assert!(log_path.exists());
    }

    #[test]
    fn test_rotates_before_crossing_threshold() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("rotation.log");

        let policy = RotationPolicy::new().with_max_size(20).with_max_backups(3);
        let mut writer = RotatingFileWriter::with_policy(&log_path, policy).unwrap();

        writer.write(b"0123456789\n").unwrap(); // 11 bytes
        writer.write(b"abcdefghij\n").unwrap(); // would make 22: rotate first
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "abcdefghij\n");
        assert_eq!(
            fs::read_to_string(writer.backup_path(1)).unwrap(),
            "0123456789\n"
        );
    }

    #[test]
    fn test_oversized_record_goes_to_fresh_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("big.log");

        let policy = RotationPolicy::new().with_max_size(8);
        let mut writer = RotatingFileWriter::with_policy(&log_path, policy).unwrap();

        writer.write(b"a very long record\n").unwrap();
        writer.flush().unwrap();
        assert!(!writer.backup_path(1).exists());
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "a very long record\n");
    }

    #[test]
    fn test_keeps_at_most_max_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("multi.log");

        let policy = RotationPolicy::new().with_max_size(16).with_max_backups(2);
        let mut writer = RotatingFileWriter::with_policy(&log_path, policy).unwrap();

        for i in 0..50 {
            writer.write(format!("Entry {:04}\n", i).as_bytes()).unwrap();
        }
        writer.flush().unwrap();

        let log_files = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_str().unwrap().starts_with("multi.log"))
            .count();
        assert_eq!(log_files, 3);
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "Entry 0049\n");
    }

    #[test]
    fn test_compressed_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("gz.log");

        let policy = RotationPolicy::new()
            .with_max_size(12)
            .with_max_backups(2)
            .with_compression(true);
        let mut writer = RotatingFileWriter::with_policy(&log_path, policy).unwrap();

        writer.write(b"first line\n").unwrap();
        writer.write(b"second line\n").unwrap();
        writer.flush().unwrap();

        let backup = gz_path(&writer.backup_path(1));
        assert!(backup.exists());
        assert!(!writer.backup_path(1).exists());

        let mut decoder = flate2::read::GzDecoder::new(File::open(backup).unwrap());
        let mut text = String::new();
        decoder.read_to_string(&mut text).unwrap();
        assert_eq!(text, "first line\n");
    }

    #[test]
    fn test_periodic_flush() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("periodic.log");

        let policy = RotationPolicy::new().with_flush_interval(Duration::from_millis(1));
        let mut writer = RotatingFileWriter::with_policy(&log_path, policy).unwrap();

        std::thread::sleep(Duration::from_millis(5));
        writer.write(b"flushed by interval\n").unwrap();
        assert_eq!(
            fs::read_to_string(&log_path).unwrap(),
            "flushed by interval\n"
        );
    }

    #[test]
    fn test_drop_flushes_tail() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("drop.log");

        {
            let mut writer = RotatingFileWriter::new(&log_path).unwrap();
            writer.write(b"tail\n").unwrap();
        }
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "tail\n");
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("existing.log");
        fs::write(&log_path, "old\n").unwrap();

        let writer = RotatingFileWriter::new(&log_path).unwrap();
        assert_eq!(writer.current_size(), 4);
    }

    #[test]
    fn test_failed_rotation_keeps_writing_current_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("blocked.log");

        // A non-empty directory where the first backup belongs makes the
        // rename fail
        let blocker = dir.path().join("blocked.log.1");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("occupied"), "x").unwrap();

        let policy = RotationPolicy::new().with_max_size(20).with_max_backups(1);
        let mut writer = RotatingFileWriter::with_policy(&log_path, policy).unwrap();

        writer.write(b"0123456789\n").unwrap();
        writer.write(b"abcdefghij\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(
            fs::read_to_string(&log_path).unwrap(),
            "0123456789\nabcdefghij\n"
        );
        assert_eq!(writer.current_size(), 22);
        assert!(blocker.is_dir());
    }

    #[test]
    fn test_rotation_retried_after_another_threshold() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("retry.log");
        let blocker = dir.path().join("retry.log.1");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("occupied"), "x").unwrap();

        let policy = RotationPolicy::new().with_max_size(20).with_max_backups(1);
        let mut writer = RotatingFileWriter::with_policy(&log_path, policy).unwrap();

        writer.write(b"0123456789\n").unwrap();
        writer.write(b"abcdefghij\n").unwrap(); // rotation fails, retry at 31

        fs::remove_dir_all(&blocker).unwrap();
        writer.write(b"klmnopqrst\n").unwrap(); // 33 > 31: rotates now
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "klmnopqrst\n");
        assert_eq!(
            fs::read_to_string(writer.backup_path(1)).unwrap(),
            "0123456789\nabcdefghij\n"
        );
        assert_eq!(writer.current_size(), 11);
    }
}
