//! Logging macros
//!
//! Every macro has two forms. Without a receiver it logs through the
//! process-wide [`facade`](crate::facade); with `logs =>` in front it logs
//! through that [`Logs`](crate::Logs) instance.
//!
//! Println-style macros (`info!`, `error!`, ...) serialize their arguments as
//! one JSON array. Printf-style macros (`infof!`, `errorf!`, ...) take a
//! `format!` template. Either way the record carries the macro call site.
//!
//! # Examples
//!
//! ```
//! use leveled_logger::prelude::*;
//! use leveled_logger::{info, infof};
//!
//! let buffer = MemoryWriter::new();
//! let logs = Logs::builder()
//!     .writer(Severity::Info, buffer.clone(), "[INFO] ", Flags::NONE)
//!     .build();
//!
//! info!(logs => "user", 42).unwrap();
//! infof!(logs => "listening on port {}", 8080).unwrap();
//!
//! assert_eq!(buffer.lines(), vec![
//!     "[INFO] [\"user\",42]",
//!     "[INFO] listening on port 8080",
//! ]);
//! ```

/// Log JSON-encoded arguments at an explicit level.
///
/// At most 16 arguments, the largest tuple serde encodes.
///
/// ```
/// # use leveled_logger::prelude::*;
/// use leveled_logger::log;
/// let logs = Logs::new();
/// log!(logs => Severity::Warn, "disk", 93.5).unwrap();
/// log!(Severity::Info, "default instance").unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logs:expr => $level:expr, $($arg:expr),+ $(,)?) => {
        $logs.log($level, &($(&$arg,)+))
    };
    ($level:expr, $($arg:expr),+ $(,)?) => {
        $crate::facade::log($level, &($(&$arg,)+))
    };
}

/// Log a formatted message at an explicit level.
#[macro_export]
macro_rules! logf {
    ($logs:expr => $level:expr, $($arg:tt)+) => {
        $logs.logf($level, format_args!($($arg)+))
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::facade::logf($level, format_args!($($arg)+))
    };
}

/// Log JSON-encoded arguments at critical level.
#[macro_export]
macro_rules! critical {
    ($logs:expr => $($arg:expr),+ $(,)?) => {
        $crate::log!($logs => $crate::Severity::Critical, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::log!($crate::Severity::Critical, $($arg),+)
    };
}

#[macro_export]
macro_rules! criticalf {
    ($logs:expr => $($arg:tt)+) => {
        $crate::logf!($logs => $crate::Severity::Critical, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::logf!($crate::Severity::Critical, $($arg)+)
    };
}

/// Log JSON-encoded arguments at error level.
///
/// ```
/// # use leveled_logger::prelude::*;
/// use leveled_logger::error;
/// let logs = Logs::new();
/// error!(logs => "connection refused", 111).unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logs:expr => $($arg:expr),+ $(,)?) => {
        $crate::log!($logs => $crate::Severity::Error, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::log!($crate::Severity::Error, $($arg),+)
    };
}

#[macro_export]
macro_rules! errorf {
    ($logs:expr => $($arg:tt)+) => {
        $crate::logf!($logs => $crate::Severity::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::logf!($crate::Severity::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logs:expr => $($arg:expr),+ $(,)?) => {
        $crate::log!($logs => $crate::Severity::Warn, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::log!($crate::Severity::Warn, $($arg),+)
    };
}

/// Log a formatted warning.
///
/// ```
/// # use leveled_logger::prelude::*;
/// use leveled_logger::warnf;
/// let logs = Logs::new();
/// warnf!(logs => "retry {} of {}", 1, 3).unwrap();
/// ```
#[macro_export]
macro_rules! warnf {
    ($logs:expr => $($arg:tt)+) => {
        $crate::logf!($logs => $crate::Severity::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::logf!($crate::Severity::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logs:expr => $($arg:expr),+ $(,)?) => {
        $crate::log!($logs => $crate::Severity::Info, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::log!($crate::Severity::Info, $($arg),+)
    };
}

#[macro_export]
macro_rules! infof {
    ($logs:expr => $($arg:tt)+) => {
        $crate::logf!($logs => $crate::Severity::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::logf!($crate::Severity::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logs:expr => $($arg:expr),+ $(,)?) => {
        $crate::log!($logs => $crate::Severity::Debug, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::log!($crate::Severity::Debug, $($arg),+)
    };
}

#[macro_export]
macro_rules! debugf {
    ($logs:expr => $($arg:tt)+) => {
        $crate::logf!($logs => $crate::Severity::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::logf!($crate::Severity::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! trace {
    ($logs:expr => $($arg:expr),+ $(,)?) => {
        $crate::log!($logs => $crate::Severity::Trace, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::log!($crate::Severity::Trace, $($arg),+)
    };
}

#[macro_export]
macro_rules! tracef {
    ($logs:expr => $($arg:tt)+) => {
        $crate::logf!($logs => $crate::Severity::Trace, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::logf!($crate::Severity::Trace, $($arg)+)
    };
}

/// Write JSON-encoded arguments to every level, whatever the floor.
#[macro_export]
macro_rules! all {
    ($logs:expr => $($arg:expr),+ $(,)?) => {
        $logs.all(&($(&$arg,)+))
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::facade::all(&($(&$arg,)+))
    };
}

#[macro_export]
macro_rules! allf {
    ($logs:expr => $($arg:tt)+) => {
        $logs.allf(format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::facade::allf(format_args!($($arg)+))
    };
}

/// Broadcast, flush every writer, then exit with status 2.
#[macro_export]
macro_rules! fatal {
    ($logs:expr => $($arg:expr),+ $(,)?) => {
        $logs.fatal(&($(&$arg,)+))
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::facade::fatal(&($(&$arg,)+))
    };
}

#[macro_export]
macro_rules! fatalf {
    ($logs:expr => $($arg:tt)+) => {
        $logs.fatalf(format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::facade::fatalf(format_args!($($arg)+))
    };
}

/// Broadcast, flush every writer, then panic with the encoded arguments.
#[macro_export]
macro_rules! panic_log {
    ($logs:expr => $($arg:expr),+ $(,)?) => {
        $logs.panic(&($(&$arg,)+))
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::facade::panic(&($(&$arg,)+))
    };
}

#[macro_export]
macro_rules! panicf {
    ($logs:expr => $($arg:tt)+) => {
        $logs.panicf(format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::facade::panicf(format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Flags, Logs, Severity};
    use crate::writers::MemoryWriter;

    fn every_level(prefix_with_label: bool) -> (Logs, MemoryWriter) {
        let buffer = MemoryWriter::new();
        let mut builder = Logs::builder();
        for level in Severity::ALL {
            let prefix = if prefix_with_label {
                format!("{} ", level.label())
            } else {
                String::new()
            };
            builder = builder.writer(level, buffer.clone(), prefix, Flags::NONE);
        }
        (builder.build(), buffer)
    }

    #[test]
    fn test_level_macros() {
        let (logs, buffer) = every_level(true);

        critical!(logs => "c").unwrap();
        error!(logs => "e", 1).unwrap();
        warn!(logs => "w").unwrap();
        info!(logs => "i").unwrap();
        debug!(logs => "d").unwrap();
        trace!(logs => "t").unwrap();

        assert_eq!(
            buffer.lines(),
            vec![
                "CRITICAL [\"c\"]",
                "ERROR [\"e\",1]",
                "WARN [\"w\"]",
                "INFO [\"i\"]",
                "DEBUG [\"d\"]",
                "TRACE [\"t\"]",
            ]
        );
    }

    #[test]
    fn test_printf_macros() {
        let (logs, buffer) = every_level(false);

        criticalf!(logs => "{}", 0).unwrap();
        errorf!(logs => "code {}", 500).unwrap();
        warnf!(logs => "retry {} of {}", 1, 3).unwrap();
        infof!(logs => "plain").unwrap();
        debugf!(logs => "{:>4}", 7).unwrap();
        tracef!(logs => "{name}", name = "x").unwrap();

        assert_eq!(
            buffer.lines(),
            vec!["0", "code 500", "retry 1 of 3", "plain", "   7", "x"]
        );
    }

    #[test]
    fn test_explicit_level_macros() {
        let (logs, buffer) = every_level(false);
        log!(logs => Severity::Warn, vec![1, 2]).unwrap();
        logf!(logs => Severity::Debug, "{}-{}", "a", "b").unwrap();
        assert_eq!(buffer.lines(), vec!["[[1,2]]", "a-b"]);
    }

    #[test]
    fn test_all_macros_broadcast() {
        let (logs, buffer) = every_level(false);
        all!(logs => "everyone").unwrap();
        allf!(logs => "n={}", 6).unwrap();

        let lines = buffer.lines();
        assert_eq!(lines.len(), 2 * Severity::COUNT);
        assert_eq!(lines.iter().filter(|l| *l == "[\"everyone\"]").count(), Severity::COUNT);
        assert_eq!(lines.iter().filter(|l| *l == "n=6").count(), Severity::COUNT);
    }

    #[test]
    fn test_panic_macro_carries_message() {
        let (logs, buffer) = every_level(false);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            panicf!(logs => "invariant {} broken", 7);
        }));

        let payload = result.unwrap_err();
        assert_eq!(
            payload.downcast_ref::<String>().map(String::as_str),
            Some("invariant 7 broken")
        );
        assert_eq!(buffer.lines().len(), Severity::COUNT);
    }

    #[test]
    fn test_record_points_at_macro_call_site() {
        let buffer = MemoryWriter::new();
        let logs = Logs::builder()
            .writer(Severity::Info, buffer.clone(), "", Flags::SHORT_FILE)
            .build();

        let line = line!() + 1;
        infof!(logs => "here").unwrap();
        assert_eq!(buffer.contents(), format!("macros.rs:{}: here\n", line));
    }
}
