//! Record header formatting
//!
//! One record is laid out as
//! `prefix date time file:line: message\n`, each header part switched on by
//! its [`Flags`] bit.

use super::flags::Flags;
use chrono::{DateTime, Local, Utc};
use std::fmt::Write as _;
use std::panic::Location;

/// Render one complete record into `out`.
pub fn format_record(
    out: &mut String,
    prefix: &str,
    flags: Flags,
    now: DateTime<Utc>,
    location: Option<&Location<'_>>,
    message: &str,
) {
    if !flags.contains(Flags::MSG_PREFIX) {
        out.push_str(prefix);
    }

    if flags.has_timestamp() {
        if flags.contains(Flags::UTC) {
            write_timestamp(out, flags, &now);
        } else {
            write_timestamp(out, flags, &now.with_timezone(&Local));
        }
    }

    if flags.has_location() {
        match location {
            Some(loc) => {
                let file = if flags.contains(Flags::SHORT_FILE) {
                    short_file(loc.file())
                } else {
                    loc.file()
                };
                let _ = write!(out, "{}:{}: ", file, loc.line());
            }
            None => out.push_str("???:0: "),
        }
    }

    if flags.contains(Flags::MSG_PREFIX) {
        out.push_str(prefix);
    }

    out.push_str(message);
    if !message.ends_with('\n') {
        out.push('\n');
    }
}

fn write_timestamp<Tz>(out: &mut String, flags: Flags, at: &DateTime<Tz>)
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if flags.contains(Flags::DATE) {
        let _ = write!(out, "{} ", at.format("%Y/%m/%d"));
    }
    if flags.contains(Flags::MICROSECONDS) {
        let _ = write!(out, "{} ", at.format("%H:%M:%S%.6f"));
    } else if flags.contains(Flags::TIME) {
        let _ = write!(out, "{} ", at.format("%H:%M:%S"));
    }
}

fn short_file(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
