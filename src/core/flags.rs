//! Record formatting flags
//!
//! The numeric values follow the classic `log` flag layout, so integer
//! `flag` attributes written for other leveled loggers keep their meaning.

use super::error::{LoggerError, Result};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u32);

impl Flags {
    pub const NONE: Flags = Flags(0);
    /// Local date: `2009/01/23`
    pub const DATE: Flags = Flags(1);
    /// Local time: `01:23:23`
    pub const TIME: Flags = Flags(1 << 1);
    /// Microsecond resolution, implies `TIME`
    pub const MICROSECONDS: Flags = Flags(1 << 2);
    /// Full file path and line number
    pub const LONG_FILE: Flags = Flags(1 << 3);
    /// Final path component and line number, overrides `LONG_FILE`
    pub const SHORT_FILE: Flags = Flags(1 << 4);
    /// Use UTC instead of the local time zone
    pub const UTC: Flags = Flags(1 << 5);
    /// Put the prefix right before the message instead of at line start
    pub const MSG_PREFIX: Flags = Flags(1 << 6);
    pub const STD: Flags = Self::DATE.union(Self::TIME);

    const ALL_BITS: u32 = (1 << 7) - 1;

    pub const fn union(self, other: Flags) -> Flags {
        Flags(self.0 | other.0)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Build from raw bits, rejecting unknown ones
    pub fn from_bits(bits: u32) -> Option<Flags> {
        (bits & !Self::ALL_BITS == 0).then_some(Flags(bits))
    }

    #[inline]
    pub const fn contains(&self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn has_timestamp(&self) -> bool {
        self.0 & (Self::DATE.0 | Self::TIME.0 | Self::MICROSECONDS.0) != 0
    }

    pub fn has_location(&self) -> bool {
        self.0 & (Self::LONG_FILE.0 | Self::SHORT_FILE.0) != 0
    }

    /// Parse the optional `flag` attribute of a configuration entry.
    ///
    /// Absent or blank values mean no flags. Accepts an integer or names
    /// joined by `|`, e.g. `"log.Ldate|log.Ltime"` or `"date | shortfile"`.
    pub fn parse_attr(value: Option<&str>) -> Result<Flags> {
        match value.map(str::trim) {
            None | Some("") => Ok(Flags::NONE),
            Some(text) => text.parse(),
        }
    }

    fn from_name(name: &str) -> Option<Flags> {
        let lower = name.trim().to_lowercase();
        let lower = lower.strip_prefix("log.").unwrap_or(&lower);
        let bare = match lower {
            "lstdflags" => "std",
            "lmsgprefix" => "msgprefix",
            other => other.strip_prefix('l').filter(|s| Self::named(s).is_some()).unwrap_or(other),
        };
        Self::named(bare)
    }

    fn named(name: &str) -> Option<Flags> {
        match name {
            "date" => Some(Flags::DATE),
            "time" => Some(Flags::TIME),
            "microseconds" => Some(Flags::MICROSECONDS),
            "longfile" => Some(Flags::LONG_FILE),
            "shortfile" => Some(Flags::SHORT_FILE),
            "utc" => Some(Flags::UTC),
            "msgprefix" => Some(Flags::MSG_PREFIX),
            "std" | "stdflags" => Some(Flags::STD),
            _ => None,
        }
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        self.union(rhs)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl FromStr for Flags {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        if let Ok(bits) = text.parse::<i64>() {
            return u32::try_from(bits)
                .ok()
                .and_then(Flags::from_bits)
                .ok_or_else(|| LoggerError::invalid_flag(s, "unknown flag bits"));
        }

        text.split('|').try_fold(Flags::NONE, |acc, name| {
            Flags::from_name(name)
                .map(|flag| acc | flag)
                .ok_or_else(|| LoggerError::invalid_flag(s, format!("unknown flag name '{}'", name.trim())))
        })
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!("3".parse::<Flags>().unwrap(), Flags::STD);
        assert_eq!("19".parse::<Flags>().unwrap(), Flags::STD | Flags::SHORT_FILE);
        assert_eq!("0".parse::<Flags>().unwrap(), Flags::NONE);
    }

    #[test]
    fn test_parse_names() {
        let flags: Flags = "log.Ldate|log.Ltime|log.Lshortfile".parse().unwrap();
        assert_eq!(flags, Flags::DATE | Flags::TIME | Flags::SHORT_FILE);

        let flags: Flags = "std | microseconds".parse().unwrap();
        assert!(flags.contains(Flags::MICROSECONDS));
        assert!(flags.contains(Flags::DATE));

        assert_eq!("LstdFlags".parse::<Flags>().unwrap(), Flags::STD);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            "abc".parse::<Flags>(),
            Err(LoggerError::InvalidFlagValue { .. })
        ));
        assert!(matches!(
            "-1".parse::<Flags>(),
            Err(LoggerError::InvalidFlagValue { .. })
        ));
        assert!(matches!(
            "4096".parse::<Flags>(),
            Err(LoggerError::InvalidFlagValue { .. })
        ));
    }

    #[test]
    fn test_absent_attribute_is_empty() {
        assert_eq!(Flags::parse_attr(None).unwrap(), Flags::NONE);
        assert_eq!(Flags::parse_attr(Some("  ")).unwrap(), Flags::NONE);
        assert_eq!(Flags::parse_attr(Some("2")).unwrap(), Flags::TIME);
    }
}
