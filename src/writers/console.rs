//! Console writer implementation

use crate::core::{Attributes, LoggerError, Result, Writer};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

const RESET: &str = "\x1b[0m";

/// Standard stream a console writer targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    Stdout,
    #[default]
    Stderr,
    /// Accepted for configuration compatibility; stdin is not writable, so
    /// records are dropped.
    Stdin,
}

impl ConsoleStream {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleStream::Stdout => "stdout",
            ConsoleStream::Stderr => "stderr",
            ConsoleStream::Stdin => "stdin",
        }
    }

    fn open(&self) -> Box<dyn Write + Send> {
        match self {
            ConsoleStream::Stdout => Box::new(io::stdout()),
            ConsoleStream::Stderr => Box::new(io::stderr()),
            ConsoleStream::Stdin => Box::new(io::sink()),
        }
    }
}

impl FromStr for ConsoleStream {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stdout" => Ok(ConsoleStream::Stdout),
            "stderr" => Ok(ConsoleStream::Stderr),
            "stdin" => Ok(ConsoleStream::Stdin),
            _ => Err(LoggerError::InvalidStreamSelector(s.to_string())),
        }
    }
}

impl fmt::Display for ConsoleStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed console palette; `Default` leaves the terminal color unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleColor {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl ConsoleColor {
    pub fn parse_named(which: &str, name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "default" => Ok(ConsoleColor::Default),
            "black" => Ok(ConsoleColor::Black),
            "red" => Ok(ConsoleColor::Red),
            "green" => Ok(ConsoleColor::Green),
            "yellow" => Ok(ConsoleColor::Yellow),
            "blue" => Ok(ConsoleColor::Blue),
            "magenta" => Ok(ConsoleColor::Magenta),
            "cyan" => Ok(ConsoleColor::Cyan),
            "white" => Ok(ConsoleColor::White),
            _ => Err(LoggerError::invalid_color(which, name)),
        }
    }

    pub fn color_code(&self) -> Option<colored::Color> {
        use colored::Color::*;
        match self {
            ConsoleColor::Default => None,
            ConsoleColor::Black => Some(Black),
            ConsoleColor::Red => Some(Red),
            ConsoleColor::Green => Some(Green),
            ConsoleColor::Yellow => Some(Yellow),
            ConsoleColor::Blue => Some(Blue),
            ConsoleColor::Magenta => Some(Magenta),
            ConsoleColor::Cyan => Some(Cyan),
            ConsoleColor::White => Some(White),
        }
    }
}

/// Writes records to a standard stream wrapped in color escapes
pub struct ConsoleWriter {
    stream: ConsoleStream,
    foreground: ConsoleColor,
    background: ConsoleColor,
    start: String,
    output: Box<dyn Write + Send>,
}

impl ConsoleWriter {
    /// Red on the default background, on stderr
    pub fn new() -> Self {
        Self::with_colors(ConsoleStream::Stderr, ConsoleColor::Red, ConsoleColor::Default)
    }

    pub fn with_colors(
        stream: ConsoleStream,
        foreground: ConsoleColor,
        background: ConsoleColor,
    ) -> Self {
        Self::with_output(stream, foreground, background, stream.open())
    }

    /// Build a writer that sends its bytes to `output` instead of the real
    /// stream. `stream` is kept for reporting.
    pub fn with_output(
        stream: ConsoleStream,
        foreground: ConsoleColor,
        background: ConsoleColor,
        output: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            stream,
            foreground,
            background,
            start: start_sequence(foreground, background),
            output,
        }
    }

    /// Construct from configuration attributes.
    ///
    /// `output` defaults to stderr, `foreground` to red and `background` to
    /// the terminal default.
    pub fn from_attrs(attrs: &Attributes) -> Result<Self> {
        let stream = match attrs.get("output") {
            Some(name) => name.parse()?,
            None => ConsoleStream::Stderr,
        };
        let foreground = match attrs.get("foreground") {
            Some(name) => ConsoleColor::parse_named("foreground", name)?,
            None => ConsoleColor::Red,
        };
        let background = match attrs.get("background") {
            Some(name) => ConsoleColor::parse_named("background", name)?,
            None => ConsoleColor::Default,
        };
        Ok(Self::with_colors(stream, foreground, background))
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }

    pub fn foreground(&self) -> ConsoleColor {
        self.foreground
    }

    pub fn background(&self) -> ConsoleColor {
        self.background
    }

    /// The bytes a write of `payload` puts on the stream
    pub fn render(&self, payload: &[u8]) -> Vec<u8> {
        if self.start.is_empty() {
            return payload.to_vec();
        }
        let mut out = Vec::with_capacity(self.start.len() + payload.len() + RESET.len());
        out.extend_from_slice(self.start.as_bytes());
        out.extend_from_slice(payload);
        out.extend_from_slice(RESET.as_bytes());
        out
    }
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn start_sequence(foreground: ConsoleColor, background: ConsoleColor) -> String {
    let mut codes = Vec::with_capacity(2);
    if let Some(fg) = foreground.color_code() {
        codes.push(fg.to_fg_str().into_owned());
    }
    if let Some(bg) = background.color_code() {
        codes.push(bg.to_bg_str().into_owned());
    }
    if codes.is_empty() {
        String::new()
    } else {
        format!("\x1b[{}m", codes.join(";"))
    }
}

impl Writer for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        let bytes = self.render(buf);
        let stream = self.stream;
        self.output.write_all(&bytes).map_err(|e| {
            LoggerError::io_operation("writing to console", format!("{} write failed", stream), e)
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
