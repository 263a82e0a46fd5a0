//! Writer implementations

#[cfg(feature = "console")]
pub mod console;
pub mod discard;
pub mod memory;
#[cfg(feature = "file")]
pub mod rotating_file;

#[cfg(feature = "console")]
pub use console::{ConsoleColor, ConsoleStream, ConsoleWriter};
pub use discard::DiscardWriter;
pub use memory::MemoryWriter;
#[cfg(feature = "file")]
pub use rotating_file::{RotatingFileWriter, RotationPolicy};
