//! Writer that drops everything

use crate::core::{Result, Writer};

/// Accepts and drops all input without error
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardWriter;

impl DiscardWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Writer for DiscardWriter {
    fn write(&mut self, _buf: &[u8]) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "discard"
    }
}
