//! Writer trait for log output destinations

use super::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// A destination that accepts complete, already formatted records.
///
/// Implementations are not required to be internally synchronized; the level
/// registry wraps every installed writer in a [`SharedWriter`] so concurrent
/// records reach `write` one at a time.
pub trait Writer: Send {
    fn write(&mut self, buf: &[u8]) -> Result<()>;

    /// Push buffered bytes to the underlying destination
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// A writer shared between level bindings, serialized by its mutex
pub type SharedWriter = Arc<Mutex<Box<dyn Writer>>>;

pub fn share(writer: Box<dyn Writer>) -> SharedWriter {
    Arc::new(Mutex::new(writer))
}
