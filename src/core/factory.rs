//! Writer factory registry
//!
//! Maps a writer-kind name to the constructor that builds that kind of
//! writer from configuration attributes. Consulted only while configuring.

use super::{
    config::Attributes,
    error::{LoggerError, Result},
    writer::Writer,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a writer from the attributes of one configuration entry
pub type WriterConstructor = Arc<dyn Fn(&Attributes) -> Result<Box<dyn Writer>> + Send + Sync>;

#[derive(Clone, Default)]
pub struct WriterFactories {
    constructors: HashMap<String, WriterConstructor>,
}

impl WriterFactories {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in kinds: `console`, `file` (alias
    /// `rotate`) and `discard`.
    pub fn with_defaults() -> Self {
        let mut factories = Self::new();

        #[cfg(feature = "console")]
        factories.register("console", |attrs| {
            Ok(Box::new(crate::writers::ConsoleWriter::from_attrs(attrs)?) as Box<dyn Writer>)
        });

        #[cfg(feature = "file")]
        {
            factories.register("file", |attrs| {
                Ok(Box::new(crate::writers::RotatingFileWriter::from_attrs(attrs)?) as Box<dyn Writer>)
            });
            factories.register("rotate", |attrs| {
                Ok(Box::new(crate::writers::RotatingFileWriter::from_attrs(attrs)?) as Box<dyn Writer>)
            });
        }

        factories.register("discard", |_| {
            Ok(Box::new(crate::writers::DiscardWriter::new()) as Box<dyn Writer>)
        });

        factories
    }

    /// Register a constructor for `kind`. An existing constructor for the
    /// same kind is replaced.
    pub fn register<F>(&mut self, kind: impl Into<String>, constructor: F)
    where
        F: Fn(&Attributes) -> Result<Box<dyn Writer>> + Send + Sync + 'static,
    {
        self.constructors.insert(kind.into(), Arc::new(constructor));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Build a writer of `kind` from `attrs`
    pub fn build(&self, kind: &str, attrs: &Attributes) -> Result<Box<dyn Writer>> {
        let constructor = self
            .constructors
            .get(kind)
            .ok_or_else(|| LoggerError::UnknownWriterKind(kind.to_string()))?;
        constructor(attrs)
    }
}

impl fmt::Debug for WriterFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterFactories")
            .field("kinds", &self.kinds())
            .finish()
    }
}
