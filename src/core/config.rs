//! Declarative configuration
//!
//! A configuration maps level names to the attributes of the writer that
//! level should use:
//!
//! ```json
//! {
//!     "info":  { "kind": "console", "output": "stdout", "foreground": "green" },
//!     "error": { "kind": "file", "path": "/var/log/app.log", "size": 1048576,
//!                "prefix": "[ERROR] ", "flag": "log.Ldate|log.Ltime" }
//! }
//! ```
//!
//! The same object may be wrapped in a top-level `{"logs": { ... }}`
//! container. `kind`, `prefix` and `flag` are read by the pipeline; every
//! other attribute belongs to the writer.

use super::{
    error::{LoggerError, Result},
    factory::WriterFactories,
    flags::Flags,
    registry::LevelBinding,
    severity::Severity,
    writer::{share, SharedWriter},
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Attributes of one configuration entry
pub type Attributes = BTreeMap<String, String>;

pub const KIND: &str = "kind";
pub const PREFIX: &str = "prefix";
pub const FLAG: &str = "flag";

/// Flags installed by [`Config::from_flat_map`]
pub const FLAT_MAP_FLAGS: Flags = Flags::STD.union(Flags::SHORT_FILE);

/// Flat-map keys forwarded to the file writer in addition to `path` and `size`
const FLAT_MAP_PASSTHROUGH: [&str; 3] = ["backups", "compress", "flush_interval_ms"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    items: BTreeMap<String, Attributes>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AttrValue {
    Text(String),
    Number(serde_json::Number),
    Switch(bool),
}

impl AttrValue {
    fn into_string(self) -> String {
        match self {
            AttrValue::Text(text) => text,
            AttrValue::Number(number) => number.to_string(),
            AttrValue::Switch(switch) => switch.to_string(),
        }
    }
}

type RawItems = BTreeMap<String, BTreeMap<String, AttrValue>>;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Wrapped {
    logs: RawItems,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Wrapped(Wrapped),
    Bare(RawItems),
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the entry for `level`
    pub fn insert(&mut self, level: impl Into<String>, attrs: Attributes) {
        self.items.insert(level.into(), attrs);
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_entry<K, V>(mut self, level: impl Into<String>, attrs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let attrs = attrs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.insert(level, attrs);
        self
    }

    pub fn get(&self, level: &str) -> Option<&Attributes> {
        self.items.get(level)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Attributes)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Parse a JSON document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let items = match serde_json::from_str::<Document>(text)? {
            Document::Wrapped(wrapped) => wrapped.logs,
            Document::Bare(items) => items,
        };
        let items = items
            .into_iter()
            .map(|(level, attrs)| {
                let attrs = attrs
                    .into_iter()
                    .map(|(k, v)| (k, v.into_string()))
                    .collect();
                (level, attrs)
            })
            .collect();
        Ok(Self { items })
    }

    /// Read and parse a JSON document from `path`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading log configuration",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&text)
    }

    /// Build a configuration from a flat map with `path`, `size` and an
    /// optional `level` (default `info`).
    ///
    /// Every level gets a `file` writer on `path`; identical attributes make
    /// the levels share a single writer. Returns the validated floor level
    /// alongside the configuration.
    pub fn from_flat_map(data: &HashMap<String, String>) -> Result<(Self, Severity)> {
        let path = data
            .get("path")
            .filter(|p| !p.is_empty())
            .ok_or_else(|| LoggerError::missing_field("log path not found"))?;
        let size = data
            .get("size")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| LoggerError::missing_field("log rotate size not found"))?;
        let floor: Severity = match data.get("level").filter(|l| !l.is_empty()) {
            Some(level) => level.parse()?,
            None => Severity::Info,
        };

        let mut writer_attrs = Attributes::new();
        writer_attrs.insert(KIND.to_string(), "file".to_string());
        writer_attrs.insert("path".to_string(), path.clone());
        writer_attrs.insert("size".to_string(), size.clone());
        for key in FLAT_MAP_PASSTHROUGH {
            if let Some(value) = data.get(key) {
                writer_attrs.insert(key.to_string(), value.clone());
            }
        }

        let mut config = Self::new();
        for level in Severity::ALL {
            let mut attrs = writer_attrs.clone();
            attrs.insert(PREFIX.to_string(), format!("[{}] ", level.label()));
            attrs.insert(FLAG.to_string(), FLAT_MAP_FLAGS.bits().to_string());
            config.insert(level.as_str(), attrs);
        }
        Ok((config, floor))
    }

    /// Resolve every entry into a ready-to-install binding without touching
    /// any registry.
    ///
    /// Entries whose writer attributes (everything except `prefix` and
    /// `flag`) are identical share one writer instance. The first failing
    /// entry aborts preparation; its error names the entry.
    pub fn prepare(&self, factories: &WriterFactories) -> Result<Vec<(Severity, LevelBinding)>> {
        let mut built: Vec<(Attributes, SharedWriter)> = Vec::new();
        let mut bindings: Vec<(Severity, LevelBinding)> = Vec::with_capacity(self.items.len());

        for (name, attrs) in &self.items {
            let binding = Self::prepare_entry(name, attrs, factories, &mut built, &bindings)
                .map_err(|e| LoggerError::in_entry(name.as_str(), e))?;
            bindings.push(binding);
        }
        Ok(bindings)
    }

    fn prepare_entry(
        name: &str,
        attrs: &Attributes,
        factories: &WriterFactories,
        built: &mut Vec<(Attributes, SharedWriter)>,
        prepared: &[(Severity, LevelBinding)],
    ) -> Result<(Severity, LevelBinding)> {
        let level: Severity = name.parse()?;
        if prepared.iter().any(|(l, _)| *l == level) {
            return Err(LoggerError::other(format!(
                "level '{}' is configured more than once",
                level
            )));
        }

        let flags = Flags::parse_attr(attrs.get(FLAG).map(String::as_str))?;
        let kind = attrs
            .get(KIND)
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LoggerError::missing_attribute(format!("level '{}'", name), KIND))?;

        let identity: Attributes = attrs
            .iter()
            .filter(|(k, _)| k.as_str() != PREFIX && k.as_str() != FLAG)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let writer = match built.iter().find(|(key, _)| *key == identity) {
            Some((_, writer)) => writer.clone(),
            None => {
                let writer = share(factories.build(kind, attrs)?);
                built.push((identity, writer.clone()));
                writer
            }
        };

        let prefix = attrs.get(PREFIX).cloned().unwrap_or_default();
        Ok((level, LevelBinding::new(Some(writer), prefix, flags)))
    }
}
