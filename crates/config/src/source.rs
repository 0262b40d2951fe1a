//! The source capability and the in-memory map source.
//!
//! Responsibilities:
//! - Define `Source`, the single-key lookup capability every source implements.
//! - Define `BuildSource`, the lazily materialized source factory used by the loader.
//! - Provide `MapSource`, an in-memory source for defaults, overrides and tests.
//!
//! Does NOT handle:
//! - Merging several sources (see `provider.rs`).
//! - Coercing values (see `convert.rs`).
//!
//! Invariants:
//! - A missing key is `None`, never an error.
//! - Sources are immutable once built.

use std::collections::BTreeMap;

use crate::loader::LoadError;
use crate::value::{RawValue, Value};

/// A read-only provider of raw values keyed by configuration path.
pub trait Source {
    /// Look up the raw value stored under `key`.
    fn get_value(&self, key: &str) -> Option<RawValue>;

    /// Short description used in log output.
    fn name(&self) -> String {
        "source".to_string()
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn get_value(&self, key: &str) -> Option<RawValue> {
        (**self).get_value(key)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// A factory that materializes a source when the loader runs.
///
/// Building may fail (a required file is missing, a document is malformed);
/// such failures abort the whole load.
pub trait BuildSource {
    type Source: Source + 'static;

    fn build(self) -> Result<Self::Source, LoadError>;
}

/// In-memory source of explicit key/value pairs.
///
/// # Example
///
/// ```
/// use layered_config::{MapSource, Source};
///
/// let defaults = MapSource::new("defaults")
///     .with("server/port", 8080)
///     .with("hello/message", "hi");
/// assert!(defaults.get_value("server/port").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    name: String,
    values: BTreeMap<String, Value>,
}

impl MapSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Add (or replace) the value stored under `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            name: "map".to_string(),
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Source for MapSource {
    fn get_value(&self, key: &str) -> Option<RawValue> {
        self.values.get(key).map(|value| RawValue {
            key: key.to_string(),
            value: value.clone(),
        })
    }

    fn name(&self) -> String {
        format!("map:{}", self.name)
    }
}

impl BuildSource for MapSource {
    type Source = MapSource;

    fn build(self) -> Result<Self::Source, LoadError> {
        Ok(self)
    }
}
