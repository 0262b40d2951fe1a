//! Field resolution with deferred error reporting.
//!
//! Responsibilities:
//! - Resolve one configuration field per call (`define`, `define_optional`, `define_or`).
//! - Record every missing or unconvertible field instead of failing fast.
//!
//! Does NOT handle:
//! - Deciding whether the load failed (see `loader`).
//!
//! Invariants:
//! - Resolution always returns a value; failures yield the default and are recorded.
//! - Successful resolutions record nothing.
//! - Errors are kept in the order they were recorded.

use std::fmt;

use thiserror::Error;

use crate::constants::AGGREGATE_ERROR_SEPARATOR;
use crate::convert::{ConversionError, FromValue};
use crate::provider::Provider;
use crate::value::Value;

/// A problem with a single configuration field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("value {key} not found")]
    NotFound { key: String },

    #[error("value {key} is invalid: {source}")]
    Conversion {
        key: String,
        source: ConversionError,
    },

    #[error("value {key} is invalid: {message}")]
    Invalid { key: String, message: String },
}

impl FieldError {
    /// The configuration key the error refers to.
    pub fn key(&self) -> &str {
        match self {
            FieldError::NotFound { key }
            | FieldError::Conversion { key, .. }
            | FieldError::Invalid { key, .. } => key,
        }
    }
}

/// Field errors collected during one load, in the order they occurred.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(AGGREGATE_ERROR_SEPARATOR)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Resolves typed fields from a [`Provider`] and collects their errors.
///
/// A configuration factory receives `&mut Resolver` and calls `define` once
/// per field:
///
/// ```
/// use layered_config::{Loader, MapSource};
///
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// let server = Loader::new()
///     .with_source(MapSource::new("defaults").with("host", "localhost").with("port", 8080))
///     .load(|r| Server {
///         host: r.define("host"),
///         port: r.define("port"),
///     })
///     .unwrap();
/// assert_eq!(server.port, 8080);
/// ```
#[derive(Debug)]
pub struct Resolver<'p> {
    provider: &'p Provider,
    errors: Vec<FieldError>,
}

impl<'p> Resolver<'p> {
    pub fn new(provider: &'p Provider) -> Self {
        Self {
            provider,
            errors: Vec::new(),
        }
    }

    /// Resolve a required field.
    ///
    /// A missing or unconvertible value is recorded and `T::default()` is returned.
    pub fn define<T: FromValue + Default>(&mut self, key: &str) -> T {
        match self.provider.get(key) {
            Some(raw) => self.convert(key, &raw.value).unwrap_or_default(),
            None => {
                self.errors.push(FieldError::NotFound {
                    key: key.to_string(),
                });
                T::default()
            }
        }
    }

    /// Resolve an optional field. A missing value is `None` and is not an error.
    pub fn define_optional<T: FromValue>(&mut self, key: &str) -> Option<T> {
        let raw = self.provider.get(key)?;
        self.convert(key, &raw.value)
    }

    /// Resolve a field that falls back to `default` when missing.
    ///
    /// Conversion failures are still recorded.
    pub fn define_or<T: FromValue>(&mut self, key: &str, default: T) -> T {
        self.define_optional(key).unwrap_or(default)
    }

    /// Record a field-level problem found by the factory itself.
    pub fn notify_error(&mut self, key: &str, message: impl Into<String>) {
        self.errors.push(FieldError::Invalid {
            key: key.to_string(),
            message: message.into(),
        });
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_errors(self) -> FieldErrors {
        FieldErrors(self.errors)
    }

    fn convert<T: FromValue>(&mut self, key: &str, value: &Value) -> Option<T> {
        match T::from_value(value) {
            Ok(converted) => Some(converted),
            Err(source) => {
                tracing::debug!(key, error = %source, "Config value conversion failed");
                self.errors.push(FieldError::Conversion {
                    key: key.to_string(),
                    source,
                });
                None
            }
        }
    }
}
