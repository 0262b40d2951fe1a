//! Conversion of dynamic values into statically requested types.
//!
//! Responsibilities:
//! - Define the closed set of conversion targets (`TargetKind`).
//! - Implement one converter per target through the `FromValue` trait.
//! - Bridge arbitrary serde types through a JSON round-trip (`Structured`).
//!
//! Does NOT handle:
//! - Key lookup or error collection (see `resolver.rs`).
//!
//! Invariants:
//! - Floats convert to integers only when they carry no fractional part; they are never truncated.
//! - Bare numbers are never interpreted as durations.
//! - Conversion never panics; every failure is a `ConversionError`.

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::constants::LIST_SEPARATOR;
use crate::duration::parse_duration;
use crate::value::Value;

/// The closed set of conversion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    String,
    StringList,
    Int,
    Int64,
    Float64,
    Bool,
    Duration,
    Bytes,
    Structured,
}

/// A raw value could not be coerced into the requested type.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot convert {value_type} {value} to {target}: {reason}")]
pub struct ConversionError {
    /// The offending raw value.
    pub value: Value,
    /// Dynamic type name of the raw value.
    pub value_type: &'static str,
    /// Name of the requested target type.
    pub target: &'static str,
    pub reason: String,
}

impl ConversionError {
    pub fn new<T: FromValue>(value: &Value, reason: impl Into<String>) -> Self {
        Self {
            value: value.clone(),
            value_type: value.type_name(),
            target: T::target_name(),
            reason: reason.into(),
        }
    }
}

/// Types a configuration value can be resolved into.
pub trait FromValue: Sized {
    /// Which converter handles this type.
    const KIND: TargetKind;

    /// Human-readable target type name for error messages.
    fn target_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError>;
}

impl FromValue for String {
    const KIND: TargetKind = TargetKind::String;

    fn target_name() -> &'static str {
        "String"
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Bytes(bytes) => String::from_utf8(bytes.clone())
                .map_err(|_| ConversionError::new::<Self>(value, "bytes are not valid UTF-8")),
            _ => Err(ConversionError::new::<Self>(value, "value is not a string")),
        }
    }
}

impl FromValue for Vec<String> {
    const KIND: TargetKind = TargetKind::StringList;

    fn target_name() -> &'static str {
        "Vec<String>"
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(ConversionError::new::<Self>(
                        value,
                        format!("element {index} is a {}, not a string", other.type_name()),
                    )),
                })
                .collect(),
            Value::String(_) | Value::Bytes(_) => match value.as_str() {
                Some(csv) => Ok(split_list(csv)),
                None => Err(ConversionError::new::<Self>(
                    value,
                    "bytes are not valid UTF-8",
                )),
            },
            _ => Err(ConversionError::new::<Self>(
                value,
                "value is neither a list nor a comma-separated string",
            )),
        }
    }
}

/// Split a comma-separated string, trimming every element.
fn split_list(csv: &str) -> Vec<String> {
    if csv.trim().is_empty() {
        return Vec::new();
    }
    csv.split(LIST_SEPARATOR)
        .map(|item| item.trim().to_string())
        .collect()
}

/// Coerce a raw value into a wide integer or describe why it cannot be.
///
/// The result covers both `i64` and `u64`; the caller narrows it.
fn integer_of(value: &Value) -> Result<i128, String> {
    match value {
        Value::Int(i) => Ok(i128::from(*i)),
        Value::UInt(u) => Ok(i128::from(*u)),
        Value::Float(f) => {
            if !f.is_finite() || f.fract() != 0.0 {
                return Err("value is not an integer".to_string());
            }
            // 2^64 is the first float above u64::MAX.
            if *f < i64::MIN as f64 || *f >= 18_446_744_073_709_551_616.0 {
                return Err("value is out of range".to_string());
            }
            Ok(*f as i128)
        }
        Value::String(s) => s
            .parse::<i128>()
            .map_err(|e| format!("invalid integer literal: {e}")),
        _ => Err("value is not a number".to_string()),
    }
}

macro_rules! impl_from_value_for_integer {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                const KIND: TargetKind = TargetKind::$kind;

                fn from_value(value: &Value) -> Result<Self, ConversionError> {
                    let wide = integer_of(value)
                        .map_err(|reason| ConversionError::new::<Self>(value, reason))?;
                    <$ty>::try_from(wide).map_err(|_| {
                        ConversionError::new::<Self>(
                            value,
                            format!("value is out of range for {}", stringify!($ty)),
                        )
                    })
                }
            }
        )*
    };
}

impl_from_value_for_integer! {
    i32 => Int,
    isize => Int,
    u16 => Int,
    u32 => Int,
    u64 => Int,
    usize => Int,
    i64 => Int64,
}

impl FromValue for f64 {
    const KIND: TargetKind = TargetKind::Float64;

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Int(i) => Ok(*i as f64),
            Value::UInt(u) => Ok(*u as f64),
            Value::Float(f) => Ok(*f),
            Value::String(s) => s.parse::<f64>().map_err(|e| {
                ConversionError::new::<Self>(value, format!("invalid float literal: {e}"))
            }),
            _ => Err(ConversionError::new::<Self>(value, "value is not a number")),
        }
    }
}

/// Accepted boolean literals.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl FromValue for bool {
    const KIND: TargetKind = TargetKind::Bool;

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => parse_bool(s).ok_or_else(|| {
                ConversionError::new::<Self>(value, "invalid boolean literal")
            }),
            _ => Err(ConversionError::new::<Self>(value, "value is not a boolean")),
        }
    }
}

impl FromValue for time::Duration {
    const KIND: TargetKind = TargetKind::Duration;

    fn target_name() -> &'static str {
        "Duration"
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Duration(d) => Ok(*d),
            Value::String(s) => {
                parse_duration(s).map_err(|e| ConversionError::new::<Self>(value, e.to_string()))
            }
            Value::Int(_) | Value::Float(_) => Err(ConversionError::new::<Self>(
                value,
                "a bare number is not a duration; add a unit such as \"s\" or \"ms\"",
            )),
            _ => Err(ConversionError::new::<Self>(value, "value is not a duration")),
        }
    }
}

impl FromValue for std::time::Duration {
    const KIND: TargetKind = TargetKind::Duration;

    fn target_name() -> &'static str {
        "std::time::Duration"
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        let signed = time::Duration::from_value(value).map_err(|e| ConversionError {
            target: Self::target_name(),
            ..e
        })?;
        std::time::Duration::try_from(signed)
            .map_err(|_| ConversionError::new::<Self>(value, "negative durations are not supported"))
    }
}

impl FromValue for Vec<u8> {
    const KIND: TargetKind = TargetKind::Bytes;

    fn target_name() -> &'static str {
        "Vec<u8>"
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bytes(bytes) => Ok(bytes.clone()),
            Value::String(s) => Ok(s.clone().into_bytes()),
            _ => Err(ConversionError::new::<Self>(value, "value is not bytes")),
        }
    }
}

/// Marker for types resolved through a JSON round-trip.
///
/// Implement it for any `Deserialize` type to make it resolvable:
///
/// ```
/// use layered_config::Structured;
///
/// #[derive(Default, serde::Deserialize)]
/// struct Limits {
///     burst: u32,
/// }
///
/// impl Structured for Limits {}
/// ```
///
/// String (and UTF-8 bytes) values are decoded as JSON documents; any other
/// value is first re-encoded with [`Value::to_json`]. Types JSON cannot
/// represent exactly lose precision on the way.
pub trait Structured: DeserializeOwned {}

impl<V: DeserializeOwned> Structured for HashMap<String, V> {}
impl<V: DeserializeOwned> Structured for BTreeMap<String, V> {}
impl Structured for serde_json::Value {}

impl<T: Structured> FromValue for T {
    const KIND: TargetKind = TargetKind::Structured;

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        let decoded = match value {
            Value::String(document) => serde_json::from_str(document),
            Value::Bytes(document) => serde_json::from_slice(document),
            other => serde_json::from_value(other.to_json()),
        };
        decoded.map_err(|e| ConversionError::new::<Self>(value, e.to_string()))
    }
}
