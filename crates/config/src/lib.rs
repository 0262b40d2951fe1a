//! Layered, typed configuration loading.
//!
//! This crate builds strongly-typed configuration objects from an ordered
//! list of sources (JSON files, environment variables, plain files, or
//! caller-defined sources). Later sources override earlier ones, and every
//! missing or invalid field is reported together in a single error.

pub mod constants;
mod convert;
mod duration;
mod loader;
mod provider;
mod resolver;
mod source;
pub mod sources;
mod value;

pub use convert::{ConversionError, FromValue, Structured, TargetKind};
pub use duration::{DurationParseError, format_duration, parse_duration};
pub use loader::{LoadError, Loader};
pub use provider::Provider;
pub use resolver::{FieldError, FieldErrors, Resolver};
pub use source::{BuildSource, MapSource, Source};
pub use sources::{
    EnvBinding, EnvSource, EnvSourceBuilder, FileBinding, FileSource, FileSourceBuilder,
    JsonSource, JsonSourceBuilder,
};
pub use value::{RawValue, Value};
