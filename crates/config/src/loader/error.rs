//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define the fatal errors that abort a load (source materialization failures).
//! - Wrap the deferred field errors into the single aggregate failure.
//!
//! Does NOT handle:
//! - Per-field errors (see `resolver.rs`).
//! - Value conversion errors (see `convert.rs`).
//!
//! Invariants:
//! - File-related variants carry the path they refer to.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.
//! - The aggregate message is `failed building config: <msg>; <msg>; ...`.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

use crate::constants::AGGREGATE_ERROR_PREFIX;
use crate::resolver::FieldErrors;

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("no configuration sources were registered")]
    NoSources,

    #[error("failed to read config file at {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON config file at {path}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON config {origin} must contain an object at the top level")]
    JsonNotObject { origin: String },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    ///
    /// SAFETY: This error does not include any raw dotenv content.
    #[error("failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,

    /// Failure reported by a caller-supplied source loader, passed through unchanged.
    #[error(transparent)]
    Custom(#[from] anyhow::Error),

    /// One or more fields could not be resolved.
    #[error("{}: {}", AGGREGATE_ERROR_PREFIX, .0)]
    Invalid(FieldErrors),
}

impl LoadError {
    /// The collected field errors, if this is the aggregate failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            LoadError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}
