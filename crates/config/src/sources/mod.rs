//! Concrete configuration sources.
//!
//! Responsibilities:
//! - Load values from JSON documents (`json`), environment variables (`env`),
//!   and plain files (`file`).
//! - Expose path-first builders that the loader materializes lazily.
//!
//! Does NOT handle:
//! - Priority between sources (see `provider.rs`).
//! - Type coercion (see `convert.rs`).
//!
//! Invariants:
//! - All I/O happens in `build()`; lookups never touch the file system or environment.
//! - Absent keys are reported as not found, never as errors.

pub mod env;
pub mod file;
pub mod json;

pub use env::{EnvBinding, EnvSource, EnvSourceBuilder};
pub use file::{FileBinding, FileSource, FileSourceBuilder};
pub use json::{JsonSource, JsonSourceBuilder};
