//! Configuration loading from layered sources.
//!
//! Responsibilities:
//! - Provide the builder-pattern `Loader` that registers sources in priority order.
//! - Turn source failures and collected field errors into a single `LoadError`.
//!
//! Does NOT handle:
//! - Source formats (see `sources/`).
//! - Type coercion (see `convert.rs`).
//!
//! Invariants / Assumptions:
//! - Later sources take precedence over earlier ones.
//! - Source failures abort immediately; field errors are aggregated.

mod builder;
mod error;

pub use builder::Loader;
pub use error::LoadError;

#[cfg(test)]
mod tests;
