//! The merge layer over several sources.
//!
//! Responsibilities:
//! - Hold materialized sources in priority order.
//! - Resolve a key against them, last registered first.
//!
//! Does NOT handle:
//! - Building sources (see `loader`).
//! - Collecting field errors (see `resolver.rs`).
//!
//! Invariants:
//! - Registration order is priority order, lowest first.
//! - The first source (scanning from the end) defining a key wins; partial
//!   structures are never merged across sources.

use crate::source::Source;
use crate::value::RawValue;

/// Ordered collection of sources with last-one-wins lookup.
#[derive(Default)]
pub struct Provider {
    sources: Vec<Box<dyn Source>>,
}

impl Provider {
    pub fn new(sources: Vec<Box<dyn Source>>) -> Self {
        Self { sources }
    }

    /// Resolve `key` against the sources, latest registered first.
    pub fn get(&self, key: &str) -> Option<RawValue> {
        self.sources.iter().rev().find_map(|source| {
            let raw = source.get_value(key)?;
            tracing::trace!(key, source = %source.name(), "Resolved config value");
            Some(raw)
        })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
