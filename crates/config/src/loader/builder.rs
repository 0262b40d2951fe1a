//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Collect source loaders in priority order (`with_source`, `with_source_fn`,
//!   `with_loaded_source`).
//! - Materialize the sources, build the `Provider`, and run the config factory once.
//!
//! Does NOT handle:
//! - Resolving individual fields (see `resolver.rs`).
//! - Reading any particular format (see `sources/`).
//!
//! Invariants / Assumptions:
//! - Sources registered later take precedence over sources registered earlier.
//! - Source loaders run in registration order; the first failure aborts the load.
//! - Field errors never abort the factory; they are reported together afterwards.
//! - A load that records any field error never returns the built object.

use std::fmt;

use super::error::LoadError;
use crate::provider::Provider;
use crate::resolver::Resolver;
use crate::source::{BuildSource, Source};

type SourceLoader = Box<dyn FnOnce() -> Result<Box<dyn Source>, LoadError>>;

/// Builds a typed configuration object from layered sources.
pub struct Loader {
    loaders: Vec<SourceLoader>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("sources", &self.loaders.len())
            .finish()
    }
}

impl Loader {
    /// Create a loader with no sources.
    pub fn new() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    /// Register a source builder. It is built when [`Loader::load`] runs.
    pub fn with_source<B>(mut self, builder: B) -> Self
    where
        B: BuildSource + 'static,
    {
        self.loaders.push(Box::new(move || {
            let source = builder.build()?;
            Ok(Box::new(source) as Box<dyn Source>)
        }));
        self
    }

    /// Register a closure producing a source. It runs when [`Loader::load`] runs.
    ///
    /// Use [`LoadError::Custom`] (or `?` on an `anyhow::Error`) to report
    /// failures of custom sources.
    pub fn with_source_fn<S, F>(mut self, load: F) -> Self
    where
        S: Source + 'static,
        F: FnOnce() -> Result<S, LoadError> + 'static,
    {
        self.loaders.push(Box::new(move || {
            let source = load()?;
            Ok(Box::new(source) as Box<dyn Source>)
        }));
        self
    }

    /// Register a source that is already materialized.
    pub fn with_loaded_source<S>(mut self, source: S) -> Self
    where
        S: Source + 'static,
    {
        self.loaders
            .push(Box::new(move || Ok(Box::new(source) as Box<dyn Source>)));
        self
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.loaders.len()
    }

    /// Materialize every source and build the configuration with `factory`.
    ///
    /// The factory is called exactly once with a [`Resolver`] over all sources.
    ///
    /// # Errors
    ///
    /// - `LoadError::NoSources` if nothing was registered.
    /// - The first error returned by a source loader, unchanged.
    /// - `LoadError::Invalid` if the factory recorded any field error.
    pub fn load<T, F>(self, factory: F) -> Result<T, LoadError>
    where
        F: FnOnce(&mut Resolver<'_>) -> T,
    {
        if self.loaders.is_empty() {
            return Err(LoadError::NoSources);
        }

        let mut sources = Vec::with_capacity(self.loaders.len());
        for (index, load) in self.loaders.into_iter().enumerate() {
            let source = load()?;
            tracing::debug!(index, source = %source.name(), "Config source loaded");
            sources.push(source);
        }

        let provider = Provider::new(sources);
        let mut resolver = Resolver::new(&provider);
        let config = factory(&mut resolver);

        let errors = resolver.into_errors();
        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "Config factory recorded field errors");
            return Err(LoadError::Invalid(errors));
        }

        tracing::debug!(sources = provider.len(), "Config built");
        Ok(config)
    }
}
