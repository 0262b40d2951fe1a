//! Tests for the configuration loader.
//!
//! Responsibilities:
//! - Test loading and building config objects from one or more sources.
//! - Test precedence between sources of different kinds.
//! - Test fatal source failures and the aggregated field error.
//!
//! Does NOT handle:
//! - Format-specific parsing (tested in `sources/`).
//! - Conversion rules (tested in `convert.rs`).
//!
//! Invariants:
//! - Tests touching the process environment use `serial_test` and `global_test_lock()`.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::source::Source;
use crate::value::{RawValue, Value};


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// In-memory source used to exercise the loader without any I/O.
#[derive(Debug, Default)]
pub struct MockSource {
    values: HashMap<String, Value>,
}

impl MockSource {
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }
}

impl Source for MockSource {
    fn get_value(&self, key: &str) -> Option<RawValue> {
        self.values
            .get(key)
            .map(|value| RawValue::new(key, value.clone()))
    }

    fn name(&self) -> String {
        "mock".to_string()
    }
}

/// Config shape shared by the loader tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TestConfig {
    pub val1: String,
    pub val2: String,
    pub val3: String,
}

pub fn test_config_factory(r: &mut crate::resolver::Resolver<'_>) -> TestConfig {
    TestConfig {
        val1: r.define("val1"),
        val2: r.define("val2"),
        val3: r.define("val3"),
    }
}
