//! JSON document source.
//!
//! Responsibilities:
//! - Read and parse a JSON file once, when the source is built.
//! - Resolve `/`-delimited keys against nested objects.
//!
//! Does NOT handle:
//! - Array indexing in keys.
//! - Watching the file for changes.
//!
//! Invariants:
//! - The document's top-level value is an object.
//! - When the first key segment names a nested object, the lookup continues
//!   inside it and its answer is final; otherwise the whole key is looked up
//!   literally in the current object.
//! - Parents that are not objects resolve to not found, never to an error.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};

use crate::constants::KEY_SEPARATOR;
use crate::loader::LoadError;
use crate::source::{BuildSource, Source};
use crate::value::{RawValue, Value};

/// A source backed by a parsed JSON object.
#[derive(Debug, Clone)]
pub struct JsonSource {
    origin: String,
    root: Map<String, JsonValue>,
}

impl JsonSource {
    /// Start building a source for the JSON file at `path`.
    pub fn builder(path: impl Into<PathBuf>) -> JsonSourceBuilder {
        JsonSourceBuilder {
            path: path.into(),
            base_dir: None,
            ignore_missing_file: false,
        }
    }

    /// Build a source from an already-parsed document.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::JsonNotObject` if `document` is not a JSON object.
    pub fn from_value(origin: impl Into<String>, document: JsonValue) -> Result<Self, LoadError> {
        let origin = origin.into();
        match document {
            JsonValue::Object(root) => Ok(Self { origin, root }),
            _ => Err(LoadError::JsonNotObject { origin }),
        }
    }

    fn empty(origin: String) -> Self {
        Self {
            origin,
            root: Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn lookup<'a>(object: &'a Map<String, JsonValue>, key: &str) -> Option<&'a JsonValue> {
    if let Some((parent, rest)) = key.split_once(KEY_SEPARATOR)
        && let Some(JsonValue::Object(nested)) = object.get(parent)
    {
        return lookup(nested, rest);
    }
    object.get(key)
}

impl Source for JsonSource {
    fn get_value(&self, key: &str) -> Option<RawValue> {
        lookup(&self.root, key).map(|found| RawValue {
            key: key.to_string(),
            value: Value::from(found.clone()),
        })
    }

    fn name(&self) -> String {
        format!("json:{}", self.origin)
    }
}

/// Builder for [`JsonSource`].
#[derive(Debug, Clone)]
pub struct JsonSourceBuilder {
    path: PathBuf,
    base_dir: Option<PathBuf>,
    ignore_missing_file: bool,
}

impl JsonSourceBuilder {
    /// Produce an empty source instead of failing when the file does not exist.
    pub fn ignore_missing_file(mut self) -> Self {
        self.ignore_missing_file = true;
        self
    }

    /// Resolve the file path relative to `dir`.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// The path the file will be read from.
    pub fn resolved_path(&self) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.join(&self.path),
            None => self.path.clone(),
        }
    }
}

fn parse_document(path: &Path, content: &str) -> Result<JsonValue, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

impl BuildSource for JsonSourceBuilder {
    type Source = JsonSource;

    fn build(self) -> Result<JsonSource, LoadError> {
        let path = self.resolved_path();
        let origin = path.display().to_string();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && self.ignore_missing_file => {
                tracing::debug!(
                    path = %path.display(),
                    "JSON config file not found; continuing with an empty source"
                );
                return Ok(JsonSource::empty(origin));
            }
            Err(source) => return Err(LoadError::FileRead { path, source }),
        };

        let document = parse_document(&path, &content)?;
        let source = JsonSource::from_value(origin, document)?;
        tracing::debug!(path = %path.display(), keys = source.root.len(), "Loaded JSON config file");
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::Fake;
    use fake::faker::lorem::en::Word;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_json(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn random_file_name() -> String {
        format!("{}.json", Word().fake::<String>())
    }

    #[test]
    fn test_fails_if_no_such_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = JsonSource::builder(temp_dir.path().join(random_file_name())).build();

        match result {
            Err(LoadError::FileRead { source, .. }) => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("expected FileRead error, got {other:?}"),
        }
    }

    #[test]
    fn test_ignore_missing_file_yields_empty_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = JsonSource::builder(temp_dir.path().join(random_file_name()))
            .ignore_missing_file()
            .build()
            .unwrap();

        assert!(source.is_empty());
        assert!(source.get_value("not/existing/key").is_none());
    }

    #[test]
    fn test_fails_if_not_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_json(temp_dir.path(), "broken.json", "not a json");

        let result = JsonSource::builder(path).build();
        assert!(matches!(result, Err(LoadError::JsonParse { .. })));
    }

    #[test]
    fn test_fails_if_top_level_is_not_an_object() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_json(temp_dir.path(), "list.json", "[1, 2, 3]");

        let result = JsonSource::builder(path).build();
        assert!(matches!(result, Err(LoadError::JsonNotObject { .. })));
    }

    #[test]
    fn test_loads_relative_to_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let name = random_file_name();
        write_json(temp_dir.path(), &name, r#"{"key": "value"}"#);

        let builder = JsonSource::builder(&name).base_dir(temp_dir.path());
        assert_eq!(builder.resolved_path(), temp_dir.path().join(&name));

        let source = builder.build().unwrap();
        assert_eq!(source.get_value("key").unwrap().value, Value::from("value"));
    }

    #[test]
    fn test_get_value_resolves_nested_keys() {
        let str_val_1: String = Word().fake();
        let nested_val_1: String = Word().fake();
        let nested_val_2: String = Word().fake();
        let source = JsonSource::from_value(
            "test",
            json!({
                "str_val_1": str_val_1,
                "nested": {"str_val_1": nested_val_1, "str_val_2": nested_val_2},
            }),
        )
        .unwrap();

        let get = |key: &str| source.get_value(key).map(|raw| raw.value);
        assert_eq!(get("str_val_1"), Some(Value::from(str_val_1.as_str())));
        assert_eq!(get("nested/str_val_1"), Some(Value::from(nested_val_1.as_str())));
        assert_eq!(get("nested/str_val_2"), Some(Value::from(nested_val_2.as_str())));
        assert_eq!(get("nested/absent"), None);
        assert_eq!(get("str_val_1/deeper"), None);
        assert!(matches!(get("nested"), Some(Value::Map(_))));
    }

    #[test]
    fn test_literal_keys_with_separator() {
        let source = JsonSource::from_value(
            "test",
            json!({"server/port": 8080, "server": {"host": "localhost"}}),
        )
        .unwrap();

        // "server" is an object, so the lookup descends and does not fall back.
        assert!(source.get_value("server/port").is_none());
        assert_eq!(
            source.get_value("server/host").unwrap().value,
            Value::from("localhost")
        );

        let flat = JsonSource::from_value("flat", json!({"db/url": "postgres://db"})).unwrap();
        assert_eq!(
            flat.get_value("db/url").unwrap().value,
            Value::from("postgres://db")
        );
    }

    #[test]
    fn test_values_keep_json_types() {
        let source = JsonSource::from_value(
            "types",
            json!({"int": 3, "float": 1.5, "bool": true, "list": ["a"], "null": null}),
        )
        .unwrap();

        assert_eq!(source.get_value("int").unwrap().value, Value::Int(3));
        assert_eq!(source.get_value("float").unwrap().value, Value::Float(1.5));
        assert_eq!(source.get_value("bool").unwrap().value, Value::Bool(true));
        assert_eq!(
            source.get_value("list").unwrap().value,
            Value::List(vec![Value::from("a")])
        );
        assert_eq!(source.get_value("null").unwrap().value, Value::Null);
    }

    #[test]
    fn test_large_unsigned_integers_stay_exact() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_json(temp_dir.path(), "big.json", r#"{"big": 18446744073709551615}"#);

        let source = JsonSource::builder(path).build().unwrap();

        let raw = source.get_value("big").unwrap();
        assert_eq!(raw.value, Value::UInt(u64::MAX));
        assert_eq!(
            <u64 as crate::convert::FromValue>::from_value(&raw.value).unwrap(),
            u64::MAX
        );
    }
}
