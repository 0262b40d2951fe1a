//! Environment variable source.
//!
//! Responsibilities:
//! - Bind configuration paths to environment variable names (`set(path).from(NAME)`).
//! - Resolve every binding once, when the source is built.
//! - Optionally fill unset variables from a `.env` file.
//!
//! Does NOT handle:
//! - Parsing values; coercion happens when a field is defined.
//! - Modifying the process environment (`.env` entries are read, never exported).
//!
//! Invariants:
//! - Unset variables are omitted from the source, not reported as errors.
//! - Empty values are kept as present.
//! - Process environment values take precedence over `.env` entries.
//! - `.env` loading is skipped when `DOTENV_DISABLED` is `true` or `1`.
//! - Dotenv errors never include raw `.env` line contents.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::constants::DOTENV_DISABLED_VAR;
use crate::loader::LoadError;
use crate::source::{BuildSource, Source};
use crate::value::{RawValue, Value};

/// A source holding the values of bound environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    values: BTreeMap<String, Value>,
}

impl EnvSource {
    /// Start building an environment source.
    pub fn builder() -> EnvSourceBuilder {
        EnvSourceBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Source for EnvSource {
    fn get_value(&self, key: &str) -> Option<RawValue> {
        self.values.get(key).map(|value| RawValue {
            key: key.to_string(),
            value: value.clone(),
        })
    }

    fn name(&self) -> String {
        "env".to_string()
    }
}

/// Builder for [`EnvSource`].
#[derive(Debug, Clone, Default)]
pub struct EnvSourceBuilder {
    bindings: Vec<(String, String)>,
    dotenv_file: Option<PathBuf>,
}

/// A configuration path waiting for the environment variable it is read from.
#[derive(Debug, Clone)]
pub struct EnvBinding {
    builder: EnvSourceBuilder,
    path: String,
}

impl EnvSourceBuilder {
    /// Bind the configuration path `path`; finish with [`EnvBinding::from`].
    pub fn set(self, path: impl Into<String>) -> EnvBinding {
        EnvBinding {
            builder: self,
            path: path.into(),
        }
    }

    /// Fill variables missing from the process environment from a `.env` file.
    ///
    /// A missing file is ignored.
    pub fn dotenv_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_file = Some(path.into());
        self
    }
}

impl EnvBinding {
    /// Read the bound path from the environment variable `env_name`.
    pub fn from(mut self, env_name: impl Into<String>) -> EnvSourceBuilder {
        self.builder.bindings.push((self.path, env_name.into()));
        self.builder
    }
}

/// Check if dotenv loading is disabled via environment variable.
fn dotenv_disabled() -> bool {
    matches!(
        std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
        Some("true") | Some("1")
    )
}

fn map_dotenv_error(err: dotenvy::Error) -> LoadError {
    match err {
        dotenvy::Error::LineParse(_, idx) => LoadError::DotenvParse { error_index: idx },
        dotenvy::Error::Io(io_err) => LoadError::DotenvIo {
            kind: io_err.kind(),
        },
        _ => LoadError::DotenvUnknown,
    }
}

/// Read `.env` entries without exporting them to the process environment.
fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, LoadError> {
    if dotenv_disabled() {
        return Ok(HashMap::new());
    }

    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(dotenvy::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(HashMap::new());
        }
        Err(e) => return Err(map_dotenv_error(e)),
    };

    entries
        .map(|entry| entry.map_err(map_dotenv_error))
        .collect()
}

impl BuildSource for EnvSourceBuilder {
    type Source = EnvSource;

    fn build(self) -> Result<EnvSource, LoadError> {
        let dotenv = match &self.dotenv_file {
            Some(path) => read_dotenv(path)?,
            None => HashMap::new(),
        };

        let mut values = BTreeMap::new();
        for (path, env_name) in self.bindings {
            let value = match std::env::var_os(&env_name) {
                Some(raw) => match raw.into_string() {
                    Ok(s) => Value::String(s),
                    Err(raw) => Value::Bytes(raw.into_encoded_bytes()),
                },
                None => match dotenv.get(&env_name) {
                    Some(s) => Value::String(s.clone()),
                    None => {
                        tracing::trace!(env = %env_name, path = %path, "Environment variable not set");
                        continue;
                    }
                },
            };
            values.insert(path, value);
        }

        tracing::debug!(bound = values.len(), "Loaded environment variables");
        Ok(EnvSource { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::global_test_lock;
    use fake::Fake;
    use fake::faker::lorem::en::{Sentence, Word};
    use serial_test::serial;
    use tempfile::TempDir;

    fn random_env_name() -> String {
        format!("_LAYERED_TEST_{}", Word().fake::<String>().to_uppercase())
    }

    fn random_path() -> String {
        format!("test/path-1/{}", Word().fake::<String>())
    }

    fn assert_val(source: &EnvSource, key: &str, want: &str) {
        let got = source
            .get_value(key)
            .unwrap_or_else(|| panic!("key {key} not found"));
        assert_eq!(got.value, Value::from(want));
    }

    #[test]
    #[serial]
    fn test_reads_configured_values_from_env_vars() {
        let _lock = global_test_lock().lock().unwrap();
        let (env1, env2) = (random_env_name() + "_1", random_env_name() + "_2");
        let (path1, path2) = (random_path() + "-1", random_path() + "-2");
        let val1: String = Sentence(3..5).fake();
        let val2: String = Sentence(3..5).fake();

        temp_env::with_vars(
            [(env1.as_str(), Some(val1.as_str())), (env2.as_str(), Some(val2.as_str()))],
            || {
                let source = EnvSource::builder()
                    .set(&path1)
                    .from(&env1)
                    .set(&path2)
                    .from(&env2)
                    .build()
                    .unwrap();

                assert_val(&source, &path1, &val1);
                assert_val(&source, &path2, &val2);
            },
        );
    }

    #[test]
    #[serial]
    fn test_keeps_empty_values() {
        let _lock = global_test_lock().lock().unwrap();
        let env1 = random_env_name() + "_EMPTY";
        let path1 = random_path();

        temp_env::with_vars([(env1.as_str(), Some(""))], || {
            let source = EnvSource::builder().set(&path1).from(&env1).build().unwrap();
            assert_val(&source, &path1, "");
        });
    }

    #[test]
    #[serial]
    fn test_omits_unset_variables() {
        let _lock = global_test_lock().lock().unwrap();
        let (env1, env2) = (random_env_name() + "_SET", random_env_name() + "_UNSET");
        let (path1, path2) = (random_path() + "-1", random_path() + "-2");

        temp_env::with_vars(
            [(env1.as_str(), Some("present")), (env2.as_str(), None)],
            || {
                let source = EnvSource::builder()
                    .set(&path1)
                    .from(&env1)
                    .set(&path2)
                    .from(&env2)
                    .build()
                    .unwrap();

                assert_val(&source, &path1, "present");
                assert!(source.get_value(&path2).is_none());
                assert_eq!(source.len(), 1);
            },
        );
    }

    #[test]
    #[serial]
    fn test_dotenv_fills_unset_variables_only() {
        let _lock = global_test_lock().lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let dotenv_path = temp_dir.path().join(".env");
        std::fs::write(
            &dotenv_path,
            "_LAYERED_DOTENV_PORT=9000\n_LAYERED_DOTENV_HOST=from-file\n",
        )
        .unwrap();

        temp_env::with_vars(
            [
                ("_LAYERED_DOTENV_PORT", None),
                ("_LAYERED_DOTENV_HOST", Some("from-process")),
                (DOTENV_DISABLED_VAR, None),
            ],
            || {
                let source = EnvSource::builder()
                    .set("server/port")
                    .from("_LAYERED_DOTENV_PORT")
                    .set("server/host")
                    .from("_LAYERED_DOTENV_HOST")
                    .dotenv_file(&dotenv_path)
                    .build()
                    .unwrap();

                assert_val(&source, "server/port", "9000");
                assert_val(&source, "server/host", "from-process");
                assert!(std::env::var("_LAYERED_DOTENV_PORT").is_err());
            },
        );
    }

    #[test]
    #[serial]
    fn test_dotenv_disabled_gate() {
        let _lock = global_test_lock().lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let dotenv_path = temp_dir.path().join(".env");
        std::fs::write(&dotenv_path, "_LAYERED_DOTENV_GATED=value\n").unwrap();

        temp_env::with_vars(
            [("_LAYERED_DOTENV_GATED", None), (DOTENV_DISABLED_VAR, Some("1"))],
            || {
                let source = EnvSource::builder()
                    .set("gated")
                    .from("_LAYERED_DOTENV_GATED")
                    .dotenv_file(&dotenv_path)
                    .build()
                    .unwrap();
                assert!(source.is_empty());
            },
        );
    }

    #[test]
    #[serial]
    fn test_missing_dotenv_file_is_ignored() {
        let _lock = global_test_lock().lock().unwrap();
        let temp_dir = TempDir::new().unwrap();

        temp_env::with_vars([(DOTENV_DISABLED_VAR, None::<&str>)], || {
            let result = EnvSource::builder()
                .set("anything")
                .from("_LAYERED_DOTENV_NOPE")
                .dotenv_file(temp_dir.path().join(".env"))
                .build();
            assert!(result.unwrap().is_empty());
        });
    }

    #[test]
    #[serial]
    fn test_malformed_dotenv_reports_position_only() {
        let _lock = global_test_lock().lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let dotenv_path = temp_dir.path().join(".env");
        std::fs::write(&dotenv_path, "SECRET_TOKEN hunter2\n").unwrap();

        temp_env::with_vars([(DOTENV_DISABLED_VAR, None::<&str>)], || {
            let err = EnvSource::builder()
                .set("token")
                .from("SECRET_TOKEN")
                .dotenv_file(&dotenv_path)
                .build()
                .unwrap_err();

            assert!(matches!(err, LoadError::DotenvParse { .. }));
            assert!(!err.to_string().contains("hunter2"));
        });
    }
}
