//! Plain file source.
//!
//! Responsibilities:
//! - Bind configuration paths to files (`set(path).from(file)`), e.g. mounted secrets.
//! - Read every bound file in full when the source is built.
//!
//! Does NOT handle:
//! - Interpreting file content; values are raw bytes.
//!
//! Invariants:
//! - A missing file is a build error unless its binding is marked ignore-missing,
//!   in which case the binding is omitted.
//! - Any other I/O failure is a build error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::loader::LoadError;
use crate::source::{BuildSource, Source};
use crate::value::{RawValue, Value};

/// A source holding the raw content of bound files.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    values: BTreeMap<String, Vec<u8>>,
}

impl FileSource {
    /// Start building a file source.
    pub fn builder() -> FileSourceBuilder {
        FileSourceBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Source for FileSource {
    fn get_value(&self, key: &str) -> Option<RawValue> {
        self.values.get(key).map(|content| RawValue {
            key: key.to_string(),
            value: Value::Bytes(content.clone()),
        })
    }

    fn name(&self) -> String {
        "file".to_string()
    }
}

#[derive(Debug, Clone)]
struct FileTarget {
    file: PathBuf,
    ignore_missing: bool,
}

/// Builder for [`FileSource`].
#[derive(Debug, Clone, Default)]
pub struct FileSourceBuilder {
    bindings: Vec<(String, FileTarget)>,
    base_dir: Option<PathBuf>,
}

/// A configuration path waiting for the file it is read from.
#[derive(Debug, Clone)]
pub struct FileBinding {
    builder: FileSourceBuilder,
    path: String,
    ignore_missing: bool,
}

impl FileSourceBuilder {
    /// Bind the configuration path `path`; finish with [`FileBinding::from`].
    pub fn set(self, path: impl Into<String>) -> FileBinding {
        FileBinding {
            builder: self,
            path: path.into(),
            ignore_missing: false,
        }
    }

    /// Resolve relative file paths against `dir`.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.join(file),
            None => file.to_path_buf(),
        }
    }
}

impl FileBinding {
    /// Omit this binding instead of failing when the file does not exist.
    pub fn ignore_missing(mut self) -> Self {
        self.ignore_missing = true;
        self
    }

    /// Read the bound path from `file`.
    pub fn from(mut self, file: impl Into<PathBuf>) -> FileSourceBuilder {
        self.builder.bindings.push((
            self.path,
            FileTarget {
                file: file.into(),
                ignore_missing: self.ignore_missing,
            },
        ));
        self.builder
    }
}

impl BuildSource for FileSourceBuilder {
    type Source = FileSource;

    fn build(self) -> Result<FileSource, LoadError> {
        let mut values = BTreeMap::new();
        for (path, target) in &self.bindings {
            let file = self.resolve(&target.file);
            match std::fs::read(&file) {
                Ok(content) => {
                    values.insert(path.clone(), content);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound && target.ignore_missing => {
                    tracing::debug!(
                        path = %path,
                        file = %file.display(),
                        "Config file not found; binding omitted"
                    );
                }
                Err(source) => return Err(LoadError::FileRead { path: file, source }),
            }
        }

        tracing::debug!(bound = values.len(), "Loaded config files");
        Ok(FileSource { values })
    }
}
