//! Single-file JSON archives keyed by value name.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use qimp_core::{ErrorInfo, QimpError};

/// A run archive: one JSON file holding named serialized values.
///
/// Reads parse the whole file eagerly; writes rewrite the whole file, so
/// concurrent writers to the same archive are not supported.
#[derive(Debug, Clone)]
pub struct Archive {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl Archive {
    /// Opens the archive at `path`, creating an empty one in memory if the
    /// file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, QimpError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }
        let raw = fs::read_to_string(&path).map_err(|err| {
            QimpError::Archive(
                ErrorInfo::new("archive-read", "failed to read archive file")
                    .with_context("path", path.display().to_string())
                    .with_context("io", err.to_string()),
            )
        })?;
        let entries = serde_json::from_str(&raw).map_err(|err| {
            QimpError::Archive(
                ErrorInfo::new("archive-parse", "archive is not a valid JSON object")
                    .with_context("path", path.display().to_string())
                    .with_context("parse", err.to_string()),
            )
        })?;
        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the stored values, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Whether a value named `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Deserializes the value stored under `key`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<T, QimpError> {
        let value = self.entries.get(key).ok_or_else(|| {
            QimpError::Archive(
                ErrorInfo::new("missing-key", "archive has no value under this key")
                    .with_context("path", self.path.display().to_string())
                    .with_context("key", key.to_string()),
            )
        })?;
        serde_json::from_value(value.clone()).map_err(|err| {
            QimpError::Archive(
                ErrorInfo::new("archive-parse", "stored value has an unexpected shape")
                    .with_context("path", self.path.display().to_string())
                    .with_context("key", key.to_string())
                    .with_context("parse", err.to_string()),
            )
        })
    }

    /// Serializes `value` under `key` and rewrites the backing file.
    ///
    /// An existing value under the same key is replaced.
    pub fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), QimpError> {
        let serialized = serde_json::to_value(value).map_err(|err| {
            QimpError::Archive(
                ErrorInfo::new("archive-write", "value is not JSON serializable")
                    .with_context("key", key.to_string())
                    .with_context("serialize", err.to_string()),
            )
        })?;
        self.entries.insert(key.to_string(), serialized);
        let rendered = serde_json::to_string_pretty(&self.entries).map_err(|err| {
            QimpError::Archive(
                ErrorInfo::new("archive-write", "failed to render archive contents")
                    .with_context("serialize", err.to_string()),
            )
        })?;
        fs::write(&self.path, rendered).map_err(|err| {
            QimpError::Archive(
                ErrorInfo::new("archive-write", "failed to write archive file")
                    .with_context("path", self.path.display().to_string())
                    .with_context("io", err.to_string()),
            )
        })
    }
}
