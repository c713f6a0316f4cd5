//! JSON file backed settings store.
//!
//! All keys live in one JSON object, e.g. `~/.desktop-kit/store.json`:
//! ```json
//! {
//!   "settings": { "history": { "maxStackSize": 50 } },
//!   "shortcutOverrides": { "save": "mod+shift+s" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{SettingsStore, StoreError, StoreFuture};

/// Store that reads and rewrites a single JSON document on every operation.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns an empty object if the file doesn't exist.
    fn read_document(&self) -> Result<Map<String, Value>, StoreError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::Backend(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    /// Atomic write: temp file then rename. A failed write leaves the
    /// previous document in place.
    fn write_document(&self, document: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(document)?;
        let tmp_path = self.temp_path();
        fs::write(&tmp_path, content)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to replace settings store");
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!(path = %self.path.display(), keys = document.len(), "Wrote settings store");
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Result<Option<Value>, StoreError>> {
        Box::pin(async move {
            let mut document = self.read_document()?;
            Ok(document.remove(key))
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> StoreFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let mut document = self.read_document()?;
            document.insert(key.to_string(), value);
            self.write_document(&document)
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let mut document = self.read_document()?;
            if document.remove(key).is_some() {
                self.write_document(&document)?;
            }
            Ok(())
        })
    }
}
