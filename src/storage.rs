//! Key-value preference storage (the dashboard's "local storage").
//!
//! The dashboard persists exactly one key, [`LANGUAGE_KEY`]. Values are raw
//! strings with no encoding, versioning or expiry.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Storage key of the language preference.
pub const LANGUAGE_KEY: &str = "agriGuideLanguage";

/// A string-to-string preference store.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store, used by tests and one-shot sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences persisted as a flat TOML table (`~/.agriguide/preferences.toml`).
///
/// Reads go to disk every time so that several processes see each other's
/// writes. A missing or malformed file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Option<toml::Table> {
        let content = fs::read_to_string(&self.path).ok()?;
        toml::from_str(&content).ok()
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_table()?
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut table = self.read_table().unwrap_or_default();
        table.insert(key.to_string(), toml::Value::String(value.to_string()));

        let text = toml::to_string_pretty(&table).context("failed to serialize preferences")?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("failed to create preferences directory")?;
        }
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(LANGUAGE_KEY), None);
        store.set(LANGUAGE_KEY, "hi").unwrap();
        assert_eq!(store.get(LANGUAGE_KEY), Some("hi".to_string()));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.toml");

        let mut first = FileStore::new(&path);
        first.set(LANGUAGE_KEY, "ta").unwrap();

        let second = FileStore::new(&path);
        assert_eq!(second.get(LANGUAGE_KEY), Some("ta".to_string()));
    }

    #[test]
    fn file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "theme = \"dark\"\n").unwrap();

        let mut store = FileStore::new(&path);
        store.set(LANGUAGE_KEY, "fr").unwrap();
        assert_eq!(store.get("theme"), Some("dark".to_string()));
        assert_eq!(store.get(LANGUAGE_KEY), Some("fr".to_string()));
    }

    #[test]
    fn malformed_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "not = [valid").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get(LANGUAGE_KEY), None);
    }

    #[test]
    fn values_are_stored_raw() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("p.toml"));
        store.set(LANGUAGE_KEY, "not-a-language \"quoted\"").unwrap();
        assert_eq!(
            store.get(LANGUAGE_KEY),
            Some("not-a-language \"quoted\"".to_string())
        );
    }
}
