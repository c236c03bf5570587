//! Local key/value storage
//!
//! Sessions and the theme preference are persisted as plain strings under
//! fixed keys, the same shape a browser's `localStorage` exposes. The
//! [`LocalStorage`] trait is that surface; [`FileStorage`] backs it with a
//! single JSON object on disk and [`MemoryStorage`] keeps everything in a map.

use crate::config::StorageConfig;
use crate::error::{Result, ScribeError};
use anyhow::Context;
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub mod memory;
pub use memory::MemoryStorage;

/// Storage key holding the JSON list of saved sessions
pub const SESSIONS_KEY: &str = "aiContentGeneratorGlobalMemory";

/// Storage key holding the theme preference ("light" or "dark")
pub const THEME_KEY: &str = "theme";

/// Environment variable that overrides the storage file location
pub const STORAGE_PATH_ENV: &str = "SCRIBE_STORAGE_PATH";

/// String key/value store
pub trait LocalStorage {
    /// Read the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// File-backed storage
///
/// All keys live in one JSON object file. Every call reads the file afresh,
/// and every mutation rewrites it with only the one key changed, so several
/// handles (or processes) sharing a path never undo each other's keys.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Open the storage file at its default location
    ///
    /// Honors the `SCRIBE_STORAGE_PATH` environment variable, falling back to
    /// `local_storage.json` in the user's data directory.
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var(STORAGE_PATH_ENV) {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "scribe", "scribe")
            .ok_or_else(|| ScribeError::Storage("Could not determine data directory".into()))?;

        Self::new_with_path(proj_dirs.data_dir().join("local_storage.json"))
    }

    /// Open storage according to configuration
    ///
    /// An explicit `storage.path` wins; otherwise this behaves like [`FileStorage::new`].
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        match &config.path {
            Some(path) => Self::new_with_path(path),
            None => Self::new(),
        }
    }

    /// Open the storage file at `path`
    ///
    /// Parent directories are created as needed. A missing file is an empty
    /// store; a file that is not a JSON object of strings is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use scribe::storage::{FileStorage, LocalStorage};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let mut storage = FileStorage::new_with_path(dir.path().join("store.json")).unwrap();
    /// storage.set_item("theme", "dark").unwrap();
    /// assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark"));
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create parent directory for storage file")
                    .map_err(|e| ScribeError::Storage(e.to_string()))?;
            }
        }

        let storage = Self { path };
        let items = storage.read_items()?;

        tracing::debug!(
            "Opened local storage at {} ({} keys)",
            storage.path.display(),
            items.len()
        );

        Ok(storage)
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_items(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read storage file")
            .map_err(|e| ScribeError::Storage(e.to_string()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let items = serde_json::from_str(&contents).map_err(|e| {
            ScribeError::Storage(format!(
                "Storage file {} is not a JSON object of strings: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(items)
    }

    fn write_items(&self, items: &BTreeMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(items)
            .context("Failed to serialize storage")
            .map_err(|e| ScribeError::Storage(e.to_string()))?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, contents)
            .context("Failed to write storage file")
            .map_err(|e| ScribeError::Storage(e.to_string()))?;
        std::fs::rename(&tmp_path, &self.path)
            .context("Failed to replace storage file")
            .map_err(|e| ScribeError::Storage(e.to_string()))?;

        Ok(())
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let mut items = self.read_items()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let mut items = self.read_items()?;
        if items.remove(key).is_some() {
            self.write_items(&items)?;
        }
        Ok(())
    }
}
