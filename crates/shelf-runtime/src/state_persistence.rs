#![forbid(unsafe_code)]

//! Key-value storage for user preferences.
//!
//! Preferences are saved through an injected [`KeyValueStore`] rather than a
//! process-wide singleton, so each host decides where they live and tests can
//! use [`MemoryStore`].
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 PreferenceStore<P> (view_prefs)               │
//! │   - typed value, merge over defaults on load                  │
//! └──────────────────────────────────────────────────────────────┘
//!                              │ JSON strings
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       KeyValueStore                           │
//! │   - MemoryStore: in-memory (testing, ephemeral)               │
//! │   - FileStore: JSON file (requires state-persistence)         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returns error, store unchanged |
//! | `StorageError::Serialization` | JSON encode/decode | Returns error |
//! | `StorageError::Corruption` | Invalid file format, poisoned lock | Returns error |
//! | Missing key | First run, key changed | `Ok(None)` |
//!
//! # Feature Gates
//!
//! - `state-persistence`: Enables [`FileStore`]. Without this feature only
//!   [`MemoryStore`] is available.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    Serialization(String),
    /// Stored data is corrupted or has an invalid format.
    Corruption(String),
    /// Backend is not available.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serialization(_)
            | StorageError::Corruption(_)
            | StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Store Trait
// ─────────────────────────────────────────────────────────────────────────────

/// String key-value storage.
///
/// Implementations must be thread-safe (`Send + Sync`) so one store can be
/// shared by several preference stores.
pub trait KeyValueStore: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read a value. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a value. Returns `true` if the key existed.
    fn remove(&self, key: &str) -> StorageResult<bool>;

    /// Delete every value.
    fn clear(&self) -> StorageResult<()>;

    /// Check if the store is usable.
    fn is_available(&self) -> bool {
        true
    }
}

fn poisoned() -> StorageError {
    StorageError::Corruption("lock poisoned".into())
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Store (always available)
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store for tests and ephemeral preferences.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of stored keys.
    pub fn entry_count(&self) -> StorageResult<usize> {
        Ok(self.data.read().map_err(|_| poisoned())?.len())
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self.data.read().map_err(|_| poisoned())?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self.data.write().map_err(|_| poisoned())?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        let mut guard = self.data.write().map_err(|_| poisoned())?;
        Ok(guard.remove(key).is_some())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut guard = self.data.write().map_err(|_| poisoned())?;
        guard.clear();
        Ok(())
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStore")
            .field("entries", &count)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Store (requires state-persistence feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "state-persistence")]
mod file_store {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// On-disk layout.
    #[derive(Serialize, Deserialize)]
    struct StoreFile {
        /// Format version for future migrations.
        format_version: u32,
        entries: BTreeMap<String, String>,
    }

    impl StoreFile {
        const FORMAT_VERSION: u32 = 1;
    }

    /// JSON file store.
    ///
    /// Every operation reads the file, and every write replaces it atomically.
    /// A write over a corrupt file starts from an empty map.
    ///
    /// # File Format
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "entries": {
    ///     "inventory.view": "{\"viewMode\":\"grid\"}"
    ///   }
    /// }
    /// ```
    ///
    /// # Atomic Writes
    ///
    /// 1. Write to `{path}.tmp`
    /// 2. Flush and sync
    /// 3. Rename `{path}.tmp` -> `{path}`
    pub struct FileStore {
        path: PathBuf,
        /// Serializes read-modify-write cycles within this process.
        write_lock: Mutex<()>,
    }

    impl FileStore {
        /// Create a store at `path`. The file is created on first write.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
                write_lock: Mutex::new(()),
            }
        }

        /// Store at the default location for an application.
        ///
        /// Uses `$XDG_STATE_HOME/shelf/{app_name}/prefs.json`, falling back to
        /// `~/.local/state` and then the current directory.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            Self::new(state_dir().join("shelf").join(app_name).join("prefs.json"))
        }

        /// File location.
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }

        fn read_entries(&self) -> StorageResult<BTreeMap<String, String>> {
            if !self.path.exists() {
                return Ok(BTreeMap::new());
            }
            let reader = BufReader::new(File::open(&self.path)?);
            let file: StoreFile = serde_json::from_reader(reader).map_err(|e| {
                StorageError::Corruption(format!("failed to parse {}: {e}", self.path.display()))
            })?;
            if file.format_version != StoreFile::FORMAT_VERSION {
                tracing::warn!(
                    stored = file.format_version,
                    expected = StoreFile::FORMAT_VERSION,
                    "preference file format version mismatch, ignoring stored values"
                );
                return Ok(BTreeMap::new());
            }
            Ok(file.entries)
        }

        fn write_entries(&self, entries: BTreeMap<String, String>) -> StorageResult<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = StoreFile {
                format_version: StoreFile::FORMAT_VERSION,
                entries,
            };
            let tmp_path = self.temp_path();
            {
                let mut writer = BufWriter::new(File::create(&tmp_path)?);
                serde_json::to_writer_pretty(&mut writer, &file)?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp_path, &self.path)?;
            tracing::debug!(
                path = %self.path.display(),
                entries = file.entries.len(),
                "saved preferences"
            );
            Ok(())
        }

        fn modify<T>(
            &self,
            f: impl FnOnce(&mut BTreeMap<String, String>) -> T,
        ) -> StorageResult<T> {
            let _guard = self.write_lock.lock().map_err(|_| poisoned())?;
            let mut entries = match self.read_entries() {
                Ok(entries) => entries,
                Err(StorageError::Corruption(reason)) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        %reason,
                        "replacing corrupt preference file"
                    );
                    BTreeMap::new()
                }
                Err(e) => return Err(e),
            };
            let out = f(&mut entries);
            self.write_entries(entries)?;
            Ok(out)
        }
    }

    /// State directory, falling back to the current directory.
    fn state_dir() -> PathBuf {
        if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
            return PathBuf::from(state_home);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local").join("state");
        }
        PathBuf::from(".")
    }

    impl KeyValueStore for FileStore {
        fn name(&self) -> &str {
            "FileStore"
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.read_entries()?.remove(key))
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.modify(|entries| {
                entries.insert(key.to_owned(), value.to_owned());
            })
        }

        fn remove(&self, key: &str) -> StorageResult<bool> {
            self.modify(|entries| entries.remove(key).is_some())
        }

        fn clear(&self) -> StorageResult<()> {
            let _guard = self.write_lock.lock().map_err(|_| poisoned())?;
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            Ok(())
        }

        fn is_available(&self) -> bool {
            let Some(parent) = self.path.parent() else {
                return false;
            };
            if !parent.exists() {
                return fs::create_dir_all(parent).is_ok();
            }
            let probe = parent.join(".shelf_write_probe");
            if fs::write(&probe, b"probe").is_ok() {
                let _ = fs::remove_file(&probe);
                return true;
            }
            false
        }
    }

    impl fmt::Debug for FileStore {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStore")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "state-persistence")]
pub use file_store::FileStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_basic_operations() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.entry_count().unwrap(), 2);

        store.set("a", "3").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("3"));

        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());

        store.clear().unwrap();
        assert_eq!(store.entry_count().unwrap(), 0);
    }

    #[test]
    fn memory_store_with_entries() {
        let store = MemoryStore::with_entries([("k", "v")]);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert!(store.is_available());
        assert_eq!(format!("{store:?}"), "MemoryStore { entries: 1 }");
    }

    #[test]
    fn storage_error_display_and_source() {
        use std::error::Error;

        let io = StorageError::from(std::io::Error::other("disk full"));
        assert!(io.to_string().contains("disk full"));
        assert!(io.source().is_some());

        let json = serde_json::from_str::<u32>("nope").unwrap_err();
        let ser = StorageError::from(json);
        assert!(ser.to_string().starts_with("serialization error"));
        assert!(ser.source().is_none());

        assert!(
            StorageError::Corruption("bad".into())
                .to_string()
                .contains("corruption")
        );
        assert!(
            StorageError::Unavailable("offline".into())
                .to_string()
                .contains("unavailable")
        );
    }

    #[cfg(feature = "state-persistence")]
    mod file {
        use super::super::*;

        #[test]
        fn round_trip_and_atomic_replace() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("prefs.json");
            let store = FileStore::new(&path);

            assert_eq!(store.get("x").unwrap(), None);
            store.set("x", "{\"viewMode\":\"grid\"}").unwrap();
            store.set("y", "2").unwrap();
            assert!(path.exists());
            assert!(!path.with_extension("json.tmp").exists());

            let reopened = FileStore::new(&path);
            assert_eq!(
                reopened.get("x").unwrap().as_deref(),
                Some("{\"viewMode\":\"grid\"}")
            );
            assert!(reopened.remove("y").unwrap());
            assert_eq!(store.get("y").unwrap(), None);

            store.clear().unwrap();
            assert!(!path.exists());
            assert_eq!(store.get("x").unwrap(), None);
        }

        #[test]
        fn corrupt_file_is_an_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("prefs.json");
            std::fs::write(&path, "not json").unwrap();
            let store = FileStore::new(&path);
            assert!(matches!(store.get("x"), Err(StorageError::Corruption(_))));
        }

        #[test]
        fn write_replaces_corrupt_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("prefs.json");
            std::fs::write(&path, "{ truncated").unwrap();
            let store = FileStore::new(&path);

            store.set("x", "{\"viewMode\":\"table\"}").unwrap();
            assert_eq!(
                store.get("x").unwrap().as_deref(),
                Some("{\"viewMode\":\"table\"}")
            );

            std::fs::write(&path, "[]").unwrap();
            assert!(!store.remove("x").unwrap());
            assert_eq!(store.get("x").unwrap(), None);
        }

        #[test]
        fn preference_update_survives_corrupt_file() {
            use crate::view_prefs::{PreferenceStore, ViewMode, ViewPreferences};
            use std::sync::Arc;

            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("prefs.json");
            std::fs::write(&path, "{ truncated").unwrap();
            let prefs = PreferenceStore::new(
                Arc::new(FileStore::new(&path)),
                "inventory.view",
                ViewPreferences::default(),
            );

            assert_eq!(prefs.load().view_mode, ViewMode::List);
            prefs.update(|p| p.view_mode = ViewMode::Table).unwrap();
            let reopened = PreferenceStore::new(
                Arc::new(FileStore::new(&path)),
                "inventory.view",
                ViewPreferences::default(),
            );
            assert_eq!(reopened.load().view_mode, ViewMode::Table);
        }

        #[test]
        fn unknown_format_version_reads_empty() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("prefs.json");
            std::fs::write(&path, r#"{"format_version": 99, "entries": {"x": "1"}}"#).unwrap();
            assert_eq!(FileStore::new(&path).get("x").unwrap(), None);
        }

        #[test]
        fn availability_probe() {
            let dir = tempfile::tempdir().unwrap();
            let store = FileStore::new(dir.path().join("prefs.json"));
            assert!(store.is_available());
        }
    }
}
