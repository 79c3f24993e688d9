#![forbid(unsafe_code)]

//! Typed view preferences persisted through a [`KeyValueStore`].
//!
//! # Merge Strategy
//!
//! [`PreferenceStore::load`] reads the stored JSON object once and
//! shallow-merges its top-level keys over the serialized defaults: a stored
//! key replaces the default wholesale, a key the stored object lacks keeps its
//! default. Stored keys whose values do not fit the type are dropped one by
//! one, so a single bad field does not discard the rest. Missing or
//! unparseable data yields the defaults.
//!
//! Every write stores the complete value.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shelf_widgets::sort::SortConfig;
use shelf_widgets::table::ColumnSetting;

use crate::state_persistence::{KeyValueStore, StorageResult};

/// How the item collection is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One record per row.
    #[default]
    List,
    /// Rows with columns and a sticky header.
    Table,
    /// Cards in a responsive grid.
    Grid,
}

impl ViewMode {
    /// Lowercase name, as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ViewMode::List => "list",
            ViewMode::Table => "table",
            ViewMode::Grid => "grid",
        }
    }

    /// Parse a lowercase name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "list" => Some(ViewMode::List),
            "table" => Some(ViewMode::Table),
            "grid" => Some(ViewMode::Grid),
            _ => None,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-chosen presentation of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPreferences {
    /// Active layout.
    pub view_mode: ViewMode,
    /// Render only the visible window instead of every record.
    pub use_virtualization: bool,
    /// Table columns in display order.
    pub column_settings: Vec<ColumnSetting>,
    /// Active sort.
    pub sort_settings: SortConfig,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::default(),
            use_virtualization: true,
            column_settings: Vec::new(),
            sort_settings: SortConfig::default(),
        }
    }
}

/// A typed preference value stored under one key.
pub struct PreferenceStore<P> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    defaults: P,
}

impl<P> PreferenceStore<P>
where
    P: Serialize + DeserializeOwned + Clone,
{
    /// Bind `key` in `store`, falling back to `defaults`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, defaults: P) -> Self {
        Self {
            store,
            key: key.into(),
            defaults,
        }
    }

    /// Storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Values used for anything not stored.
    #[must_use]
    pub fn defaults(&self) -> &P {
        &self.defaults
    }

    /// Read the stored value merged over the defaults.
    ///
    /// Never fails: storage errors and corrupt data are logged and the
    /// defaults returned.
    #[must_use]
    pub fn load(&self) -> P {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no stored preferences, using defaults");
                return self.defaults.clone();
            }
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "failed to read preferences, using defaults"
                );
                return self.defaults.clone();
            }
        };

        let stored = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                tracing::warn!(
                    key = %self.key,
                    found = json_kind(&other),
                    "stored preferences are not an object, using defaults"
                );
                return self.defaults.clone();
            }
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "corrupt stored preferences, using defaults"
                );
                return self.defaults.clone();
            }
        };

        match self.merge_over_defaults(stored) {
            Some(merged) => merged,
            None => self.defaults.clone(),
        }
    }

    fn merge_over_defaults(&self, stored: Map<String, Value>) -> Option<P> {
        let mut merged = match serde_json::to_value(&self.defaults) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(key = %self.key, "defaults do not serialize to an object");
                return None;
            }
        };

        // Fast path: everything fits.
        let mut all = merged.clone();
        all.extend(stored.clone());
        if let Ok(value) = serde_json::from_value::<P>(Value::Object(all)) {
            return Some(value);
        }

        // Apply keys one at a time, skipping the ones that break the type.
        for (field, value) in stored {
            let previous = merged.insert(field.clone(), value);
            if serde_json::from_value::<P>(Value::Object(merged.clone())).is_err() {
                tracing::warn!(
                    key = %self.key,
                    field = %field,
                    "ignoring invalid stored preference"
                );
                match previous {
                    Some(previous) => merged.insert(field, previous),
                    None => merged.remove(&field),
                };
            }
        }
        serde_json::from_value::<P>(Value::Object(merged)).ok()
    }

    /// Write the complete value.
    pub fn save(&self, value: &P) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(&self.key, &raw)?;
        tracing::debug!(key = %self.key, bytes = raw.len(), "saved preferences");
        Ok(())
    }

    /// Load, modify, save. Returns the saved value.
    pub fn update(&self, f: impl FnOnce(&mut P)) -> StorageResult<P> {
        let mut value = self.load();
        f(&mut value);
        self.save(&value)?;
        Ok(value)
    }

    /// Delete the stored value so the next load yields the defaults.
    pub fn reset(&self) -> StorageResult<bool> {
        self.store.remove(&self.key)
    }
}

impl<P: fmt::Debug> fmt::Debug for PreferenceStore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("store", &self.store.name())
            .field("key", &self.key)
            .field("defaults", &self.defaults)
            .finish()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
