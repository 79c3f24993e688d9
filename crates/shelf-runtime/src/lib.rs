#![forbid(unsafe_code)]

//! Runtime: preference persistence and the item browser.
//!
//! - [`state_persistence`]: the injected [`KeyValueStore`](state_persistence::KeyValueStore)
//!   and its memory and file implementations
//! - [`view_prefs`]: typed view preferences merged over defaults on load
//! - [`browser`]: [`ItemBrowser`](browser::ItemBrowser), which wires filter,
//!   sort, selection and a windowed container together

pub mod browser;
pub mod state_persistence;
pub mod view_prefs;

pub use browser::{ItemBrowser, RowAction, RowActions};
#[cfg(feature = "state-persistence")]
pub use state_persistence::FileStore;
pub use state_persistence::{KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use view_prefs::{PreferenceStore, ViewMode, ViewPreferences};
