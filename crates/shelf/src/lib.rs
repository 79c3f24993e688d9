#![forbid(unsafe_code)]

//! Shelfwise public facade crate.
//!
//! Windowed list, table and grid containers for large item collections, with
//! multi-field sorting, filtering, selection and persisted view preferences.
//! This crate re-exports the common types from the internal crates and offers
//! a prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use shelf_core::event::ViewportEvent;
pub use shelf_core::frame_coalescer::{FrameCoalescer, FrameUpdate};
pub use shelf_core::geometry::{Size, Viewport};
pub use shelf_core::listener::{ListenerGuard, ListenerSet};
pub use shelf_core::scroll_source::ScrollSource;

// --- Widget re-exports -----------------------------------------------------

pub use shelf_widgets::filter::{FilterSet, Predicate, apply_filter, filter_indices};
pub use shelf_widgets::grid::{
    ColumnBreakpoints, GridPosition, GridRow, WindowedGrid, grid_position,
};
pub use shelf_widgets::record::{FieldValue, Record};
pub use shelf_widgets::selection::Selection;
pub use shelf_widgets::sort::{
    CompareStrategy, SortConfig, SortField, SortOrder, apply_sort, compare_values, sort_indices,
};
pub use shelf_widgets::table::{ColumnLayout, ColumnSetting, WindowedTable};
pub use shelf_widgets::virtualized::WindowedList;
pub use shelf_widgets::{ItemExtent, LayoutError, VisibleRange, Window, compute_visible_range};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "state-persistence")]
pub use shelf_runtime::FileStore;
pub use shelf_runtime::{
    ItemBrowser, KeyValueStore, MemoryStore, PreferenceStore, RowAction, RowActions,
    StorageError, StorageResult, ViewMode, ViewPreferences,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Shelfwise hosts.
#[derive(Debug)]
pub enum Error {
    /// Invalid container configuration.
    Layout(LayoutError),
    /// Preference storage failure.
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<LayoutError> for Error {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(StorageError::Io(err))
    }
}

/// Standard result type for Shelfwise APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, FieldValue, FilterSet, ItemBrowser, ItemExtent, KeyValueStore, MemoryStore,
        PreferenceStore, Record, Result, RowAction, RowActions, ScrollSource, Size, SortConfig,
        SortField, ViewMode, ViewPreferences, Viewport,
    };

    pub use crate::{core, runtime, widgets};
}

pub use shelf_core as core;
pub use shelf_runtime as runtime;
pub use shelf_widgets as widgets;
