#![forbid(unsafe_code)]

//! Scroll simulation.
//!
//! Each simulated frame fires a burst of scroll events at the element, as a
//! fast trackpad would, then lets the browser recompute once. Halfway through
//! the run the sort is toggled, and three quarters in a search query narrows
//! the collection.

use std::cell::Cell;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;
use std::sync::Arc;

use shelf::{
    FileStore, ItemBrowser, ItemExtent, KeyValueStore, MemoryStore, PreferenceStore, RowAction,
    RowActions, ScrollSource, Size, SortConfig, SortField, ViewMode, ViewPreferences,
};

use crate::cli::Opts;
use crate::inventory::{self, InventoryItem};

/// Key the demo stores its view preferences under.
pub const PREFS_KEY: &str = "shelf-demo.inventory.view";

/// Inventory generator seed.
const SEED: u64 = 0x5EED;

/// Scroll events per frame.
const EVENTS_PER_FRAME: u32 = 8;

/// Pixels per scroll event.
const SCROLL_STEP: i64 = 45;

/// Grid cards are this many rows tall.
const CARD_ROWS: u32 = 4;

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Layout in use.
    pub view_mode: ViewMode,
    /// Frames simulated.
    pub frames: u32,
    /// Scroll events fired.
    pub events: u64,
    /// Frames whose visible rows changed.
    pub changed_frames: u32,
    /// Records passing the filter at the end.
    pub matching: usize,
    /// Visible positions at the end.
    pub final_range: Range<usize>,
    /// Cards per row.
    pub columns: usize,
    /// Final scroll offset.
    pub scroll_offset: u32,
    /// Row actions dispatched.
    pub actions: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "view:            {}", self.view_mode)?;
        writeln!(f, "frames:          {} ({} changed)", self.frames, self.changed_frames)?;
        writeln!(
            f,
            "scroll events:   {} ({} per frame)",
            self.events, EVENTS_PER_FRAME
        )?;
        writeln!(f, "matching items:  {}", self.matching)?;
        writeln!(f, "columns:         {}", self.columns)?;
        writeln!(f, "scroll offset:   {}px", self.scroll_offset)?;
        writeln!(f, "actions:         {}", self.actions)?;
        write!(
            f,
            "visible:         {}..{} ({} rendered)",
            self.final_range.start,
            self.final_range.end,
            self.final_range.len()
        )
    }
}

/// Counts dispatched actions and logs them.
struct LoggingActions {
    count: Rc<Cell<usize>>,
}

impl RowActions<InventoryItem> for LoggingActions {
    fn view(&mut self, record: &InventoryItem) {
        self.count.set(self.count.get() + 1);
        tracing::info!(id = record.id, name = %record.name, "view item");
    }

    fn edit(&mut self, record: &InventoryItem) {
        self.count.set(self.count.get() + 1);
        tracing::info!(id = record.id, sku = %record.sku, "edit item");
    }
}

/// Preference defaults for the demo inventory.
#[must_use]
pub fn default_preferences(view_mode: ViewMode) -> ViewPreferences {
    ViewPreferences {
        view_mode,
        use_virtualization: true,
        column_settings: inventory::default_columns(),
        sort_settings: SortConfig::new(SortField::asc("name")).then(SortField::asc("sku")),
    }
}

/// Run the simulation.
///
/// # Errors
///
/// Fails on a zero item height.
pub fn run(opts: &Opts) -> shelf::Result<Report> {
    let row_height = ItemExtent::new(opts.item_height)?;
    let card_height = ItemExtent::new(opts.item_height.saturating_mul(CARD_ROWS))?;

    let store: Arc<dyn KeyValueStore> = match &opts.prefs {
        Some(path) => Arc::new(FileStore::new(path)),
        None => Arc::new(MemoryStore::new()),
    };
    tracing::info!(store = store.name(), key = PREFS_KEY, "preference store ready");
    let prefs = PreferenceStore::new(store, PREFS_KEY, default_preferences(opts.view));

    let count = Rc::new(Cell::new(0));
    let mut browser = ItemBrowser::new(inventory::generate(opts.items, SEED), row_height)
        .with_card_height(card_height)
        .with_overscan(opts.overscan)
        .with_search_fields(["name", "sku", "category"])
        .with_actions(LoggingActions {
            count: Rc::clone(&count),
        })
        .with_preferences(prefs);

    let source = ScrollSource::new(Size::new(opts.width, opts.viewport));
    let _attachment = browser.attach(&source);
    source.set_content_height(browser.content_height());
    tracing::info!(
        items = browser.items().len(),
        view = %browser.view_mode(),
        columns = browser.columns(),
        "mounted"
    );

    let mut events = 0u64;
    let mut changed_frames = 0u32;
    for frame in 0..opts.frames {
        if frame == opts.frames / 2 && frame > 0 {
            browser.toggle_sort("price");
            tracing::info!(sort = ?browser.sort().primary, "sort toggled");
        }
        if frame == opts.frames * 3 / 4 && frame > 0 {
            browser.set_query("steel");
            source.set_content_height(browser.content_height());
            tracing::info!(matching = browser.len(), "query applied");
        }

        for _ in 0..EVENTS_PER_FRAME {
            source.scroll_by(SCROLL_STEP);
            events += 1;
        }
        if browser.on_frame() {
            changed_frames += 1;
        }
        let range = browser.visible_range();
        tracing::debug!(frame, start = range.start, end = range.end, "frame rendered");
    }

    let first_visible = browser.visible_rows().next().map(|(index, _)| index);
    if let Some(index) = first_visible {
        browser.dispatch(RowAction::View, index);
        browser.dispatch(RowAction::Edit, index);
    }

    Ok(Report {
        view_mode: browser.view_mode(),
        frames: opts.frames,
        events,
        changed_frames,
        matching: browser.len(),
        final_range: browser.visible_range(),
        columns: browser.columns(),
        scroll_offset: source.viewport().scroll_offset,
        actions: count.get(),
    })
}
