#![forbid(unsafe_code)]

//! Item browser: the per-render pipeline of a collection view.
//!
//! ```text
//! items ──▶ filter ──▶ sort ──▶ windowed container ──▶ visible rows
//!                  │
//!                  └──▶ selection pruning
//! ```
//!
//! The browser owns the source records and derives the visible sequence as a
//! list of indices, so filtering and sorting never clone records. The active
//! [`ViewMode`] picks the container: a [`WindowedList`], a [`WindowedTable`]
//! or a [`WindowedGrid`]. Switching modes rebuilds the container at the
//! current scroll position; the browser keeps its own frame coalescer so an
//! attachment to the scrollable element survives the switch.
//!
//! Sort, view mode, column and virtualization changes are written through
//! the optional [`PreferenceStore`] as they happen. Write failures are logged
//! and do not interrupt the view; [`ItemBrowser::save_preferences`] surfaces
//! them to callers that care.

use std::cell::RefCell;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use shelf_core::event::ViewportEvent;
use shelf_core::frame_coalescer::FrameCoalescer;
use shelf_core::geometry::{Size, Viewport};
use shelf_core::listener::ListenerGuard;
use shelf_core::scroll_source::ScrollSource;
use shelf_widgets::filter::{FilterSet, filter_indices};
use shelf_widgets::grid::{ColumnBreakpoints, WindowedGrid};
use shelf_widgets::record::Record;
use shelf_widgets::selection::Selection;
use shelf_widgets::sort::SortConfig;
use shelf_widgets::table::{ColumnLayout, DEFAULT_HEADER_HEIGHT, WindowedTable};
use shelf_widgets::virtualized::{DEFAULT_OVERSCAN, WindowedList};
use shelf_widgets::{ItemExtent, VisibleRange, Window};

use crate::state_persistence::StorageResult;
use crate::view_prefs::{PreferenceStore, ViewMode, ViewPreferences};

/// A per-row action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    /// Open the record.
    View,
    /// Open the record for editing.
    Edit,
    /// Delete the record.
    Delete,
}

/// Host callbacks for row actions. Every hook defaults to doing nothing.
pub trait RowActions<R> {
    /// The view button was pressed.
    fn view(&mut self, _record: &R) {}

    /// The edit button was pressed.
    fn edit(&mut self, _record: &R) {}

    /// The delete button was pressed.
    fn delete(&mut self, _record: &R) {}
}

/// The container behind the active view mode.
#[derive(Debug)]
enum Layout {
    List(WindowedList),
    Table(WindowedTable),
    Grid(WindowedGrid),
}

impl Layout {
    fn apply(&mut self, size: Size, scroll_offset: u32) -> bool {
        let viewport = Viewport::new(scroll_offset, size.height);
        match self {
            Layout::List(list) => list.set_viewport(viewport),
            Layout::Table(table) => table.set_viewport(viewport),
            Layout::Grid(grid) => grid.set_width(size.width) | grid.set_viewport(viewport),
        }
    }

    fn set_len(&mut self, len: usize) -> bool {
        match self {
            Layout::List(list) => list.set_len(len),
            Layout::Table(table) => table.set_len(len),
            Layout::Grid(grid) => grid.set_len(len),
        }
    }

    /// Flat indices of the visible records.
    fn item_range(&self) -> Range<usize> {
        match self {
            Layout::List(list) => list.range().as_range(),
            Layout::Table(table) => table.range().as_range(),
            Layout::Grid(grid) => grid.item_range(),
        }
    }

    fn window(&self) -> Window {
        match self {
            Layout::List(list) => list.window(),
            Layout::Table(table) => table.window(),
            Layout::Grid(grid) => grid.window(),
        }
    }

    /// Scrollable height, including a table's sticky header.
    fn content_height(&self) -> u64 {
        match self {
            Layout::List(list) => list.window().total_height(),
            Layout::Table(table) => {
                table.window().total_height() + u64::from(table.header_height())
            }
            Layout::Grid(grid) => grid.window().total_height(),
        }
    }

    fn scroll_offset_for(&self, index: usize) -> u32 {
        match self {
            Layout::List(list) => list.scroll_offset_for(index),
            Layout::Table(table) => table.list().scroll_offset_for(index),
            Layout::Grid(grid) => grid.scroll_offset_for(index),
        }
    }

    fn columns(&self) -> usize {
        match self {
            Layout::List(_) | Layout::Table(_) => 1,
            Layout::Grid(grid) => grid.columns(),
        }
    }
}

/// A filtered, sorted, windowed view over a collection of records.
pub struct ItemBrowser<R: Record> {
    items: Vec<R>,
    /// Indices into `items`, filtered and sorted.
    derived: Vec<usize>,
    filter: FilterSet,
    selection: Selection<R::Id>,
    prefs: ViewPreferences,
    store: Option<PreferenceStore<ViewPreferences>>,
    layout: Layout,
    row_height: ItemExtent,
    card_height: ItemExtent,
    header_height: u32,
    breakpoints: ColumnBreakpoints,
    overscan: usize,
    size: Size,
    scroll_offset: u32,
    pending: Rc<RefCell<FrameCoalescer>>,
    actions: Option<Box<dyn RowActions<R>>>,
}

impl<R: Record> ItemBrowser<R> {
    /// Browse `items` in rows of `row_height`, with default preferences.
    ///
    /// Grid cards use the same height until
    /// [`with_card_height`](Self::with_card_height) says otherwise.
    #[must_use]
    pub fn new(items: Vec<R>, row_height: ItemExtent) -> Self {
        let mut browser = Self {
            items,
            derived: Vec::new(),
            filter: FilterSet::default(),
            selection: Selection::new(),
            prefs: ViewPreferences::default(),
            store: None,
            layout: Layout::List(WindowedList::new(0, row_height)),
            row_height,
            card_height: row_height,
            header_height: DEFAULT_HEADER_HEIGHT,
            breakpoints: ColumnBreakpoints::default(),
            overscan: DEFAULT_OVERSCAN,
            size: Size::default(),
            scroll_offset: 0,
            pending: Rc::new(RefCell::new(FrameCoalescer::new())),
            actions: None,
        };
        browser.rederive();
        browser.rebuild_layout();
        browser
    }

    /// Load preferences from `store` and write changes back to it.
    #[must_use]
    pub fn with_preferences(mut self, store: PreferenceStore<ViewPreferences>) -> Self {
        self.prefs = store.load();
        self.store = Some(store);
        self.rederive();
        self.rebuild_layout();
        self
    }

    /// Start from explicit preferences without persisting them.
    #[must_use]
    pub fn with_view_preferences(mut self, prefs: ViewPreferences) -> Self {
        self.prefs = prefs;
        self.rederive();
        self.rebuild_layout();
        self
    }

    /// Height of a grid row of cards.
    #[must_use]
    pub fn with_card_height(mut self, card_height: ItemExtent) -> Self {
        self.card_height = card_height;
        self.rebuild_layout();
        self
    }

    /// Sticky table header height.
    #[must_use]
    pub fn with_header_height(mut self, header_height: u32) -> Self {
        self.header_height = header_height;
        self.rebuild_layout();
        self
    }

    /// Grid breakpoint table.
    #[must_use]
    pub fn with_breakpoints(mut self, breakpoints: ColumnBreakpoints) -> Self {
        self.breakpoints = breakpoints;
        self.rebuild_layout();
        self
    }

    /// Overscan in rows.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self.rebuild_layout();
        self
    }

    /// Fields the free-text query searches.
    #[must_use]
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.fields = fields.into_iter().map(Into::into).collect();
        self.rederive();
        self
    }

    /// Row action callbacks.
    #[must_use]
    pub fn with_actions(mut self, actions: impl RowActions<R> + 'static) -> Self {
        self.actions = Some(Box::new(actions));
        self
    }

    // ── Viewport ────────────────────────────────────────────────────────

    /// Mount on a scrollable element.
    ///
    /// Reads its size and scroll offset now and queues its later events for
    /// [`on_frame`](Self::on_frame). Dropping the guard detaches.
    #[must_use = "dropping the guard immediately detaches the listener"]
    pub fn attach(&mut self, source: &ScrollSource) -> ListenerGuard {
        self.size = source.size();
        self.scroll_offset = source.viewport().scroll_offset;
        self.layout.apply(self.size, self.scroll_offset);
        source.forward_to(&self.pending)
    }

    /// Queue an event for the next frame.
    pub fn push_event(&self, event: ViewportEvent) {
        self.pending.borrow_mut().push(event);
    }

    /// Apply events received since the last frame. Returns `true` if the
    /// visible rows changed.
    pub fn on_frame(&mut self) -> bool {
        let Some(update) = self.pending.borrow_mut().take() else {
            return false;
        };
        if let Some(size) = update.size {
            self.size = size;
        }
        if let Some(offset) = update.scroll_offset {
            self.scroll_offset = offset;
        }
        self.layout.apply(self.size, self.scroll_offset)
    }

    /// Apply a new container size immediately.
    pub fn set_size(&mut self, size: Size) -> bool {
        self.size = size;
        self.layout.apply(self.size, self.scroll_offset)
    }

    /// Apply a new scroll offset immediately.
    pub fn scroll_to(&mut self, offset: u32) -> bool {
        self.scroll_offset = offset;
        self.layout.apply(self.size, self.scroll_offset)
    }

    /// Scroll offset that brings visible record `index` into view.
    #[must_use]
    pub fn scroll_offset_for(&self, index: usize) -> u32 {
        self.layout.scroll_offset_for(index)
    }

    // ── Data ────────────────────────────────────────────────────────────

    /// Replace the collection (after a fetch). Re-derives the visible
    /// sequence and drops selected ids that are gone.
    pub fn set_items(&mut self, items: Vec<R>) {
        self.items = items;
        self.rederive();
    }

    /// Replace the filter.
    pub fn set_filter(&mut self, filter: FilterSet) {
        self.filter = filter;
        self.rederive();
    }

    /// Replace the free-text query, keeping the search fields and predicates.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
        self.rederive();
    }

    /// Replace the sort and persist it.
    pub fn set_sort(&mut self, sort: SortConfig) {
        self.prefs.sort_settings = sort;
        self.rederive();
        self.persist();
    }

    /// Header click on `field`. In table mode only existing columns sort.
    ///
    /// Returns `true` if the sort changed.
    pub fn toggle_sort(&mut self, field: &str) -> bool {
        let changed = match &self.layout {
            Layout::Table(table) => table.header_click(field, &mut self.prefs.sort_settings),
            Layout::List(_) | Layout::Grid(_) => {
                self.prefs.sort_settings.toggle(field);
                true
            }
        };
        if changed {
            self.rederive();
            self.persist();
        }
        changed
    }

    /// Switch layouts, keeping the scroll position, and persist.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.prefs.view_mode == mode {
            return;
        }
        tracing::debug!(from = %self.prefs.view_mode, to = %mode, "view mode changed");
        self.prefs.view_mode = mode;
        self.rebuild_layout();
        self.persist();
    }

    /// Turn windowing on or off, and persist.
    ///
    /// With windowing off every derived record is visible.
    pub fn set_use_virtualization(&mut self, enabled: bool) {
        if self.prefs.use_virtualization == enabled {
            return;
        }
        self.prefs.use_virtualization = enabled;
        self.persist();
    }

    /// Replace the table columns and persist.
    pub fn set_columns(&mut self, columns: impl Into<ColumnLayout>) {
        let columns = columns.into();
        self.prefs.column_settings = columns.all().to_vec();
        if let Layout::Table(table) = &mut self.layout {
            table.set_columns(columns);
        }
        self.persist();
    }

    /// Show or hide a table column and persist. `None` for an unknown key.
    pub fn toggle_column(&mut self, key: &str) -> Option<bool> {
        self.edit_columns(|columns| columns.toggle_visibility(key))
    }

    /// Resize a table column and persist. `None` for an unknown key.
    pub fn resize_column(&mut self, key: &str, width: u32) -> Option<u32> {
        self.edit_columns(|columns| columns.resize(key, width))
    }

    fn edit_columns<T>(&mut self, f: impl FnOnce(&mut ColumnLayout) -> Option<T>) -> Option<T> {
        let mut columns = ColumnLayout::new(self.prefs.column_settings.clone());
        let out = f(&mut columns)?;
        self.set_columns(columns);
        Some(out)
    }

    fn rederive(&mut self) {
        let mut derived = filter_indices(&self.items, &self.filter);
        let sort = &self.prefs.sort_settings;
        let items = &self.items;
        derived.sort_by(|&a, &b| sort.compare(&items[a], &items[b]));
        self.derived = derived;

        let pruned = self.selection.retain_present(&self.derived_ids());
        self.layout.set_len(self.derived.len());
        tracing::debug!(
            total = self.items.len(),
            visible = self.derived.len(),
            pruned,
            "derived visible records"
        );
    }

    fn rebuild_layout(&mut self) {
        let len = self.derived.len();
        let viewport = Viewport::new(self.scroll_offset, self.size.height);
        self.layout = match self.prefs.view_mode {
            ViewMode::List => Layout::List(
                WindowedList::new(len, self.row_height)
                    .with_overscan(self.overscan)
                    .with_viewport(viewport),
            ),
            ViewMode::Table => Layout::Table(
                WindowedTable::new(self.prefs.column_settings.clone(), len, self.row_height)
                    .with_header_height(self.header_height)
                    .with_overscan(self.overscan)
                    .with_viewport(viewport),
            ),
            ViewMode::Grid => {
                let mut grid = WindowedGrid::new(len, self.card_height)
                    .with_breakpoints(self.breakpoints.clone())
                    .with_overscan(self.overscan)
                    .with_size(self.size);
                grid.set_viewport(viewport);
                Layout::Grid(grid)
            }
        };
    }

    fn persist(&self) {
        if let Some(store) = &self.store
            && let Err(e) = store.save(&self.prefs)
        {
            tracing::warn!(key = %store.key(), error = %e, "failed to persist view preferences");
        }
    }

    /// Write the current preferences now.
    ///
    /// Does nothing without a preference store.
    pub fn save_preferences(&self) -> StorageResult<()> {
        match &self.store {
            Some(store) => store.save(&self.prefs),
            None => Ok(()),
        }
    }

    // ── Reading ─────────────────────────────────────────────────────────

    /// Positions in the derived sequence that should be rendered.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        if !self.prefs.use_virtualization {
            return 0..self.derived.len();
        }
        let Range { start, end } = self.layout.item_range();
        let end = end.min(self.derived.len());
        start.min(end)..end
    }

    /// Records to render with their positions in the derived sequence.
    pub fn visible_rows(&self) -> impl ExactSizeIterator<Item = (usize, &R)> {
        self.visible_range()
            .map(move |i| (i, &self.items[self.derived[i]]))
    }

    /// Spacers around the visible rows (in grid mode, around the visible
    /// card rows).
    #[must_use]
    pub fn window(&self) -> Window {
        let window = self.layout.window();
        if self.prefs.use_virtualization {
            return window;
        }
        Window::new(
            VisibleRange::new(0, window.item_count),
            window.item_height,
            window.item_count,
        )
    }

    /// Height the scrollable element should report as its content.
    ///
    /// In table mode this includes the header, which sits above the body.
    #[must_use]
    pub fn content_height(&self) -> u64 {
        self.layout.content_height()
    }

    /// Cards per row: the grid column count, or 1 for list and table.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.layout.columns()
    }

    /// Record at position `index` of the derived sequence.
    #[must_use]
    pub fn record_at(&self, index: usize) -> Option<&R> {
        self.derived.get(index).map(|&i| &self.items[i])
    }

    /// Number of records that pass the filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.derived.len()
    }

    /// Check if no record passes the filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.derived.is_empty()
    }

    /// All records, unfiltered, in fetch order.
    #[must_use]
    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// Active filter.
    #[must_use]
    pub fn filter(&self) -> &FilterSet {
        &self.filter
    }

    /// Active sort.
    #[must_use]
    pub fn sort(&self) -> &SortConfig {
        &self.prefs.sort_settings
    }

    /// Current preferences.
    #[must_use]
    pub fn preferences(&self) -> &ViewPreferences {
        &self.prefs
    }

    /// Active view mode.
    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.prefs.view_mode
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// Selected ids.
    #[must_use]
    pub fn selection(&self) -> &Selection<R::Id> {
        &self.selection
    }

    /// Flip selection of the record at `index`. `None` if out of range.
    pub fn toggle_selected(&mut self, index: usize) -> Option<bool> {
        let id = self.record_at(index)?.id();
        Some(self.selection.toggle(id))
    }

    /// Select every record that passes the filter.
    pub fn select_all(&mut self) {
        let ids = self.derived_ids();
        self.selection.select_all(ids);
    }

    /// Check if every record that passes the filter is selected.
    #[must_use]
    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(&self.derived_ids())
    }

    fn derived_ids(&self) -> Vec<R::Id> {
        self.derived.iter().map(|&i| self.items[i].id()).collect()
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ── Actions ─────────────────────────────────────────────────────────

    /// Run a row action on the record at `index`.
    ///
    /// Returns `false` if `index` is out of range. Without registered
    /// callbacks the action is resolved but nothing runs.
    pub fn dispatch(&mut self, action: RowAction, index: usize) -> bool {
        let Some(&item) = self.derived.get(index) else {
            return false;
        };
        let record = &self.items[item];
        tracing::debug!(?action, index, "row action");
        if let Some(actions) = self.actions.as_mut() {
            match action {
                RowAction::View => actions.view(record),
                RowAction::Edit => actions.edit(record),
                RowAction::Delete => actions.delete(record),
            }
        }
        true
    }
}

impl<R: Record> fmt::Debug for ItemBrowser<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemBrowser")
            .field("items", &self.items.len())
            .field("visible", &self.derived.len())
            .field("selected", &self.selection.len())
            .field("view_mode", &self.prefs.view_mode)
            .field("layout", &self.layout)
            .field("size", &self.size)
            .field("scroll_offset", &self.scroll_offset)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_persistence::{KeyValueStore, MemoryStore};
    use shelf_widgets::filter::Predicate;
    use shelf_widgets::record::FieldValue;
    use shelf_widgets::sort::SortField;
    use shelf_widgets::table::ColumnSetting;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        name: String,
        price: f64,
        archived: bool,
    }

    impl Record for Item {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }

        fn field(&self, name: &str) -> FieldValue<'_> {
            match name {
                "name" => FieldValue::text(&self.name),
                "price" => self.price.into(),
                "archived" => self.archived.into(),
                _ => FieldValue::Null,
            }
        }
    }

    fn items(n: u32) -> Vec<Item> {
        (0..n)
            .map(|id| Item {
                id,
                name: format!("Item {:04}", n - id),
                price: f64::from(id % 10),
                archived: id % 3 == 0,
            })
            .collect()
    }

    fn px(h: u32) -> ItemExtent {
        ItemExtent::new(h).unwrap()
    }

    fn browser(n: u32) -> ItemBrowser<Item> {
        let mut b = ItemBrowser::new(items(n), px(60)).with_search_fields(["name"]);
        b.set_size(Size::new(800, 600));
        b
    }

    fn ids(b: &ItemBrowser<Item>) -> Vec<u32> {
        b.visible_rows().map(|(_, r)| r.id).collect()
    }

    #[derive(Default)]
    struct Log(Rc<RefCell<Vec<(RowAction, u32)>>>);

    impl RowActions<Item> for Log {
        fn view(&mut self, record: &Item) {
            self.0.borrow_mut().push((RowAction::View, record.id));
        }

        fn delete(&mut self, record: &Item) {
            self.0.borrow_mut().push((RowAction::Delete, record.id));
        }
    }

    #[test]
    fn default_sort_is_name_ascending() {
        let b = browser(1000);
        assert_eq!(b.len(), 1000);
        // Names count down, so name-ascending reverses the ids.
        assert_eq!(b.record_at(0).map(|r| r.id), Some(999));
        assert_eq!(b.visible_range(), 0..15);
        assert_eq!(b.visible_rows().len(), 15);
    }

    #[test]
    fn filter_then_sort_then_window() {
        let mut b = browser(100);
        b.set_filter(
            FilterSet::new()
                .with_query("item 00", ["name"])
                .with(Predicate::range("price", Some(5.0), None)),
        );
        // Names "Item 0001".."Item 0099" match; price = id % 10 >= 5.
        assert!(b.len() > 0);
        assert!(b.visible_rows().all(|(_, r)| r.price >= 5.0 && r.id >= 1));

        b.set_sort(SortConfig::new(SortField::desc("price")).then(SortField::asc("name")));
        let prices: Vec<f64> = b.visible_rows().map(|(_, r)| r.price).collect();
        assert!(prices.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn scrolling_moves_the_window() {
        let mut b = browser(1000);
        assert!(b.scroll_to(3000));
        assert_eq!(b.visible_range(), 45..65);
        let w = b.window();
        assert_eq!(w.leading_spacer, 45 * 60);
        assert_eq!(w.total_height(), 1000 * 60);
    }

    #[test]
    fn frames_coalesce_attached_events() {
        let source = ScrollSource::new(Size::new(800, 600));
        let mut b = ItemBrowser::new(items(1000), px(60));
        let guard = b.attach(&source);
        source.scroll_to(100);
        source.scroll_to(3000);
        assert!(b.on_frame());
        assert_eq!(b.visible_range(), 45..65);
        assert!(!b.on_frame());

        // Switching layouts keeps the same attachment working.
        b.set_view_mode(ViewMode::Grid);
        source.resize(Size::new(1200, 600));
        b.on_frame();
        assert_eq!(b.columns(), 5);
        drop(guard);
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn shrinking_collection_clamps_range() {
        let mut b = browser(1000);
        b.scroll_to(30_000);
        b.set_items(items(3));
        assert_eq!(b.len(), 3);
        let range = b.visible_range();
        assert!(range.end <= 3 && range.start <= range.end);
    }

    #[test]
    fn selection_is_pruned_on_filter_and_fetch() {
        let mut b = browser(10);
        b.select_all();
        assert!(b.is_all_selected());
        assert_eq!(b.selection().len(), 10);

        b.set_filter(FilterSet::new().with(Predicate::is_true("archived")));
        // Archived ids: 0, 3, 6, 9.
        assert_eq!(b.selection().len(), 4);
        assert!(b.is_all_selected());

        b.set_filter(FilterSet::new());
        assert!(!b.is_all_selected());

        // Selection order follows the name-ascending select-all: 9, 8, .., 0.
        b.set_items(items(5));
        assert_eq!(b.selection().iter().copied().collect::<Vec<_>>(), [3, 0]);
        b.clear_selection();
        assert!(b.selection().is_empty());
    }

    #[test]
    fn toggle_selected_by_position() {
        let mut b = browser(5);
        let first = b.record_at(0).unwrap().id;
        assert_eq!(b.toggle_selected(0), Some(true));
        assert!(b.selection().contains(&first));
        assert_eq!(b.toggle_selected(0), Some(false));
        assert_eq!(b.toggle_selected(99), None);
    }

    #[test]
    fn dispatch_invokes_hooks() {
        let log = Log::default();
        let seen = Rc::clone(&log.0);
        let mut b = browser(5).with_actions(log);
        let first = b.record_at(0).unwrap().id;

        assert!(b.dispatch(RowAction::View, 0));
        assert!(b.dispatch(RowAction::Edit, 0));
        assert!(b.dispatch(RowAction::Delete, 4));
        assert!(!b.dispatch(RowAction::View, 5));
        assert_eq!(
            *seen.borrow(),
            [(RowAction::View, first), (RowAction::Delete, b.record_at(4).unwrap().id)]
        );
    }

    #[test]
    fn virtualization_off_materializes_everything() {
        let mut b = browser(200);
        b.set_use_virtualization(false);
        assert_eq!(b.visible_range(), 0..200);
        let w = b.window();
        assert_eq!((w.leading_spacer, w.trailing_spacer), (0, 0));
        assert_eq!(w.materialized_height(), 200 * 60);
    }

    #[test]
    fn grid_mode_uses_rows_of_cards() {
        let mut b = ItemBrowser::new(items(100), px(60)).with_card_height(px(200));
        b.set_size(Size::new(800, 400));
        b.set_view_mode(ViewMode::Grid);
        assert_eq!(b.columns(), 4);
        // 400 / 200 = 2 rows + 5 overscan = 7 rows of 4.
        assert_eq!(b.visible_range(), 0..28);
        assert_eq!(b.window().item_count, 25);
    }

    #[test]
    fn table_header_click_only_sorts_known_columns() {
        let prefs = ViewPreferences {
            view_mode: ViewMode::Table,
            column_settings: vec![
                ColumnSetting::new("name", "Name", 200),
                ColumnSetting::new("price", "Price", 80),
            ],
            ..ViewPreferences::default()
        };
        let mut b = browser(20).with_view_preferences(prefs);
        assert!(b.toggle_sort("price"));
        assert_eq!(b.sort().primary, SortField::asc("price"));
        assert!(!b.toggle_sort("archived"));
        assert!(b.toggle_sort("price"));
        assert_eq!(b.sort().primary, SortField::desc("price"));
        assert_eq!(b.toggle_column("price"), Some(false));
        assert_eq!(b.resize_column("name", 10), Some(40));
        assert_eq!(b.toggle_column("missing"), None);
    }

    #[test]
    fn table_content_height_reaches_last_row() {
        let source = ScrollSource::new(Size::new(800, 300));
        let mut b = ItemBrowser::new(items(10), px(60))
            .with_overscan(0)
            .with_view_preferences(ViewPreferences {
                view_mode: ViewMode::Table,
                ..ViewPreferences::default()
            });
        let _guard = b.attach(&source);
        assert_eq!(b.content_height(), 10 * 60 + 40);

        source.set_content_height(b.content_height());
        source.scroll_by(10_000);
        assert!(b.on_frame());
        // 640 - 300 = 340; the 260px body shows rows 5..10.
        assert_eq!(source.viewport().scroll_offset, 340);
        assert_eq!(b.visible_range(), 5..10);

        b.set_view_mode(ViewMode::List);
        assert_eq!(b.content_height(), 600);
    }

    #[test]
    fn preference_changes_are_written_through() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set("inv", r#"{"viewMode":"grid"}"#).unwrap();

        let mut b = ItemBrowser::new(items(10), px(60)).with_preferences(PreferenceStore::new(
            Arc::clone(&store),
            "inv",
            ViewPreferences::default(),
        ));
        assert_eq!(b.view_mode(), ViewMode::Grid);

        b.toggle_sort("price");
        b.set_view_mode(ViewMode::Table);
        b.set_use_virtualization(false);

        let reloaded = PreferenceStore::new(store, "inv", ViewPreferences::default()).load();
        assert_eq!(reloaded.view_mode, ViewMode::Table);
        assert!(!reloaded.use_virtualization);
        assert_eq!(reloaded.sort_settings.primary, SortField::asc("price"));
        assert!(b.save_preferences().is_ok());
    }

    #[test]
    fn query_keeps_fields() {
        let mut b = browser(20);
        b.set_query("0007");
        assert_eq!(ids(&b), [13]);
        b.set_query("");
        assert_eq!(b.len(), 20);
        assert_eq!(b.filter().fields, ["name"]);
    }
}
