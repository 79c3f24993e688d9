#![forbid(unsafe_code)]

//! Windowed table container.
//!
//! A [`WindowedTable`] is a [`WindowedList`] with a column layout and a sticky
//! header. The header occupies the top of the viewport and is not part of the
//! scrolled body, so the range calculator sees `viewport height - header
//! height`.

use serde::{Deserialize, Serialize};
use shelf_core::geometry::Viewport;
use shelf_core::listener::ListenerGuard;
use shelf_core::scroll_source::ScrollSource;

use crate::range::{ItemExtent, VisibleRange, Window};
use crate::record::{FieldValue, Record};
use crate::sort::SortConfig;
use crate::virtualized::WindowedList;

/// Default sticky header height in pixels.
pub const DEFAULT_HEADER_HEIGHT: u32 = 40;

/// Narrowest a column can be resized to.
pub const MIN_COLUMN_WIDTH: u32 = 40;

/// One column of a table layout. Persisted as part of the view preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSetting {
    /// Record field shown in this column.
    pub key: String,
    /// Header label.
    pub label: String,
    /// Width in pixels.
    pub width: u32,
    /// Hidden columns keep their position and width.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl ColumnSetting {
    /// A visible column.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, width: u32) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width: width.max(MIN_COLUMN_WIDTH),
            visible: true,
        }
    }

    /// Same column, hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Ordered column settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnLayout {
    columns: Vec<ColumnSetting>,
}

impl ColumnLayout {
    /// Layout from settings in display order.
    #[must_use]
    pub fn new(columns: Vec<ColumnSetting>) -> Self {
        Self { columns }
    }

    /// All columns, hidden ones included.
    #[must_use]
    pub fn all(&self) -> &[ColumnSetting] {
        &self.columns
    }

    /// Visible columns in display order.
    pub fn visible(&self) -> impl Iterator<Item = &ColumnSetting> {
        self.columns.iter().filter(|c| c.visible)
    }

    /// Sum of the visible column widths.
    #[must_use]
    pub fn total_width(&self) -> u64 {
        self.visible().map(|c| c.width as u64).sum()
    }

    /// Look up a column by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ColumnSetting> {
        self.columns.iter().find(|c| c.key == key)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// Show or hide a column. Returns the new visibility, or `None` for an
    /// unknown key.
    ///
    /// The last visible column cannot be hidden.
    pub fn toggle_visibility(&mut self, key: &str) -> Option<bool> {
        let index = self.position(key)?;
        let visible_count = self.visible().count();
        let column = &mut self.columns[index];
        if column.visible && visible_count <= 1 {
            return Some(true);
        }
        column.visible = !column.visible;
        Some(column.visible)
    }

    /// Set a column's width, clamped to [`MIN_COLUMN_WIDTH`]. Returns the
    /// applied width.
    pub fn resize(&mut self, key: &str, width: u32) -> Option<u32> {
        let index = self.position(key)?;
        let width = width.max(MIN_COLUMN_WIDTH);
        self.columns[index].width = width;
        Some(width)
    }

    /// Move a column to position `to` (clamped). Returns `false` for an
    /// unknown key.
    pub fn move_column(&mut self, key: &str, to: usize) -> bool {
        let Some(from) = self.position(key) else {
            return false;
        };
        let column = self.columns.remove(from);
        let to = to.min(self.columns.len());
        self.columns.insert(to, column);
        true
    }
}

impl From<Vec<ColumnSetting>> for ColumnLayout {
    fn from(columns: Vec<ColumnSetting>) -> Self {
        Self::new(columns)
    }
}

/// A windowed list with a sticky header and a column layout.
#[derive(Debug)]
pub struct WindowedTable {
    list: WindowedList,
    columns: ColumnLayout,
    header_height: u32,
}

impl WindowedTable {
    /// Create a table of `item_count` rows.
    #[must_use]
    pub fn new(
        columns: impl Into<ColumnLayout>,
        item_count: usize,
        row_height: ItemExtent,
    ) -> Self {
        let mut list = WindowedList::new(item_count, row_height);
        list.set_inset(DEFAULT_HEADER_HEIGHT);
        Self {
            list,
            columns: columns.into(),
            header_height: DEFAULT_HEADER_HEIGHT,
        }
    }

    /// Set the sticky header height.
    #[must_use]
    pub fn with_header_height(mut self, height: u32) -> Self {
        self.set_header_height(height);
        self
    }

    /// Set the overscan amount.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.list.set_overscan(overscan);
        self
    }

    /// Set the initial viewport (header included).
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.list.set_viewport(viewport);
        self
    }

    /// Change the sticky header height and recompute.
    pub fn set_header_height(&mut self, height: u32) -> bool {
        self.header_height = height;
        self.list.set_inset(height)
    }

    /// Sticky header height.
    #[must_use]
    pub fn header_height(&self) -> u32 {
        self.header_height
    }

    /// Mount on a scrollable element. See [`WindowedList::attach`].
    #[must_use = "dropping the guard immediately detaches the listener"]
    pub fn attach(&mut self, source: &ScrollSource) -> ListenerGuard {
        self.list.attach(source)
    }

    /// Apply events received since the last frame.
    pub fn on_frame(&mut self) -> bool {
        self.list.on_frame()
    }

    /// Replace the viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        self.list.set_viewport(viewport)
    }

    /// Change the row count.
    pub fn set_len(&mut self, item_count: usize) -> bool {
        self.list.set_len(item_count)
    }

    /// The underlying row container.
    #[must_use]
    pub fn list(&self) -> &WindowedList {
        &self.list
    }

    /// Mutable access to the underlying row container.
    pub fn list_mut(&mut self) -> &mut WindowedList {
        &mut self.list
    }

    /// Column layout.
    #[must_use]
    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    /// Mutable column layout.
    pub fn columns_mut(&mut self) -> &mut ColumnLayout {
        &mut self.columns
    }

    /// Replace the column layout.
    pub fn set_columns(&mut self, columns: impl Into<ColumnLayout>) {
        self.columns = columns.into();
    }

    /// Current visible row range.
    #[must_use]
    pub fn range(&self) -> VisibleRange {
        self.list.range()
    }

    /// Current window of body rows.
    #[must_use]
    pub fn window(&self) -> Window {
        self.list.window()
    }

    /// Iterate the materialized rows with their absolute indices.
    pub fn materialize<'a, T>(
        &self,
        items: &'a [T],
    ) -> impl ExactSizeIterator<Item = (usize, &'a T)> + use<'a, T> {
        self.list.materialize(items)
    }

    /// Cell values of `record` for the visible columns, in display order.
    pub fn cells<'r, R: Record + ?Sized>(
        &self,
        record: &'r R,
    ) -> impl Iterator<Item = (&ColumnSetting, FieldValue<'r>)> {
        self.columns.visible().map(move |c| (c, record.field(&c.key)))
    }

    /// Header click on `key`: toggles the sort if the column exists.
    ///
    /// Returns `true` if `sort` changed.
    pub fn header_click(&self, key: &str, sort: &mut SortConfig) -> bool {
        if self.columns.get(key).is_none() {
            return false;
        }
        sort.toggle(key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{SortField, SortOrder};

    fn px(h: u32) -> ItemExtent {
        ItemExtent::new(h).unwrap()
    }

    fn columns() -> Vec<ColumnSetting> {
        vec![
            ColumnSetting::new("name", "Name", 200),
            ColumnSetting::new("sku", "SKU", 120),
            ColumnSetting::new("price", "Price", 80).hidden(),
        ]
    }

    struct Row {
        name: &'static str,
        sku: &'static str,
    }

    impl Record for Row {
        type Id = &'static str;

        fn id(&self) -> &'static str {
            self.sku
        }

        fn field(&self, name: &str) -> FieldValue<'_> {
            match name {
                "name" => self.name.into(),
                "sku" => self.sku.into(),
                _ => FieldValue::Null,
            }
        }
    }

    #[test]
    fn header_is_excluded_from_body() {
        let table = WindowedTable::new(columns(), 1000, px(40))
            .with_header_height(40)
            .with_viewport(Viewport::new(0, 440));
        // 400px body / 40px rows = 10 visible, + 5 overscan.
        assert_eq!(table.range(), VisibleRange::new(0, 15));
        assert_eq!(table.list().body_height(), 400);
    }

    #[test]
    fn header_change_recomputes() {
        let mut table = WindowedTable::new(columns(), 1000, px(40))
            .with_overscan(0)
            .with_header_height(0)
            .with_viewport(Viewport::new(0, 400));
        assert_eq!(table.range(), VisibleRange::new(0, 10));
        assert!(table.set_header_height(200));
        assert_eq!(table.range(), VisibleRange::new(0, 5));
    }

    #[test]
    fn total_height_ignores_header() {
        let table = WindowedTable::new(columns(), 25, px(30));
        let w = table.window();
        assert_eq!(w.leading_spacer + w.materialized_height() + w.trailing_spacer, 750);
    }

    #[test]
    fn visible_columns_and_width() {
        let layout = ColumnLayout::new(columns());
        let keys: Vec<_> = layout.visible().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["name", "sku"]);
        assert_eq!(layout.total_width(), 320);
    }

    #[test]
    fn toggle_visibility_keeps_one_column() {
        let mut layout = ColumnLayout::new(columns());
        assert_eq!(layout.toggle_visibility("price"), Some(true));
        assert_eq!(layout.toggle_visibility("name"), Some(false));
        assert_eq!(layout.toggle_visibility("sku"), Some(false));
        assert_eq!(layout.toggle_visibility("price"), Some(true), "last visible column stays");
        assert_eq!(layout.toggle_visibility("missing"), None);
    }

    #[test]
    fn resize_and_move() {
        let mut layout = ColumnLayout::new(columns());
        assert_eq!(layout.resize("sku", 10), Some(MIN_COLUMN_WIDTH));
        assert_eq!(layout.resize("nope", 100), None);
        assert!(layout.move_column("price", 0));
        assert!(layout.move_column("name", 99));
        let keys: Vec<_> = layout.all().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["price", "sku", "name"]);
        assert!(!layout.move_column("nope", 0));
    }

    #[test]
    fn cells_follow_visible_columns() {
        let table = WindowedTable::new(columns(), 1, px(30));
        let row = Row { name: "Bolt", sku: "B-1" };
        let cells: Vec<_> = table
            .cells(&row)
            .map(|(c, v)| (c.key.clone(), v.to_string()))
            .collect();
        assert_eq!(
            cells,
            [("name".to_string(), "Bolt".to_string()), ("sku".to_string(), "B-1".to_string())]
        );
        assert_eq!(row.id(), "B-1");
    }

    #[test]
    fn header_click_toggles_sort() {
        let table = WindowedTable::new(columns(), 0, px(30));
        let mut sort = SortConfig::new(SortField::asc("name"));
        assert!(table.header_click("name", &mut sort));
        assert_eq!(sort.primary.order, SortOrder::Desc);
        assert!(table.header_click("sku", &mut sort));
        assert_eq!(sort.primary, SortField::asc("sku"));
        assert!(!table.header_click("unknown", &mut sort));
        assert_eq!(sort.primary, SortField::asc("sku"));
    }

    #[test]
    fn column_settings_serde() {
        let json = serde_json::to_value(ColumnLayout::new(columns())).unwrap();
        assert_eq!(
            json[2],
            serde_json::json!({"key": "price", "label": "Price", "width": 80, "visible": false})
        );
        let back: Vec<ColumnSetting> = serde_json::from_value(serde_json::json!([
            {"key": "a", "label": "A", "width": 50}
        ]))
        .unwrap();
        assert!(back[0].visible);
    }
}
