#![forbid(unsafe_code)]

//! Windowed grid container.
//!
//! Cards are laid out row-major in a responsive number of columns. The column
//! count comes from the container width through a [`ColumnBreakpoints`] table;
//! the range calculator then runs over *rows*, and each materialized row yields
//! up to `columns` cards (the last row may be partial).
//!
//! | Container width | Columns (default) |
//! |-----------------|-------------------|
//! | < 640px         | 2                 |
//! | 640–767px       | 3                 |
//! | 768–1023px      | 4                 |
//! | ≥ 1024px        | 5                 |

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use shelf_core::event::ViewportEvent;
use shelf_core::frame_coalescer::FrameCoalescer;
use shelf_core::geometry::{Size, Viewport};
use shelf_core::listener::ListenerGuard;
use shelf_core::scroll_source::ScrollSource;

use crate::error::LayoutError;
use crate::range::{ItemExtent, VisibleRange, Window};
use crate::virtualized::WindowedList;

/// Width-to-column-count table.
///
/// Entries are `(below_width, columns)`: a container narrower than
/// `below_width` gets `columns`. The first matching entry in ascending width
/// order wins; wider containers get the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBreakpoints {
    entries: Vec<(u32, usize)>,
    fallback: usize,
}

impl Default for ColumnBreakpoints {
    fn default() -> Self {
        Self {
            entries: vec![(640, 2), (768, 3), (1024, 4)],
            fallback: 5,
        }
    }
}

impl ColumnBreakpoints {
    /// Build a table. Entries may be given in any order.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ZeroColumns`] if any entry or the fallback has
    /// zero columns, and [`LayoutError::DuplicateBreakpoint`] if two entries
    /// share a width.
    pub fn new(
        entries: impl IntoIterator<Item = (u32, usize)>,
        fallback: usize,
    ) -> Result<Self, LayoutError> {
        if fallback == 0 {
            return Err(LayoutError::ZeroColumns { below_width: None });
        }
        let mut entries: Vec<(u32, usize)> = entries.into_iter().collect();
        entries.sort_by_key(|&(width, _)| width);
        for pair in entries.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(LayoutError::DuplicateBreakpoint(pair[0].0));
            }
        }
        if let Some(&(width, _)) = entries.iter().find(|&&(_, cols)| cols == 0) {
            return Err(LayoutError::ZeroColumns {
                below_width: Some(width),
            });
        }
        Ok(Self { entries, fallback })
    }

    /// A single fixed column count at every width.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ZeroColumns`] if `columns` is zero.
    pub fn fixed(columns: usize) -> Result<Self, LayoutError> {
        Self::new([], columns)
    }

    /// Column count for a container `width` pixels wide.
    #[must_use]
    pub fn columns_for_width(&self, width: u32) -> usize {
        self.entries
            .iter()
            .find(|&&(below, _)| width < below)
            .map_or(self.fallback, |&(_, cols)| cols)
    }

    /// Entries in ascending width order.
    #[must_use]
    pub fn entries(&self) -> &[(u32, usize)] {
        &self.entries
    }

    /// Column count above the widest entry.
    #[must_use]
    pub fn fallback(&self) -> usize {
        self.fallback
    }
}

/// Row and column of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub column: usize,
}

/// Position of flat `index` in a grid of `columns` columns.
///
/// A column count of zero is treated as one.
#[must_use]
pub const fn grid_position(index: usize, columns: usize) -> GridPosition {
    let columns = if columns == 0 { 1 } else { columns };
    GridPosition {
        row: index / columns,
        column: index % columns,
    }
}

/// Number of rows needed for `item_count` cards.
#[must_use]
pub const fn row_count(item_count: usize, columns: usize) -> usize {
    let columns = if columns == 0 { 1 } else { columns };
    item_count.div_ceil(columns)
}

/// One materialized grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRow<'a, T> {
    /// Zero-based row index.
    pub row: usize,
    /// Flat index of the first card in this row.
    pub first_index: usize,
    /// Cards in this row, at most `columns` of them.
    pub items: &'a [T],
}

/// A windowed container of fixed-height card rows.
#[derive(Debug)]
pub struct WindowedGrid {
    item_count: usize,
    breakpoints: ColumnBreakpoints,
    width: u32,
    columns: usize,
    /// Virtualizes over rows, not cards.
    rows: WindowedList,
    pending: Rc<RefCell<FrameCoalescer>>,
}

impl WindowedGrid {
    /// Create a grid of `item_count` cards in rows of `row_height` pixels,
    /// using the default breakpoints.
    #[must_use]
    pub fn new(item_count: usize, row_height: ItemExtent) -> Self {
        let breakpoints = ColumnBreakpoints::default();
        let columns = breakpoints.columns_for_width(0);
        Self {
            item_count,
            breakpoints,
            width: 0,
            columns,
            rows: WindowedList::new(row_count(item_count, columns), row_height),
            pending: Rc::new(RefCell::new(FrameCoalescer::new())),
        }
    }

    /// Use a custom breakpoint table.
    #[must_use]
    pub fn with_breakpoints(mut self, breakpoints: ColumnBreakpoints) -> Self {
        self.breakpoints = breakpoints;
        self.relayout();
        self
    }

    /// Set the overscan in rows.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.rows.set_overscan(overscan);
        self
    }

    /// Set the initial container size.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.set_size(size);
        self
    }

    /// Mount on a scrollable element.
    ///
    /// Reads the element's size and scroll offset, then forwards its events
    /// into this grid's frame coalescer.
    #[must_use = "dropping the guard immediately detaches the listener"]
    pub fn attach(&mut self, source: &ScrollSource) -> ListenerGuard {
        self.width = source.size().width;
        self.columns = self.breakpoints.columns_for_width(self.width);
        self.rows.set_len(row_count(self.item_count, self.columns));
        self.rows.set_viewport(source.viewport());
        source.forward_to(&self.pending)
    }

    /// Queue an event for the next frame.
    pub fn push_event(&self, event: ViewportEvent) {
        self.pending.borrow_mut().push(event);
    }

    /// Apply everything received since the last frame.
    ///
    /// Returns `true` if the column count or the visible rows changed.
    pub fn on_frame(&mut self) -> bool {
        let Some(update) = self.pending.borrow_mut().take() else {
            return false;
        };
        let mut changed = false;
        let mut viewport = self.rows.viewport();
        if let Some(size) = update.size {
            changed |= self.set_width(size.width);
            viewport.height = size.height;
        }
        if let Some(offset) = update.scroll_offset {
            viewport.scroll_offset = offset;
        }
        shelf_core::trace!(
            coalesced = update.coalesced,
            columns = self.columns,
            offset = viewport.scroll_offset,
            "windowed grid frame"
        );
        self.rows.set_viewport(viewport) | changed
    }

    /// Apply a new container size immediately.
    pub fn set_size(&mut self, size: Size) -> bool {
        let columns_changed = self.set_width(size.width);
        let mut viewport = self.rows.viewport();
        viewport.height = size.height;
        self.rows.set_viewport(viewport) | columns_changed
    }

    /// Apply a new container width. Returns `true` if the column count changed.
    pub fn set_width(&mut self, width: u32) -> bool {
        self.width = width;
        self.relayout()
    }

    /// Replace the vertical viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        self.rows.set_viewport(viewport)
    }

    /// Change the number of cards and recompute.
    pub fn set_len(&mut self, item_count: usize) -> bool {
        self.item_count = item_count;
        self.rows.set_len(row_count(item_count, self.columns))
    }

    fn relayout(&mut self) -> bool {
        let columns = self.breakpoints.columns_for_width(self.width);
        if columns == self.columns {
            return false;
        }
        shelf_core::debug!(
            width = self.width,
            from = self.columns,
            to = columns,
            "grid column count changed"
        );
        self.columns = columns;
        self.rows.set_len(row_count(self.item_count, columns));
        true
    }

    /// Current column count.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Container width last applied.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Total number of cards.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.item_count()
    }

    /// Visible rows.
    #[must_use]
    pub fn range(&self) -> VisibleRange {
        self.rows.range()
    }

    /// Flat card indices covered by the visible rows.
    #[must_use]
    pub fn item_range(&self) -> Range<usize> {
        let rows = self.range();
        let start = (rows.start * self.columns).min(self.item_count);
        let end = (rows.end * self.columns).min(self.item_count);
        start..end
    }

    /// Row window with spacer heights.
    #[must_use]
    pub fn window(&self) -> Window {
        self.rows.window()
    }

    /// The underlying row container.
    #[must_use]
    pub fn rows(&self) -> &WindowedList {
        &self.rows
    }

    /// Position of card `index`.
    #[must_use]
    pub fn position_of(&self, index: usize) -> GridPosition {
        grid_position(index, self.columns)
    }

    /// Smallest scroll change that brings card `index` into view.
    #[must_use]
    pub fn scroll_offset_for(&self, index: usize) -> u32 {
        self.rows.scroll_offset_for(self.position_of(index).row)
    }

    /// Iterate the materialized rows of `items`.
    ///
    /// Clamped against `items.len()` in case the slice is shorter than the
    /// count this grid last saw.
    pub fn materialize<'a, T>(
        &self,
        items: &'a [T],
    ) -> impl Iterator<Item = GridRow<'a, T>> + use<'a, T> {
        let columns = self.columns;
        let rows = self.range();
        let len = items.len();
        (rows.start..rows.end)
            .map(move |row| {
                let start = (row * columns).min(len);
                let end = (start + columns).min(len);
                GridRow {
                    row,
                    first_index: start,
                    items: &items[start..end],
                }
            })
            .take_while(|row| !row.items.is_empty())
    }
}
