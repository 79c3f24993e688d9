#![forbid(unsafe_code)]

//! Visible-range calculation for fixed-height rows.
//!
//! [`compute_visible_range`] maps a scroll position to the contiguous slice of
//! rows that must be materialized. It is a pure function of its five inputs,
//! performs no allocation, and is cheap enough to call on every frame.
//!
//! # Formula
//!
//! With `first = floor(scroll_offset / item_height)` (the true first visible
//! row) and `visible = ceil(viewport_height / item_height)`:
//!
//! ```text
//! start = max(0, first - overscan)
//! end   = min(item_count, first + visible + overscan)
//! ```
//!
//! `end` is based on `first`, not on the overscan-expanded `start`, so the
//! overscan margin is added symmetrically on both sides.
//!
//! # Invariants
//!
//! 1. `0 <= start <= end <= item_count` for every input.
//! 2. `end - start >= visible` whenever `item_count` leaves room for it.
//! 3. Identical inputs give identical outputs.
//!
//! A zero row height is not representable: [`ItemExtent::new`] rejects it.

use std::num::NonZeroU32;
use std::ops::Range;

use crate::error::LayoutError;

/// A row height in pixels, guaranteed non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemExtent(NonZeroU32);

impl ItemExtent {
    /// Validate a row height.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ZeroItemHeight`] for `0`.
    pub const fn new(px: u32) -> Result<Self, LayoutError> {
        match NonZeroU32::new(px) {
            Some(px) => Ok(Self(px)),
            None => Err(LayoutError::ZeroItemHeight),
        }
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Total height of `count` rows.
    #[inline]
    #[must_use]
    pub const fn span(self, count: usize) -> u64 {
        self.0.get() as u64 * count as u64
    }

    /// Index of the row containing the pixel at `offset`.
    #[inline]
    #[must_use]
    pub const fn row_at(self, offset: u32) -> usize {
        (offset / self.0.get()) as usize
    }

    /// Number of rows needed to cover `height` pixels (rounded up).
    #[inline]
    #[must_use]
    pub const fn rows_to_cover(self, height: u32) -> usize {
        height.div_ceil(self.0.get()) as usize
    }
}

impl TryFrom<u32> for ItemExtent {
    type Error = LayoutError;

    fn try_from(px: u32) -> Result<Self, Self::Error> {
        Self::new(px)
    }
}

/// Half-open range of row indices `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VisibleRange {
    /// First materialized row.
    pub start: usize,
    /// One past the last materialized row.
    pub end: usize,
}

impl VisibleRange {
    /// The empty range at zero.
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    /// Create a range. Callers pass `start <= end`.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of rows in the range.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the range is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if `index` falls inside the range.
    #[inline]
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Clamp the range against a collection of `len` rows.
    ///
    /// Used when the collection shrank after the range was computed.
    #[inline]
    #[must_use]
    pub const fn clamp_to(self, len: usize) -> Self {
        let end = if self.end > len { len } else { self.end };
        let start = if self.start > end { end } else { self.start };
        Self { start, end }
    }

    /// As a standard range, for slicing.
    #[inline]
    #[must_use]
    pub const fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<VisibleRange> for Range<usize> {
    fn from(r: VisibleRange) -> Self {
        r.as_range()
    }
}

/// Compute the rows to materialize for a scroll position.
///
/// See the [module docs](self) for the formula and invariants.
#[must_use]
pub const fn compute_visible_range(
    scroll_offset: u32,
    viewport_height: u32,
    item_height: ItemExtent,
    item_count: usize,
    overscan: usize,
) -> VisibleRange {
    if item_count == 0 {
        return VisibleRange::EMPTY;
    }

    let first = item_height.row_at(scroll_offset);
    let visible = item_height.rows_to_cover(viewport_height);

    let start = first.saturating_sub(overscan);
    let unclamped_end = first.saturating_add(visible).saturating_add(overscan);
    let end = if unclamped_end > item_count {
        item_count
    } else {
        unclamped_end
    };
    // Scrolled past the end: collapse onto `end` rather than invert.
    let start = if start > end { end } else { start };

    VisibleRange { start, end }
}

/// A visible range plus the spacer heights that surround it.
///
/// Rendering a window means: a leading spacer of [`leading_spacer`]
/// pixels (or a translate by [`translate_offset`] for absolutely positioned
/// rows), the rows in [`range`], then a trailing spacer of
/// [`trailing_spacer`] pixels. The three always add up to
/// [`total_height`], so the scrollbar is stable whatever slice is shown.
///
/// [`leading_spacer`]: Window::leading_spacer
/// [`translate_offset`]: Window::translate_offset
/// [`range`]: Window::range
/// [`trailing_spacer`]: Window::trailing_spacer
/// [`total_height`]: Window::total_height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Rows to materialize.
    pub range: VisibleRange,
    /// Height reserved above the materialized rows.
    pub leading_spacer: u64,
    /// Height reserved below the materialized rows.
    pub trailing_spacer: u64,
    /// Height of one row.
    pub item_height: ItemExtent,
    /// Rows in the whole collection.
    pub item_count: usize,
}

impl Window {
    /// Build the window for `range` over `item_count` rows.
    ///
    /// The range is clamped to `item_count` first.
    #[must_use]
    pub const fn new(range: VisibleRange, item_height: ItemExtent, item_count: usize) -> Self {
        let range = range.clamp_to(item_count);
        Self {
            range,
            leading_spacer: item_height.span(range.start),
            trailing_spacer: item_height.span(item_count - range.end),
            item_height,
            item_count,
        }
    }

    /// Height of the materialized rows.
    #[must_use]
    pub const fn materialized_height(&self) -> u64 {
        self.item_height.span(self.range.len())
    }

    /// Full scrollable height: `item_count * item_height`.
    #[must_use]
    pub const fn total_height(&self) -> u64 {
        self.item_height.span(self.item_count)
    }

    /// Vertical translation for layouts that position the materialized block
    /// absolutely instead of using a leading spacer.
    #[must_use]
    pub const fn translate_offset(&self) -> u64 {
        self.leading_spacer
    }

    /// Top offset of row `index`, in content coordinates.
    #[must_use]
    pub const fn row_top(&self, index: usize) -> u64 {
        self.item_height.span(index)
    }
}
