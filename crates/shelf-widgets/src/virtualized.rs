#![forbid(unsafe_code)]

//! Windowed list container.
//!
//! [`WindowedList`] bridges the [range calculator](crate::range) to a
//! rendering tree. It tracks the viewport of the element it is attached to,
//! recomputes the visible range when the viewport or the collection changes,
//! and hands out the materialized slice plus spacer heights.
//!
//! # Lifecycle
//!
//! ```
//! use shelf_core::geometry::Size;
//! use shelf_core::scroll_source::ScrollSource;
//! use shelf_widgets::range::ItemExtent;
//! use shelf_widgets::virtualized::WindowedList;
//!
//! let items: Vec<u32> = (0..1000).collect();
//! let source = ScrollSource::new(Size::new(800, 600));
//! let mut list = WindowedList::new(items.len(), ItemExtent::new(60)?);
//!
//! // Mount: read the current viewport and start listening.
//! let attachment = list.attach(&source);
//!
//! source.scroll_to(3000);
//! source.scroll_to(3060);
//! // Once per animation frame:
//! assert!(list.on_frame());
//! let rows: Vec<_> = list.materialize(&items).map(|(i, _)| i).collect();
//! assert_eq!(rows.first(), Some(&46));
//!
//! // Unmount: the listener goes away with the guard.
//! drop(attachment);
//! assert_eq!(source.listener_count(), 0);
//! # Ok::<(), shelf_widgets::LayoutError>(())
//! ```
//!
//! # Shape changes
//!
//! The cached range is always clamped against the current item count, and
//! [`materialize`](WindowedList::materialize) clamps again against the slice
//! it is given. A collection that shrank between a scheduled recompute and the
//! render therefore never produces an out-of-bounds slice.

use std::cell::RefCell;
use std::rc::Rc;

use shelf_core::event::ViewportEvent;
use shelf_core::frame_coalescer::FrameCoalescer;
use shelf_core::geometry::Viewport;
use shelf_core::listener::ListenerGuard;
use shelf_core::scroll_source::ScrollSource;

use crate::range::{ItemExtent, VisibleRange, Window, compute_visible_range};

/// Rows rendered beyond each edge of the viewport unless configured otherwise.
pub const DEFAULT_OVERSCAN: usize = 5;

/// A windowed container of fixed-height rows.
#[derive(Debug)]
pub struct WindowedList {
    item_count: usize,
    item_height: ItemExtent,
    overscan: usize,
    /// Height of non-scrolling chrome (a sticky header) inside the viewport.
    inset: u32,
    viewport: Viewport,
    /// Last computed range.
    range: VisibleRange,
    /// Events received since the last frame.
    pending: Rc<RefCell<FrameCoalescer>>,
    recomputes: u64,
}

impl WindowedList {
    /// Create a container for `item_count` rows of `item_height` pixels.
    ///
    /// The viewport starts empty; call [`attach`](Self::attach) or
    /// [`set_viewport`](Self::set_viewport) before rendering.
    #[must_use]
    pub fn new(item_count: usize, item_height: ItemExtent) -> Self {
        let mut list = Self {
            item_count,
            item_height,
            overscan: DEFAULT_OVERSCAN,
            inset: 0,
            viewport: Viewport::default(),
            range: VisibleRange::EMPTY,
            pending: Rc::new(RefCell::new(FrameCoalescer::new())),
            recomputes: 0,
        };
        list.recompute();
        list
    }

    /// Set the overscan amount.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self.recompute();
        self
    }

    /// Set the initial viewport.
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self.recompute();
        self
    }

    /// Mount on a scrollable element.
    ///
    /// Reads the element's current viewport immediately, then forwards its
    /// scroll and resize events into this container's frame coalescer. The
    /// listener is detached when the returned guard is dropped.
    #[must_use = "dropping the guard immediately detaches the listener"]
    pub fn attach(&mut self, source: &ScrollSource) -> ListenerGuard {
        self.set_viewport(source.viewport());
        source.forward_to(&self.pending)
    }

    /// Queue an event for the next frame without a [`ScrollSource`].
    pub fn push_event(&self, event: ViewportEvent) {
        self.pending.borrow_mut().push(event);
    }

    /// Apply everything received since the last frame.
    ///
    /// Call once per animation frame. Returns `true` if the visible range
    /// changed.
    pub fn on_frame(&mut self) -> bool {
        let Some(update) = self.pending.borrow_mut().take() else {
            return false;
        };
        let mut viewport = self.viewport;
        if let Some(offset) = update.scroll_offset {
            viewport.scroll_offset = offset;
        }
        if let Some(size) = update.size {
            viewport.height = size.height;
        }
        shelf_core::trace!(
            coalesced = update.coalesced,
            offset = viewport.scroll_offset,
            height = viewport.height,
            "windowed list frame"
        );
        self.set_viewport(viewport)
    }

    /// Replace the viewport and recompute immediately.
    ///
    /// Returns `true` if the visible range changed.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        self.viewport = viewport;
        self.recompute()
    }

    /// Change the number of rows and recompute.
    ///
    /// Call this whenever the collection changes, including when its length
    /// stays the same but its contents were replaced. Returns `true` if the
    /// visible range changed.
    pub fn set_len(&mut self, item_count: usize) -> bool {
        self.item_count = item_count;
        self.recompute()
    }

    /// Change the row height and recompute.
    pub fn set_item_height(&mut self, item_height: ItemExtent) -> bool {
        self.item_height = item_height;
        self.recompute()
    }

    /// Change the overscan and recompute.
    pub fn set_overscan(&mut self, overscan: usize) -> bool {
        self.overscan = overscan;
        self.recompute()
    }

    pub(crate) fn set_inset(&mut self, inset: u32) -> bool {
        self.inset = inset;
        self.recompute()
    }

    fn recompute(&mut self) -> bool {
        let range = compute_visible_range(
            self.viewport.scroll_offset,
            self.body_height(),
            self.item_height,
            self.item_count,
            self.overscan,
        );
        self.recomputes += 1;
        let changed = range != self.range;
        self.range = range;
        if changed {
            shelf_core::trace!(
                start = range.start,
                end = range.end,
                items = self.item_count,
                "visible range changed"
            );
        }
        changed
    }

    /// Height of the scrolling body (viewport minus any sticky chrome).
    #[must_use]
    pub fn body_height(&self) -> u32 {
        self.viewport.height.saturating_sub(self.inset)
    }

    /// Current visible range, clamped to the current item count.
    #[must_use]
    pub fn range(&self) -> VisibleRange {
        self.range.clamp_to(self.item_count)
    }

    /// Current window: range plus spacer heights.
    #[must_use]
    pub fn window(&self) -> Window {
        Window::new(self.range, self.item_height, self.item_count)
    }

    /// Iterate the materialized rows of `items` with their absolute indices.
    ///
    /// The range is clamped against `items.len()` as well, in case the slice
    /// is shorter than the count this container last saw.
    pub fn materialize<'a, T>(
        &self,
        items: &'a [T],
    ) -> impl ExactSizeIterator<Item = (usize, &'a T)> + use<'a, T> {
        let range = self.range().clamp_to(items.len());
        let start = range.start;
        items[range.as_range()]
            .iter()
            .enumerate()
            .map(move |(offset, item)| (start + offset, item))
    }

    /// Total number of rows.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Check if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Row height.
    #[must_use]
    pub fn item_height(&self) -> ItemExtent {
        self.item_height
    }

    /// Overscan in rows.
    #[must_use]
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Last applied viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// How many times the range has been recomputed.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// Rows that fit in the body without overscan (rounded up).
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.item_height.rows_to_cover(self.body_height())
    }

    /// Full scrollable body height.
    #[must_use]
    pub fn total_height(&self) -> u64 {
        self.item_height.span(self.item_count)
    }

    /// Largest scroll offset that still fills the body.
    #[must_use]
    pub fn max_scroll_offset(&self) -> u32 {
        Viewport::with_height(self.body_height()).max_scroll_for(self.total_height())
    }

    /// Smallest scroll change that brings row `index` fully into view.
    ///
    /// Returns the current offset if the row is already visible. Indices past
    /// the end are clamped to the last row.
    #[must_use]
    pub fn scroll_offset_for(&self, index: usize) -> u32 {
        if self.item_count == 0 {
            return 0;
        }
        let index = index.min(self.item_count - 1);
        let top = self.item_height.span(index);
        let bottom = top + self.item_height.get() as u64;
        let current = self.viewport.scroll_offset as u64;
        let body = self.body_height() as u64;

        let target = if top < current {
            top
        } else if bottom > current + body {
            bottom.saturating_sub(body)
        } else {
            current
        };
        target.min(self.max_scroll_offset() as u64) as u32
    }

    /// Scroll offset one body-height further down, clamped.
    #[must_use]
    pub fn page_down_offset(&self) -> u32 {
        self.viewport
            .scroll_offset
            .saturating_add(self.body_height())
            .min(self.max_scroll_offset())
    }

    /// Scroll offset one body-height further up, clamped at zero.
    #[must_use]
    pub fn page_up_offset(&self) -> u32 {
        self.viewport.scroll_offset.saturating_sub(self.body_height())
    }

    /// Check if the viewport shows the last row.
    #[must_use]
    pub fn is_at_bottom(&self) -> bool {
        self.viewport.scroll_offset >= self.max_scroll_offset()
    }
}
