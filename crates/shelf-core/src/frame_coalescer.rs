#![forbid(unsafe_code)]

//! Per-frame coalescing of scroll and resize events.
//!
//! A scrollable element can fire dozens of scroll events between two
//! animation frames. Recomputing the visible window for each one is wasted
//! work: only the state at frame time is ever rendered.
//!
//! [`FrameCoalescer`] keeps the latest pending scroll offset and the latest
//! pending size. The host calls [`FrameCoalescer::take`] once per animation
//! frame and applies the returned [`FrameUpdate`], so a container recomputes
//! at most once per frame no matter how many events arrived.
//!
//! # Usage
//!
//! ```
//! use shelf_core::event::ViewportEvent;
//! use shelf_core::frame_coalescer::FrameCoalescer;
//!
//! let mut coalescer = FrameCoalescer::new();
//! coalescer.push(ViewportEvent::scroll(100));
//! coalescer.push(ViewportEvent::scroll(160));
//! coalescer.push(ViewportEvent::scroll(220));
//!
//! let update = coalescer.take().unwrap();
//! assert_eq!(update.scroll_offset, Some(220));
//! assert_eq!(update.coalesced, 2);
//! assert!(coalescer.take().is_none());
//! ```

use crate::event::ViewportEvent;
use crate::geometry::Size;

/// Latest-wins accumulator for viewport events.
///
/// Not thread-safe; use it from the event loop that owns the container.
/// All operations are O(1).
#[derive(Debug, Clone, Default)]
pub struct FrameCoalescer {
    pending_scroll: Option<u32>,
    pending_size: Option<Size>,
    /// Events absorbed into the pending state since the last take.
    coalesced: u32,
    /// Total frames handed out.
    frames: u64,
}

/// The net effect of all events received since the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameUpdate {
    /// Latest scroll offset, if any scroll happened.
    pub scroll_offset: Option<u32>,
    /// Latest size, if any resize happened.
    pub size: Option<Size>,
    /// Number of events that were superseded by a later one.
    pub coalesced: u32,
}

impl FrameCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event. A later event of the same kind replaces the earlier one.
    pub fn push(&mut self, event: ViewportEvent) {
        match event {
            ViewportEvent::Scroll { offset } => {
                if self.pending_scroll.replace(offset).is_some() {
                    self.coalesced = self.coalesced.saturating_add(1);
                }
            }
            ViewportEvent::Resize(size) => {
                if self.pending_size.replace(size).is_some() {
                    self.coalesced = self.coalesced.saturating_add(1);
                }
            }
        }
    }

    /// Drain the pending state for this frame.
    ///
    /// Returns `None` when nothing happened since the last call, so callers
    /// can skip the recompute entirely.
    pub fn take(&mut self) -> Option<FrameUpdate> {
        if !self.has_pending() {
            return None;
        }
        let update = FrameUpdate {
            scroll_offset: self.pending_scroll.take(),
            size: self.pending_size.take(),
            coalesced: std::mem::take(&mut self.coalesced),
        };
        self.frames += 1;
        Some(update)
    }

    /// Check whether an update is waiting for the next frame.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_scroll.is_some() || self.pending_size.is_some()
    }

    /// Number of frames handed out by [`take`](Self::take).
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Discard pending events without applying them.
    pub fn clear(&mut self) {
        self.pending_scroll = None;
        self.pending_size = None;
        self.coalesced = 0;
    }
}
