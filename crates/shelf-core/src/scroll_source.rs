#![forbid(unsafe_code)]

//! The scrollable element a windowed container watches.
//!
//! [`ScrollSource`] is the host-side handle for one scrollable element: the
//! host's platform glue calls [`scroll_to`](ScrollSource::scroll_to) and
//! [`resize`](ScrollSource::resize) from its native event handlers, and
//! containers subscribe to the resulting [`ViewportEvent`]s.
//!
//! Containers do not recompute inside the listener. They forward events into
//! a shared [`FrameCoalescer`] (see [`ScrollSource::forward_to`]) and drain it
//! once per animation frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::event::ViewportEvent;
use crate::frame_coalescer::FrameCoalescer;
use crate::geometry::{Size, Viewport};
use crate::listener::{ListenerGuard, ListenerSet};

/// A scrollable element with observable scroll and size changes.
#[derive(Debug)]
pub struct ScrollSource {
    scroll_offset: Cell<u32>,
    size: Cell<Size>,
    /// Known total content height; scroll offsets are clamped against it.
    content_height: Cell<Option<u64>>,
    listeners: ListenerSet<ViewportEvent>,
}

impl ScrollSource {
    /// Create a source with the given client size, scrolled to the top.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            scroll_offset: Cell::new(0),
            size: Cell::new(size),
            content_height: Cell::new(None),
            listeners: ListenerSet::new(),
        }
    }

    /// Current vertical viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.scroll_offset.get(), self.size.get().height)
    }

    /// Current client size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size.get()
    }

    /// Record the total scrollable height so later scrolls are clamped to it.
    ///
    /// If the current offset lies past the new end, the element scrolls back
    /// and listeners are notified, matching how a browser reacts when the
    /// scroll height shrinks.
    pub fn set_content_height(&self, height: u64) {
        self.content_height.set(Some(height));
        let clamped = self.viewport().clamped_to(height).scroll_offset;
        if clamped != self.scroll_offset.get() {
            self.scroll_offset.set(clamped);
            self.listeners.emit(&ViewportEvent::scroll(clamped));
        }
    }

    /// Scroll to an absolute offset and notify listeners.
    ///
    /// Returns the offset actually applied after clamping.
    pub fn scroll_to(&self, offset: u32) -> u32 {
        let offset = match self.content_height.get() {
            Some(height) => self.viewport().scrolled_to(offset).clamped_to(height).scroll_offset,
            None => offset,
        };
        self.scroll_offset.set(offset);
        self.listeners.emit(&ViewportEvent::scroll(offset));
        offset
    }

    /// Scroll by a signed delta (positive = down).
    pub fn scroll_by(&self, delta: i64) -> u32 {
        let target = (self.scroll_offset.get() as i64 + delta).clamp(0, u32::MAX as i64);
        self.scroll_to(target as u32)
    }

    /// Change the client size and notify listeners.
    pub fn resize(&self, size: Size) {
        self.size.set(size);
        self.listeners.emit(&ViewportEvent::Resize(size));
        if let Some(height) = self.content_height.get() {
            self.set_content_height(height);
        }
    }

    /// Subscribe a callback to this element's events.
    #[must_use = "dropping the guard immediately detaches the listener"]
    pub fn subscribe(&self, callback: impl FnMut(&ViewportEvent) + 'static) -> ListenerGuard {
        self.listeners.subscribe(callback)
    }

    /// Forward every event into a shared coalescer.
    ///
    /// This is how containers attach: the listener only records the event,
    /// and the container applies it on the next frame.
    #[must_use = "dropping the guard immediately detaches the listener"]
    pub fn forward_to(&self, pending: &Rc<RefCell<FrameCoalescer>>) -> ListenerGuard {
        let pending = Rc::clone(pending);
        self.listeners.subscribe(move |event| {
            if let Ok(mut coalescer) = pending.try_borrow_mut() {
                coalescer.push(*event);
            }
        })
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
