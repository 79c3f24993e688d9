#![forbid(unsafe_code)]

//! Events emitted by a scrollable element.

use crate::geometry::Size;

/// Something changed about the scrollable element a container is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    /// The element was scrolled to a new vertical offset.
    Scroll {
        /// New scroll offset in pixels.
        offset: u32,
    },
    /// The element's client area changed size.
    Resize(Size),
}

impl ViewportEvent {
    /// Convenience constructor for a scroll event.
    #[inline]
    pub const fn scroll(offset: u32) -> Self {
        Self::Scroll { offset }
    }

    /// Convenience constructor for a resize event.
    #[inline]
    pub const fn resize(width: u32, height: u32) -> Self {
        Self::Resize(Size::new(width, height))
    }
}
