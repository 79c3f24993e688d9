#![forbid(unsafe_code)]

//! Geometric primitives for scrollable containers.
//!
//! All measurements are in pixels. Scroll offsets and heights are unsigned:
//! a negative scroll offset cannot be expressed, and hosts that report one
//! (overscroll bounce on some platforms) clamp to zero before constructing a
//! [`Viewport`].

/// The scroll state of a scrollable element.
///
/// Mutated only by scroll and resize events; the windowing algorithms read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// Distance scrolled from the top of the content.
    pub scroll_offset: u32,
    /// Height of the visible area.
    pub height: u32,
}

impl Viewport {
    /// Create a new viewport.
    #[inline]
    pub const fn new(scroll_offset: u32, height: u32) -> Self {
        Self {
            scroll_offset,
            height,
        }
    }

    /// Viewport at the top of the content with the given height.
    #[inline]
    pub const fn with_height(height: u32) -> Self {
        Self::new(0, height)
    }

    /// Same viewport scrolled to `offset`.
    #[inline]
    #[must_use]
    pub const fn scrolled_to(self, offset: u32) -> Self {
        Self::new(offset, self.height)
    }

    /// Same viewport with a new height.
    #[inline]
    #[must_use]
    pub const fn resized(self, height: u32) -> Self {
        Self::new(self.scroll_offset, height)
    }

    /// Bottom edge of the visible area (exclusive), in content coordinates.
    #[inline]
    pub const fn bottom(&self) -> u64 {
        self.scroll_offset as u64 + self.height as u64
    }

    /// Check if the viewport shows nothing.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.height == 0
    }

    /// Largest valid scroll offset for content of the given total height.
    #[inline]
    pub const fn max_scroll_for(&self, content_height: u64) -> u32 {
        let max = content_height.saturating_sub(self.height as u64);
        if max > u32::MAX as u64 {
            u32::MAX
        } else {
            max as u32
        }
    }

    /// Clamp the scroll offset so the viewport stays within the content.
    #[inline]
    #[must_use]
    pub const fn clamped_to(self, content_height: u64) -> Self {
        let max = self.max_scroll_for(content_height);
        let offset = if self.scroll_offset > max {
            max
        } else {
            self.scroll_offset
        };
        Self::new(offset, self.height)
    }
}

/// Width and height of a container's client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
