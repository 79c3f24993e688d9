#![forbid(unsafe_code)]

//! Core: viewport geometry, scroll/resize events, frame coalescing, and
//! scoped listener registration.
//!
//! Nothing in this crate renders. It models the inputs a windowed container
//! reacts to: the scrollable element ([`scroll_source::ScrollSource`]), the
//! events it emits ([`event::ViewportEvent`]), and the per-frame batching of
//! those events ([`frame_coalescer::FrameCoalescer`]).

pub mod event;
pub mod frame_coalescer;
pub mod geometry;
pub mod listener;
pub mod logging;
pub mod scroll_source;
