#![forbid(unsafe_code)]

//! Errors raised while configuring windowed containers.

use std::fmt;

/// Invalid layout configuration.
///
/// Only construction can fail. Once a container exists, every computation on
/// it clamps instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A row or card height of zero pixels.
    ZeroItemHeight,
    /// A breakpoint table entry that yields zero columns.
    ZeroColumns {
        /// Width threshold of the offending entry (`None` for the fallback).
        below_width: Option<u32>,
    },
    /// Two breakpoint entries share the same width threshold.
    DuplicateBreakpoint(u32),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::ZeroItemHeight => write!(f, "item height must be at least 1px"),
            LayoutError::ZeroColumns {
                below_width: Some(w),
            } => write!(f, "breakpoint below {w}px yields zero columns"),
            LayoutError::ZeroColumns { below_width: None } => {
                write!(f, "fallback column count must be at least 1")
            }
            LayoutError::DuplicateBreakpoint(w) => write!(f, "duplicate breakpoint at {w}px"),
        }
    }
}

impl std::error::Error for LayoutError {}
