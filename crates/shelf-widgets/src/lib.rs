#![forbid(unsafe_code)]

//! Windowed containers and record utilities.
//!
//! # Windowing
//!
//! - [`range`]: the pure range calculator and the [`Window`](range::Window) it feeds
//! - [`virtualized`]: [`WindowedList`](virtualized::WindowedList), one row per record
//! - [`table`]: [`WindowedTable`](table::WindowedTable), a list with a column layout and header
//! - [`grid`]: [`WindowedGrid`](grid::WindowedGrid), rows of cards with a responsive column count
//!
//! # Records
//!
//! - [`record`]: the [`Record`](record::Record) trait and [`FieldValue`](record::FieldValue)
//! - [`sort`]: multi-field sorting with type-aware comparison
//! - [`filter`]: text query and typed predicates
//! - [`selection`]: the selected-id set that list, table and grid share

pub mod error;
pub mod filter;
pub mod grid;
pub mod range;
pub mod record;
pub mod selection;
pub mod sort;
pub mod table;
pub mod virtualized;

pub use error::LayoutError;
pub use range::{ItemExtent, VisibleRange, Window, compute_visible_range};
