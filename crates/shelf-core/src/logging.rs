#![forbid(unsafe_code)]

//! Container logging.
//!
//! Windowed containers log recomputes and relayouts through
//! [`trace!`](crate::trace), [`debug!`](crate::debug) and
//! [`warn!`](crate::warn). With the `tracing` feature each one forwards to
//! the matching `tracing` macro under the [`TARGET`] target, so hosts can
//! filter window churn with `SHELF_LOG=shelf::window=trace`. Without the
//! feature they expand to nothing and the widget crates carry no logging
//! dependency.

/// Target every container event is logged under.
pub const TARGET: &str = "shelf::window";

#[cfg(feature = "tracing")]
#[doc(hidden)]
pub use tracing as __tracing;

#[cfg(feature = "tracing")]
#[doc(hidden)]
#[macro_export]
macro_rules! __window_event {
    ($level:ident, $($arg:tt)+) => {
        $crate::logging::__tracing::$level!(target: $crate::logging::TARGET, $($arg)+)
    };
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __window_event {
    ($level:ident, $($arg:tt)+) => {};
}

/// Per-frame detail: coalesced events, recomputed ranges.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => {
        $crate::__window_event!(trace, $($arg)+)
    };
}

/// Layout changes: column counts, collection resizes.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::__window_event!(debug, $($arg)+)
    };
}

/// Recoverable misconfiguration.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::__window_event!(warn, $($arg)+)
    };
}
