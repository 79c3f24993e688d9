#![forbid(unsafe_code)]

//! Records as seen by the sort and filter utilities.
//!
//! Windowing treats records as opaque. Sorting and filtering need to read
//! named fields, which they do through [`Record::field`]. Field values are
//! dynamically typed ([`FieldValue`]) because the collections come from a
//! remote API whose schema the UI does not own.

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue<'a> {
    /// Missing or null.
    #[default]
    Null,
    /// A boolean flag.
    Bool(bool),
    /// Any number.
    Number(f64),
    /// Text, including ISO-8601 timestamps.
    Text(Cow<'a, str>),
}

impl<'a> FieldValue<'a> {
    /// Borrowed text value.
    #[must_use]
    pub fn text(s: &'a str) -> Self {
        Self::Text(Cow::Borrowed(s))
    }

    /// Check for [`FieldValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view: numbers as-is, booleans as 0/1.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(b) => Some(f64::from(u8::from(*b))),
            _ => None,
        }
    }

    /// Text view, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Detach from the record the value was borrowed from.
    #[must_use]
    pub fn into_owned(self) -> FieldValue<'static> {
        match self {
            Self::Null => FieldValue::Null,
            Self::Bool(b) => FieldValue::Bool(b),
            Self::Number(n) => FieldValue::Number(n),
            Self::Text(s) => FieldValue::Text(Cow::Owned(s.into_owned())),
        }
    }

    /// String representation used for fallback comparison and text search.
    ///
    /// Null renders as the empty string.
    #[must_use]
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed(""),
            Self::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Self::Number(n) => Cow::Owned(format_number(*n)),
            Self::Text(s) => Cow::Borrowed(s),
        }
    }
}

/// Integral floats print without a fractional part (`5`, not `5.0`).
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u32> for FieldValue<'_> {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(Cow::Borrowed(s))
    }
}

impl From<String> for FieldValue<'_> {
    fn from(s: String) -> Self {
        Self::Text(Cow::Owned(s))
    }
}

impl<'a, T: Into<FieldValue<'a>>> From<Option<T>> for FieldValue<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// An element of a sortable, filterable collection.
pub trait Record {
    /// Stable unique identifier, used by selection.
    type Id: Clone + Eq + Hash;

    /// This record's identifier.
    fn id(&self) -> Self::Id;

    /// Read a named field. Unknown fields are [`FieldValue::Null`].
    fn field(&self, name: &str) -> FieldValue<'_>;
}
