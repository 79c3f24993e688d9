#![forbid(unsafe_code)]

//! Multi-field sorting with type-aware comparison.
//!
//! A [`SortConfig`] names a primary field and an ordered list of secondary
//! tie-breakers. [`apply_sort`] returns a new, sorted sequence and leaves its
//! input untouched.
//!
//! # Comparison
//!
//! Each pair of values picks a [`CompareStrategy`] by inspecting both sides:
//!
//! | Left / right                | Strategy  |
//! |-----------------------------|-----------|
//! | bool, both sides            | `Boolean` |
//! | number or bool, both sides  | `Number` (bools as 0/1) |
//! | ISO-8601 text, both sides   | `Date`    |
//! | other text, both sides      | `String`  |
//!
//! Values of different kinds order by kind: numbers and booleans first, then
//! dates, then other text. Nulls are handled before any of this: null sorts
//! before every value in ascending order and after every value in descending
//! order. Comparison never panics.
//!
//! # Stability
//!
//! Sorting uses a stable algorithm: records that compare equal on every
//! configured field keep their input order.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, Record};

/// Direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortOrder {
    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Apply this direction to an ascending comparison result.
    #[inline]
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// One sort key: a field name and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortField {
    /// Field name passed to [`Record::field`].
    pub field: String,
    /// Direction.
    pub order: SortOrder,
}

impl SortField {
    /// Create a sort key.
    #[must_use]
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// Ascending sort key.
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    /// Descending sort key.
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Desc)
    }

    /// Compare two records on this key, direction applied.
    #[must_use]
    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        let ordering = compare_values(&a.field(&self.field), &b.field(&self.field));
        self.order.apply(ordering)
    }
}

/// A primary sort key plus ordered tie-breakers.
///
/// The primary key is always present. Secondary keys are consulted in order
/// only when every earlier key ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortConfig {
    /// Main sort key.
    pub primary: SortField,
    /// Tie-breakers, most significant first.
    #[serde(default)]
    pub secondary: Vec<SortField>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self::new(SortField::asc("name"))
    }
}

impl SortConfig {
    /// Sort by a single key.
    #[must_use]
    pub fn new(primary: SortField) -> Self {
        Self {
            primary,
            secondary: Vec::new(),
        }
    }

    /// Append a tie-breaker (builder form of [`push_secondary`](Self::push_secondary)).
    #[must_use]
    pub fn then(mut self, key: SortField) -> Self {
        self.push_secondary(key);
        self
    }

    /// Every key in evaluation order.
    pub fn keys(&self) -> impl Iterator<Item = &SortField> {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }

    /// Direction of `field` if it takes part in this sort.
    #[must_use]
    pub fn order_for(&self, field: &str) -> Option<SortOrder> {
        self.keys().find(|k| k.field == field).map(|k| k.order)
    }

    /// Append or update a tie-breaker.
    ///
    /// A key on the primary field is ignored. A key on a field that is
    /// already a tie-breaker updates its direction in place.
    pub fn push_secondary(&mut self, key: SortField) {
        if key.field == self.primary.field {
            return;
        }
        match self.secondary.iter_mut().find(|k| k.field == key.field) {
            Some(existing) => existing.order = key.order,
            None => self.secondary.push(key),
        }
    }

    /// Remove a tie-breaker. Returns `true` if it was present.
    pub fn remove_secondary(&mut self, field: &str) -> bool {
        let before = self.secondary.len();
        self.secondary.retain(|k| k.field != field);
        self.secondary.len() != before
    }

    /// Header-click behaviour.
    ///
    /// Clicking the primary field flips its direction. Clicking any other
    /// field makes it the ascending primary key and drops it from the
    /// tie-breakers. The previous primary is replaced; the remaining
    /// tie-breakers are kept in order.
    pub fn toggle(&mut self, field: &str) {
        if self.primary.field == field {
            self.primary.order = self.primary.order.reversed();
            return;
        }
        self.secondary.retain(|k| k.field != field);
        self.primary = SortField::asc(field);
    }

    /// Compare two records on every key in order.
    #[must_use]
    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        for key in self.keys() {
            let ordering = key.compare(a, b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// Sort `records` into a new vector. The input is not modified.
#[must_use]
pub fn apply_sort<R: Record + Clone>(records: &[R], config: &SortConfig) -> Vec<R> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| config.compare(a, b));
    sorted
}

/// Sort order of `records` as a permutation of their indices.
///
/// `result[k]` is the input index of the record that sorts at position `k`.
#[must_use]
pub fn sort_indices<R: Record>(records: &[R], config: &SortConfig) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..records.len()).collect();
    indices.sort_by(|&a, &b| config.compare(&records[a], &records[b]));
    indices
}

/// How a pair of non-null values is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareStrategy {
    /// Numeric comparison (booleans as 0/1 when mixed with numbers).
    Number,
    /// Parsed ISO-8601 instants.
    Date,
    /// Locale-aware text comparison.
    String,
    /// `false < true`.
    Boolean,
}

impl CompareStrategy {
    /// Strategy for a single value, `None` for null.
    #[must_use]
    pub fn of(value: &FieldValue<'_>) -> Option<Self> {
        match value {
            FieldValue::Null => None,
            FieldValue::Bool(_) => Some(CompareStrategy::Boolean),
            FieldValue::Number(_) => Some(CompareStrategy::Number),
            FieldValue::Text(s) if parse_date_like(s).is_some() => Some(CompareStrategy::Date),
            FieldValue::Text(_) => Some(CompareStrategy::String),
        }
    }

    /// Kind rank: numbers and booleans, then dates, then other text.
    const fn rank(self) -> u8 {
        match self {
            CompareStrategy::Number | CompareStrategy::Boolean => 0,
            CompareStrategy::Date => 1,
            CompareStrategy::String => 2,
        }
    }

    /// Pick the strategy for a pair of non-null values.
    ///
    /// Returns `None` when the values are of different kinds; such pairs are
    /// ordered by kind alone (numbers and booleans, then dates, then text) so
    /// that the comparison stays a total order.
    #[must_use]
    pub fn select(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Option<Self> {
        let (x, y) = (Self::of(a)?, Self::of(b)?);
        if x.rank() != y.rank() {
            return None;
        }
        Some(if x == y { x } else { CompareStrategy::Number })
    }

    /// Compare two values with this strategy, ascending.
    ///
    /// Values the strategy cannot interpret fall back to comparing their
    /// display strings.
    #[must_use]
    pub fn compare(self, a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
        let typed = match self {
            CompareStrategy::Number | CompareStrategy::Boolean => {
                match (a.as_number(), b.as_number()) {
                    (Some(x), Some(y)) => Some(compare_numbers(x, y)),
                    _ => None,
                }
            }
            CompareStrategy::Date => {
                match (
                    a.as_text().and_then(parse_date_like),
                    b.as_text().and_then(parse_date_like),
                ) {
                    (Some(x), Some(y)) => Some(x.cmp(&y)),
                    _ => None,
                }
            }
            CompareStrategy::String => None,
        };
        typed.unwrap_or_else(|| locale_compare(&a.display(), &b.display()))
    }
}

/// Compare two field values in ascending order.
///
/// Null sorts first. Same-kind pairs go through [`CompareStrategy`];
/// different kinds order by kind. The result is a total order, so it is safe
/// to hand to the standard library sorts.
#[must_use]
pub fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match (CompareStrategy::of(a), CompareStrategy::of(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) if x.rank() != y.rank() => x.rank().cmp(&y.rank()),
        (Some(x), Some(y)) => {
            let strategy = if x == y { x } else { CompareStrategy::Number };
            strategy.compare(a, b)
        }
    }
}

fn compare_numbers(x: f64, y: f64) -> Ordering {
    x.partial_cmp(&y).unwrap_or_else(|| x.total_cmp(&y))
}

/// Parse an ISO-8601-looking timestamp into milliseconds since the epoch.
///
/// Accepts RFC 3339 (`2024-03-01T12:00:00Z`, with offset or fractional
/// seconds), naive date-times with `T` or space separators (read as UTC), and
/// bare dates (`2024-03-01`, midnight UTC). Anything not shaped like
/// `YYYY-MM-DD…` is rejected without attempting a parse.
#[must_use]
pub fn parse_date_like(s: &str) -> Option<i64> {
    let bytes = s.as_bytes();
    if bytes.len() < 10
        || !bytes[..4].iter().all(u8::is_ascii_digit)
        || bytes[4] != b'-'
        || bytes[7] != b'-'
    {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Locale-aware text ordering.
///
/// Case-insensitive first; on a case-only difference lowercase sorts before
/// uppercase (`apple < Apple < banana`), and remaining ties fall back to code
/// point order.
#[must_use]
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded
        .then_with(|| a.chars().map(char::is_uppercase).cmp(b.chars().map(char::is_uppercase)))
        .then_with(|| a.cmp(b))
}
