#![forbid(unsafe_code)]

//! Text query and typed predicates.
//!
//! A [`FilterSet`] keeps a record when the free-text query matches at least
//! one of its search fields *and* every predicate holds. An empty filter keeps
//! everything.

use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, Record};

/// A typed condition on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Predicate {
    /// Display form equals `value`, ignoring case.
    Equals {
        /// Field name.
        field: String,
        /// Expected value.
        value: String,
    },
    /// Numeric value within `[min, max]`. Either bound may be open.
    Range {
        /// Field name.
        field: String,
        /// Inclusive lower bound.
        #[serde(default)]
        min: Option<f64>,
        /// Inclusive upper bound.
        #[serde(default)]
        max: Option<f64>,
    },
    /// Field is boolean `true`.
    IsTrue {
        /// Field name.
        field: String,
    },
    /// Field is present.
    NotNull {
        /// Field name.
        field: String,
    },
}

impl Predicate {
    /// Equality on the display form.
    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Inclusive numeric range.
    #[must_use]
    pub fn range(field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        Self::Range {
            field: field.into(),
            min,
            max,
        }
    }

    /// Boolean flag set.
    #[must_use]
    pub fn is_true(field: impl Into<String>) -> Self {
        Self::IsTrue {
            field: field.into(),
        }
    }

    /// Field present.
    #[must_use]
    pub fn not_null(field: impl Into<String>) -> Self {
        Self::NotNull {
            field: field.into(),
        }
    }

    /// Name of the field this predicate reads.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Equals { field, .. }
            | Self::Range { field, .. }
            | Self::IsTrue { field }
            | Self::NotNull { field } => field,
        }
    }

    /// Evaluate against one record.
    #[must_use]
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let value = record.field(self.field());
        match self {
            Self::Equals { value: expected, .. } => {
                !value.is_null() && value.display().to_lowercase() == expected.to_lowercase()
            }
            Self::Range { min, max, .. } => match value {
                FieldValue::Number(n) if !n.is_nan() => {
                    min.is_none_or(|lo| n >= lo) && max.is_none_or(|hi| n <= hi)
                }
                _ => false,
            },
            Self::IsTrue { .. } => matches!(value, FieldValue::Bool(true)),
            Self::NotNull { .. } => !value.is_null(),
        }
    }
}

/// Query plus predicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    /// Case-insensitive substring. Blank means no text filter.
    #[serde(default)]
    pub query: String,
    /// Fields the query is matched against.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Conditions that must all hold.
    #[serde(default)]
    pub predicates: Vec<Predicate>,
}

impl FilterSet {
    /// Empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text query and the fields it searches.
    #[must_use]
    pub fn with_query<I, S>(mut self, query: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query = query.into();
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add a predicate.
    #[must_use]
    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Check if this filter keeps every record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.predicates.is_empty()
    }

    /// Evaluate against one record.
    #[must_use]
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.query_matches(record, &self.query.trim().to_lowercase())
            && self.predicates.iter().all(|p| p.matches(record))
    }

    fn query_matches<R: Record + ?Sized>(&self, record: &R, needle: &str) -> bool {
        needle.is_empty()
            || self.fields.iter().any(|name| {
                record
                    .field(name)
                    .display()
                    .to_lowercase()
                    .contains(needle)
            })
    }
}

/// Records that pass `filter`, in input order. The input is not modified.
#[must_use]
pub fn apply_filter<R: Record + Clone>(records: &[R], filter: &FilterSet) -> Vec<R> {
    if filter.is_empty() {
        return records.to_vec();
    }
    let needle = filter.query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| {
            filter.query_matches(*r, &needle) && filter.predicates.iter().all(|p| p.matches(*r))
        })
        .cloned()
        .collect()
}

/// Indices of the records that pass `filter`, ascending.
#[must_use]
pub fn filter_indices<R: Record>(records: &[R], filter: &FilterSet) -> Vec<usize> {
    let needle = filter.query.trim().to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            filter.query_matches(*r, &needle) && filter.predicates.iter().all(|p| p.matches(*r))
        })
        .map(|(i, _)| i)
        .collect()
}
