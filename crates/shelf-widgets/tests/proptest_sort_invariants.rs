//! Property-based tests for sorting and filtering.
//!
//! 1. Sorting is a permutation of its input.
//! 2. Adjacent output pairs are ordered under the configured comparator.
//! 3. Full ties keep input order (stability).
//! 4. Sorting never panics on heterogeneous field types (mixed kinds order
//!    by kind, so the comparator is a total order).
//! 5. Filtering keeps input order and only returns matching records.

use std::cmp::Ordering;

use proptest::prelude::*;
use shelf_widgets::filter::{FilterSet, Predicate, apply_filter};
use shelf_widgets::record::{FieldValue, Record};
use shelf_widgets::sort::{SortConfig, SortField, apply_sort, sort_indices};

#[derive(Debug, Clone, PartialEq)]
struct Row {
    id: usize,
    name: String,
    price: Option<f64>,
    /// Deliberately mixed: number, text, bool or null.
    misc: Misc,
}

#[derive(Debug, Clone, PartialEq)]
enum Misc {
    Null,
    Flag(bool),
    Num(f64),
    Text(String),
}

impl Record for Row {
    type Id = usize;

    fn id(&self) -> usize {
        self.id
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "name" => FieldValue::text(&self.name),
            "price" => self.price.into(),
            "misc" => match &self.misc {
                Misc::Null => FieldValue::Null,
                Misc::Flag(b) => (*b).into(),
                Misc::Num(n) => (*n).into(),
                Misc::Text(s) => FieldValue::text(s),
            },
            _ => FieldValue::Null,
        }
    }
}

fn misc_strategy() -> impl Strategy<Value = Misc> {
    prop_oneof![
        Just(Misc::Null),
        any::<bool>().prop_map(Misc::Flag),
        (-1000.0f64..1000.0).prop_map(Misc::Num),
        "[a-zA-Z0-9 -]{0,8}".prop_map(Misc::Text),
        (2000i32..2030, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| Misc::Text(format!("{y:04}-{m:02}-{d:02}"))),
    ]
}

fn rows_strategy() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(
        ("[a-cA-C]{0,3}", prop::option::of(0.0f64..100.0), misc_strategy()),
        0..60,
    )
    .prop_map(|v| {
        v.into_iter()
            .enumerate()
            .map(|(id, (name, price, misc))| Row { id, name, price, misc })
            .collect()
    })
}

fn config_strategy() -> impl Strategy<Value = SortConfig> {
    let field = prop_oneof![Just("name"), Just("price"), Just("misc")];
    let key = (field, any::<bool>()).prop_map(|(f, desc)| {
        if desc { SortField::desc(f) } else { SortField::asc(f) }
    });
    (key.clone(), prop::collection::vec(key, 0..3)).prop_map(|(primary, secondary)| {
        let mut config = SortConfig::new(primary);
        for k in secondary {
            config.push_secondary(k);
        }
        config
    })
}

proptest! {
    #[test]
    fn sort_is_a_permutation(rows in rows_strategy(), config in config_strategy()) {
        let sorted = apply_sort(&rows, &config);
        prop_assert_eq!(sorted.len(), rows.len());
        let mut ids: Vec<usize> = sorted.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        prop_assert_eq!(ids, (0..rows.len()).collect::<Vec<_>>());

        let idx = sort_indices(&rows, &config);
        let via_indices: Vec<usize> = idx.iter().map(|&i| rows[i].id).collect();
        let direct: Vec<usize> = sorted.iter().map(|r| r.id).collect();
        prop_assert_eq!(via_indices, direct);
    }

    #[test]
    fn output_is_ordered(rows in rows_strategy(), config in config_strategy()) {
        let sorted = apply_sort(&rows, &config);
        for pair in sorted.windows(2) {
            prop_assert_ne!(config.compare(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn full_ties_keep_input_order(rows in rows_strategy(), config in config_strategy()) {
        let sorted = apply_sort(&rows, &config);
        for pair in sorted.windows(2) {
            if config.compare(&pair[0], &pair[1]) == Ordering::Equal {
                prop_assert!(pair[0].id < pair[1].id, "unstable at {:?}", pair);
            }
        }
    }

    #[test]
    fn filter_keeps_order_and_matches(
        rows in rows_strategy(),
        q in "[a-c]{0,2}",
        min in 0.0f64..100.0,
    ) {
        let filter = FilterSet::new()
            .with_query(q, ["name"])
            .with(Predicate::range("price", Some(min), None));
        let kept = apply_filter(&rows, &filter);
        for pair in kept.windows(2) {
            prop_assert!(pair[0].id < pair[1].id);
        }
        for row in &kept {
            prop_assert!(filter.matches(row));
        }
        let dropped = rows.iter().filter(|r| !filter.matches(*r)).count();
        prop_assert_eq!(kept.len() + dropped, rows.len());
    }
}

#[test]
fn price_then_name() {
    let rows = vec![
        Row { id: 0, name: "B".into(), price: Some(5.0), misc: Misc::Null },
        Row { id: 1, name: "A".into(), price: Some(5.0), misc: Misc::Null },
    ];
    let config = SortConfig::new(SortField::asc("price")).then(SortField::asc("name"));
    let names: Vec<_> = apply_sort(&rows, &config).into_iter().map(|r| r.name).collect();
    assert_eq!(names, ["A", "B"]);
}
