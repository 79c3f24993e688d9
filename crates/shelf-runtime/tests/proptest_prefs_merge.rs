//! Property-based tests for preference loading.
//!
//! 1. Each stored top-level key replaces its default; absent keys keep it.
//! 2. Arbitrary stored text never panics and always yields a value.
//! 3. A stored key of the wrong type falls back to its default without
//!    discarding the valid keys next to it.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{Map, Value, json};
use shelf_runtime::{MemoryStore, PreferenceStore, ViewMode, ViewPreferences};
use shelf_widgets::sort::{SortConfig, SortField};
use shelf_widgets::table::ColumnSetting;

const KEY: &str = "inventory.view";
const FIELDS: [&str; 4] = ["viewMode", "useVirtualization", "columnSettings", "sortSettings"];

// ── Strategies ────────────────────────────────────────────────────────────

fn view_mode() -> impl Strategy<Value = ViewMode> {
    prop_oneof![Just(ViewMode::List), Just(ViewMode::Table), Just(ViewMode::Grid)]
}

fn column() -> impl Strategy<Value = ColumnSetting> {
    ("[a-z]{1,8}", "[A-Z][a-z]{0,8}", 40u32..=400, any::<bool>()).prop_map(
        |(key, label, width, visible)| ColumnSetting {
            key,
            label,
            width,
            visible,
        },
    )
}

fn sort() -> impl Strategy<Value = SortConfig> {
    ("[a-z]{1,6}", any::<bool>(), proptest::option::of("[a-z]{1,6}")).prop_map(
        |(field, desc, then)| {
            let primary = if desc {
                SortField::desc(field)
            } else {
                SortField::asc(field)
            };
            let config = SortConfig::new(primary);
            match then {
                Some(next) => config.then(SortField::asc(next)),
                None => config,
            }
        },
    )
}

fn preferences() -> impl Strategy<Value = ViewPreferences> {
    (
        view_mode(),
        any::<bool>(),
        proptest::collection::vec(column(), 0..5),
        sort(),
    )
        .prop_map(
            |(view_mode, use_virtualization, column_settings, sort_settings)| ViewPreferences {
                view_mode,
                use_virtualization,
                column_settings,
                sort_settings,
            },
        )
}

fn load(raw: String, defaults: ViewPreferences) -> ViewPreferences {
    let store = MemoryStore::with_entries([(KEY, raw)]);
    PreferenceStore::new(Arc::new(store), KEY, defaults).load()
}

// ── Properties ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn stored_keys_override_defaults(
        stored in preferences(),
        defaults in preferences(),
        mask in 0u8..16,
    ) {
        let Value::Object(full) = serde_json::to_value(&stored).unwrap() else {
            unreachable!("preferences serialize to an object");
        };
        let partial: Map<String, Value> = full
            .into_iter()
            .filter(|(k, _)| {
                FIELDS
                    .iter()
                    .position(|f| f == k)
                    .is_some_and(|bit| mask & (1 << bit) != 0)
            })
            .collect();

        let loaded = load(Value::Object(partial).to_string(), defaults.clone());

        let pick = |bit: u8| mask & (1 << bit) != 0;
        prop_assert_eq!(
            loaded.view_mode,
            if pick(0) { stored.view_mode } else { defaults.view_mode }
        );
        prop_assert_eq!(
            loaded.use_virtualization,
            if pick(1) { stored.use_virtualization } else { defaults.use_virtualization }
        );
        prop_assert_eq!(
            &loaded.column_settings,
            if pick(2) { &stored.column_settings } else { &defaults.column_settings }
        );
        prop_assert_eq!(
            &loaded.sort_settings,
            if pick(3) { &stored.sort_settings } else { &defaults.sort_settings }
        );
    }

    #[test]
    fn arbitrary_text_never_panics(raw in ".{0,64}", defaults in preferences()) {
        let loaded = load(raw, defaults.clone());
        // Whatever was stored, the value is well-formed.
        prop_assert!(matches!(
            loaded.view_mode,
            ViewMode::List | ViewMode::Table | ViewMode::Grid
        ));
    }

    #[test]
    fn invalid_key_keeps_its_neighbours(
        defaults in preferences(),
        use_virtualization in any::<bool>(),
        bad in prop_oneof![
            Just(json!(7)),
            Just(json!("carousel")),
            Just(json!(null)),
            Just(json!({"mode": "grid"})),
        ],
    ) {
        let raw = json!({
            "viewMode": bad,
            "useVirtualization": use_virtualization,
        })
        .to_string();
        let loaded = load(raw, defaults.clone());
        prop_assert_eq!(loaded.view_mode, defaults.view_mode);
        prop_assert_eq!(loaded.use_virtualization, use_virtualization);
        prop_assert_eq!(loaded.sort_settings, defaults.sort_settings);
    }
}
