//! Property-based tests for filter store derived state and round-tripping
//!
//! Tests invariants:
//! - `set_from_url_query(to_url_query())` restores all active values
//! - `to_url_query` never emits a key for a field at its default
//! - `clear_all` is idempotent
//! - `has_active_filters == (active_filter_count > 0)` for all states
//! - Arbitrary junk queries never panic and leave values well-typed

use proptest::prelude::*;

use crate::core::filters::{FilterStore, QueryValue, SortDirection, UrlQuery};
use crate::tests::common::monster_store;

// ============================================================================
// Strategies
// ============================================================================

/// Values including the list delimiter; the repeated-parameter encoding
/// keeps comma-bearing entries intact through the round trip.
fn arb_token() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9, /_.-]{1,12}"
}

#[derive(Debug, Clone)]
struct MonsterState {
    search: String,
    sort_by: String,
    descending: bool,
    sources: Vec<String>,
    crs: Vec<String>,
    monster_type: Option<String>,
    sizes: Vec<String>,
    legendary: Option<String>,
}

fn arb_monster_state() -> impl Strategy<Value = MonsterState> {
    (
        prop_oneof![Just(String::new()), arb_token()],
        prop_oneof![Just("name".to_string()), Just("cr".to_string())],
        any::<bool>(),
        prop::collection::vec(arb_token(), 0..3),
        prop::collection::vec("[0-9/]{1,4}", 0..4),
        prop::option::of(arb_token()),
        prop::collection::vec(arb_token(), 0..3),
        prop::option::of(arb_token()),
    )
        .prop_map(
            |(search, sort_by, descending, sources, crs, monster_type, sizes, legendary)| {
                MonsterState {
                    search,
                    sort_by,
                    descending,
                    sources,
                    crs,
                    monster_type,
                    sizes,
                    legendary,
                }
            },
        )
}

fn apply(state: &MonsterState, store: &mut FilterStore) {
    store.set_search_query(state.search.clone());
    let dir = if state.descending {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    store.set_sort(state.sort_by.clone(), dir);
    store.set_selected_sources(state.sources.clone());
    store.set_strings("selected_crs", state.crs.clone()).unwrap();
    store
        .set_string("selected_type", state.monster_type.as_deref())
        .unwrap();
    store.set_strings("selected_sizes", state.sizes.clone()).unwrap();
    store
        .set_string("legendary", state.legendary.as_deref())
        .unwrap();
}

proptest! {
    /// Property: round-tripping through the URL restores exactly the active
    /// values (inactive fields may only differ by sitting at their default).
    #[test]
    fn prop_url_roundtrip_restores_active_state(state in arb_monster_state()) {
        let mut store = monster_store();
        apply(&state, &mut store);

        let mut restored = monster_store();
        restored.set_from_url_query(&store.to_url_query());

        prop_assert_eq!(restored.to_url_query(), store.to_url_query());
        prop_assert_eq!(restored.active_filter_count(), store.active_filter_count());
        for def in store.fields() {
            if store.is_field_active(&def.name) {
                prop_assert_eq!(
                    restored.get(&def.name), store.get(&def.name),
                    "active field {} must survive the round-trip", def.name
                );
            }
        }
    }

    /// Property: the emitted query is minimal — one key per active field,
    /// nothing for fields at their default.
    #[test]
    fn prop_url_query_is_minimal(state in arb_monster_state()) {
        let mut store = monster_store();
        apply(&state, &mut store);

        let query = store.to_url_query();
        prop_assert_eq!(query.len(), store.active_filter_count());
        for def in store.fields() {
            prop_assert_eq!(
                query.contains_key(&def.url_key),
                store.is_field_active(&def.name),
                "key {} emitted iff field {} is active", def.url_key, def.name
            );
        }
    }

    /// Property: clear_all is idempotent and always lands on zero active
    /// filters.
    #[test]
    fn prop_clear_all_idempotent(state in arb_monster_state()) {
        let mut store = monster_store();
        apply(&state, &mut store);

        store.clear_all();
        let once = store.clone();
        store.clear_all();

        prop_assert_eq!(store.active_filter_count(), 0);
        prop_assert!(!store.has_active_filters());
        for def in once.fields() {
            prop_assert_eq!(store.get(&def.name), once.get(&def.name));
        }
    }

    /// Property: the flag and the count always agree.
    #[test]
    fn prop_count_flag_agreement(state in arb_monster_state()) {
        let mut store = monster_store();
        apply(&state, &mut store);
        prop_assert_eq!(store.has_active_filters(), store.active_filter_count() > 0);
    }

    /// Property: arbitrary junk in the query string never panics and every
    /// field keeps its declared kind.
    #[test]
    fn prop_junk_queries_tolerated(
        pairs in prop::collection::vec((".*", ".*"), 0..6)
    ) {
        let mut store = monster_store();
        let mut query = UrlQuery::new();
        for (key, value) in pairs {
            query.insert(key, QueryValue::Single(value));
        }
        store.set_from_url_query(&query);

        for def in store.fields() {
            let value = store.get(&def.name).expect("field present");
            prop_assert_eq!(value.kind(), def.kind);
        }
        prop_assert_eq!(store.has_active_filters(), store.active_filter_count() > 0);
    }

    /// Property: a snapshot applied to a fresh store reproduces every
    /// persist-eligible field.
    #[test]
    fn prop_snapshot_roundtrip(state in arb_monster_state()) {
        let mut store = monster_store();
        apply(&state, &mut store);

        let mut restored = monster_store();
        restored.apply_snapshot(&store.snapshot());

        for def in store.fields() {
            if def.persist {
                prop_assert_eq!(restored.get(&def.name), store.get(&def.name));
            }
        }
    }
}
