//! Property-based tests for the field type codec
//!
//! Tests invariants:
//! - Decoding never panics for arbitrary raw values
//! - Active values survive an encode/decode round-trip
//! - List decoding preserves order and drops empty entries
//! - Query-string parse/serialize round-trips

use proptest::prelude::*;

use crate::core::filters::{FieldKind, FieldValue, QueryValue, UrlQuery};

// ============================================================================
// Strategies
// ============================================================================

/// Raw query values, including junk no well-behaved page would emit.
fn arb_raw_value() -> impl Strategy<Value = QueryValue> {
    prop_oneof![
        ".*".prop_map(QueryValue::Single),
        prop::collection::vec(".*", 0..4).prop_map(QueryValue::Multi),
    ]
}

fn arb_kind() -> impl Strategy<Value = FieldKind> {
    prop_oneof![
        Just(FieldKind::String),
        Just(FieldKind::EmptyString),
        Just(FieldKind::Number),
        Just(FieldKind::StringArray),
        Just(FieldKind::NumberArray),
    ]
}

/// URL-safe-ish strings, commas included; the repeated-parameter encoding
/// must carry delimiter characters losslessly.
fn arb_token() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9, /_.-]{1,20}"
}

fn default_for(kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::String => FieldValue::Str(None),
        FieldKind::EmptyString => FieldValue::EmptyStr("name".to_string()),
        FieldKind::Number => FieldValue::Num(None),
        FieldKind::StringArray => FieldValue::StrList(vec![]),
        FieldKind::NumberArray => FieldValue::NumList(vec![]),
    }
}

proptest! {
    /// Property: decode never panics, whatever the raw value, and always
    /// yields a value of the requested kind or the default's kind.
    #[test]
    fn prop_decode_never_panics(kind in arb_kind(), raw in arb_raw_value()) {
        let default = default_for(kind);
        let decoded = FieldValue::decode(kind, &raw, &default);
        prop_assert_eq!(decoded.kind(), kind);
    }

    /// Property: an active string value round-trips through encode/decode.
    #[test]
    fn prop_string_roundtrip(value in arb_token()) {
        let original = FieldValue::Str(Some(value));
        let encoded = original.encode().expect("active value encodes");
        let decoded = FieldValue::decode(FieldKind::String, &encoded, &FieldValue::Str(None));
        prop_assert_eq!(decoded, original);
    }

    /// Property: finite numbers round-trip through their decimal encoding.
    #[test]
    fn prop_number_roundtrip(value in -1.0e9f64..1.0e9) {
        let original = FieldValue::Num(Some(value));
        let encoded = original.encode().expect("active value encodes");
        let decoded = FieldValue::decode(FieldKind::Number, &encoded, &FieldValue::Num(None));
        prop_assert_eq!(decoded, original);
    }

    /// Property: non-empty string lists round-trip with order preserved,
    /// including entries that contain the comma delimiter.
    #[test]
    fn prop_string_list_roundtrip(values in prop::collection::vec(arb_token(), 1..6)) {
        let original = FieldValue::StrList(values);
        let encoded = original.encode().expect("non-empty list encodes");
        let decoded = FieldValue::decode(
            FieldKind::StringArray,
            &encoded,
            &FieldValue::StrList(vec![]),
        );
        prop_assert_eq!(decoded, original);
    }

    /// Property: number lists round-trip; unparsable entries would be
    /// dropped but encoded entries are always parsable.
    #[test]
    fn prop_number_list_roundtrip(values in prop::collection::vec(-1.0e6f64..1.0e6, 1..6)) {
        let original = FieldValue::NumList(values);
        let encoded = original.encode().expect("non-empty list encodes");
        let decoded = FieldValue::decode(
            FieldKind::NumberArray,
            &encoded,
            &FieldValue::NumList(vec![]),
        );
        prop_assert_eq!(decoded, original);
    }

    /// Property: list decoding drops empty entries and keeps order.
    #[test]
    fn prop_list_decode_drops_empties(values in prop::collection::vec(arb_token(), 0..6)) {
        let mut padded: Vec<String> = Vec::new();
        for value in &values {
            padded.push(String::new());
            padded.push(value.clone());
        }
        let decoded = FieldValue::decode(
            FieldKind::StringArray,
            &QueryValue::Multi(padded),
            &FieldValue::StrList(vec![]),
        );
        prop_assert_eq!(decoded, FieldValue::StrList(values));
    }

    /// Property: query strings round-trip through parse/serialize for
    /// encodable parameter maps.
    #[test]
    fn prop_query_string_roundtrip(
        pairs in prop::collection::vec(("[a-z]{1,8}", arb_token()), 0..5)
    ) {
        let mut query = UrlQuery::new();
        for (key, value) in pairs {
            query.insert(key, QueryValue::Single(value));
        }
        let parsed = UrlQuery::parse(&query.to_query_string());
        prop_assert_eq!(parsed, query);
    }

    /// Property: snapshot JSON round-trips for every kind.
    #[test]
    fn prop_snapshot_json_roundtrip(kind in arb_kind(), raw in arb_raw_value()) {
        let default = default_for(kind);
        let value = FieldValue::decode(kind, &raw, &default);
        let json = value.to_json();
        let back = FieldValue::from_json(kind, &json);
        prop_assert_eq!(back, Some(value));
    }
}
