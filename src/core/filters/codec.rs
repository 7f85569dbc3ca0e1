//! Field type codec: typed filter values, their query-string encoding, and
//! the shared "active" predicate.
//!
//! Every rule about what a field kind means lives here, defined once:
//! - encode/decode between a [`FieldValue`] and its URL representation,
//! - the active predicate ("is this value filtering anything?"),
//! - conversion to/from the persisted JSON snapshot shape.
//!
//! Decoding never fails: malformed URL values (user-edited, stale shared
//! links) degrade to the field's default and the field reads as inactive.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ============================================================================
// Field Kind
// ============================================================================

/// Declared type of a filter field, driving encode/decode and the active
/// predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Free-form scalar; empty string means "no filter".
    String,
    /// Scalar where the empty string is a legal value; activity is defined
    /// as "differs from the default" rather than "non-empty".
    EmptyString,
    /// Numeric scalar; absence means "no filter".
    Number,
    /// Ordered list of strings; empty list means "no filter".
    StringArray,
    /// Ordered list of numbers; empty list means "no filter".
    NumberArray,
}

impl FieldKind {
    /// Stable label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::EmptyString => "emptyString",
            Self::Number => "number",
            Self::StringArray => "stringArray",
            Self::NumberArray => "numberArray",
        }
    }
}

// ============================================================================
// Query Value
// ============================================================================

/// One query-string parameter value: either a single occurrence or a
/// repeated key.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// First raw occurrence, for scalar decoding.
    pub fn first(&self) -> &str {
        match self {
            Self::Single(s) => s,
            Self::Multi(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// All raw entries for list decoding. A `Single` value is treated as the
    /// comma-delimited form and split; `Multi` entries are already discrete
    /// occurrences and pass through unsplit, so encoded values containing a
    /// comma survive the round trip. Empty entries are dropped; order is
    /// preserved; no deduplication.
    pub fn entries(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Self::Single(s) => s.split(',').collect(),
            Self::Multi(values) => values.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// True when nothing would survive stripping: an empty single value or
    /// a multi value with no entries.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Single(s) => s.is_empty(),
            Self::Multi(values) => values.is_empty(),
        }
    }
}

// ============================================================================
// Field Value
// ============================================================================

/// Current runtime value of a filter field, discriminated by [`FieldKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(Option<String>),
    EmptyStr(String),
    Num(Option<f64>),
    StrList(Vec<String>),
    NumList(Vec<f64>),
}

impl FieldValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Str(_) => FieldKind::String,
            Self::EmptyStr(_) => FieldKind::EmptyString,
            Self::Num(_) => FieldKind::Number,
            Self::StrList(_) => FieldKind::StringArray,
            Self::NumList(_) => FieldKind::NumberArray,
        }
    }

    /// The single active predicate shared by `active_filter_count`,
    /// `has_active_filters`, and URL emission.
    ///
    /// `EmptyString` fields are active when they differ from their default;
    /// every other kind has an intrinsic "no filter" shape.
    pub fn is_active(&self, default: &FieldValue) -> bool {
        match self {
            Self::Str(value) => value.as_deref().is_some_and(|s| !s.is_empty()),
            Self::EmptyStr(value) => match default {
                Self::EmptyStr(d) => value != d,
                _ => true,
            },
            Self::Num(value) => value.is_some(),
            Self::StrList(values) => !values.is_empty(),
            Self::NumList(values) => !values.is_empty(),
        }
    }

    /// Encode into a query value. Returns `None` when there is nothing to
    /// put on the wire (absent scalar, empty list). `EmptyString` values
    /// always encode, including `""`.
    pub fn encode(&self) -> Option<QueryValue> {
        match self {
            Self::Str(value) => value.clone().map(QueryValue::Single),
            Self::EmptyStr(value) => Some(QueryValue::Single(value.clone())),
            Self::Num(value) => value.map(|n| QueryValue::Single(format_number(n))),
            Self::StrList(values) => {
                (!values.is_empty()).then(|| QueryValue::Multi(values.clone()))
            }
            Self::NumList(values) => (!values.is_empty())
                .then(|| QueryValue::Multi(values.iter().copied().map(format_number).collect())),
        }
    }

    /// Decode a present query value into a field value of `kind`.
    ///
    /// Never fails: an unparsable scalar degrades to `default`, unparsable
    /// list entries are dropped, an empty `string` reads as absent.
    pub fn decode(kind: FieldKind, raw: &QueryValue, default: &FieldValue) -> FieldValue {
        match kind {
            FieldKind::String => {
                let value = raw.first();
                if value.is_empty() {
                    Self::Str(None)
                } else {
                    Self::Str(Some(value.to_string()))
                }
            }
            FieldKind::EmptyString => Self::EmptyStr(raw.first().to_string()),
            FieldKind::Number => match raw.first().parse::<f64>() {
                Ok(n) if n.is_finite() => Self::Num(Some(n)),
                _ => {
                    tracing::debug!(raw = raw.first(), "unparsable number in query, ignoring");
                    default.clone()
                }
            },
            FieldKind::StringArray => Self::StrList(raw.entries()),
            FieldKind::NumberArray => Self::NumList(
                raw.entries()
                    .iter()
                    .filter_map(|v| v.parse::<f64>().ok().filter(|n| n.is_finite()))
                    .collect(),
            ),
        }
    }

    /// Persisted snapshot representation (keyed externally by field name).
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Str(value) => value
                .as_ref()
                .map(|s| JsonValue::String(s.clone()))
                .unwrap_or(JsonValue::Null),
            Self::EmptyStr(value) => JsonValue::String(value.clone()),
            Self::Num(value) => value
                .and_then(serde_json::Number::from_f64)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Self::StrList(values) => JsonValue::Array(
                values
                    .iter()
                    .map(|s| JsonValue::String(s.clone()))
                    .collect(),
            ),
            Self::NumList(values) => JsonValue::Array(
                values
                    .iter()
                    .filter_map(|n| serde_json::Number::from_f64(*n))
                    .map(JsonValue::Number)
                    .collect(),
            ),
        }
    }

    /// Rebuild a field value of `kind` from its snapshot representation.
    ///
    /// Returns `None` on a shape mismatch so callers can keep the field at
    /// its current value (forward compatibility with definition changes).
    pub fn from_json(kind: FieldKind, value: &JsonValue) -> Option<FieldValue> {
        match (kind, value) {
            (FieldKind::String, JsonValue::Null) => Some(Self::Str(None)),
            (FieldKind::String, JsonValue::String(s)) => Some(Self::Str(Some(s.clone()))),
            (FieldKind::EmptyString, JsonValue::String(s)) => Some(Self::EmptyStr(s.clone())),
            (FieldKind::Number, JsonValue::Null) => Some(Self::Num(None)),
            (FieldKind::Number, JsonValue::Number(n)) => Some(Self::Num(n.as_f64())),
            (FieldKind::StringArray, JsonValue::Array(items)) => Some(Self::StrList(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            )),
            (FieldKind::NumberArray, JsonValue::Array(items)) => Some(Self::NumList(
                items.iter().filter_map(JsonValue::as_f64).collect(),
            )),
            _ => None,
        }
    }
}

/// Decimal rendering without a trailing `.0` for integral values.
fn format_number(n: f64) -> String {
    n.to_string()
}
