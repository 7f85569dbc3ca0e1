//! Field definitions: static metadata describing one filter field.
//!
//! A [`FieldDef`] names the field, its URL parameter key, its kind, its
//! default value, and whether it participates in the persisted snapshot.
//! The typed constructors keep the kind and the default shape in agreement;
//! the store re-validates at construction anyway, since configurations can
//! be assembled by hand.

use crate::core::filters::codec::{FieldKind, FieldValue};

/// Static metadata for one filter field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Logical name, also the key in the persisted snapshot.
    pub name: String,
    /// Query-string parameter key; unique within a store.
    pub url_key: String,
    /// Declared kind driving encode/decode and the active predicate.
    pub kind: FieldKind,
    /// Value meaning "no filter applied" (except `EmptyString`, where it is
    /// simply the resting value).
    pub default: FieldValue,
    /// Whether the field is written to and read from the device cache.
    pub persist: bool,
}

impl FieldDef {
    fn new(name: impl Into<String>, url_key: impl Into<String>, default: FieldValue) -> Self {
        Self {
            name: name.into(),
            url_key: url_key.into(),
            kind: default.kind(),
            default,
            persist: true,
        }
    }

    /// A `string` field defaulting to "no filter".
    pub fn string(name: impl Into<String>, url_key: impl Into<String>) -> Self {
        Self::new(name, url_key, FieldValue::Str(None))
    }

    /// An `emptyString` field with an explicit resting value.
    pub fn empty_string(
        name: impl Into<String>,
        url_key: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self::new(name, url_key, FieldValue::EmptyStr(default.into()))
    }

    /// A `number` field defaulting to "no filter".
    pub fn number(name: impl Into<String>, url_key: impl Into<String>) -> Self {
        Self::new(name, url_key, FieldValue::Num(None))
    }

    /// A `stringArray` field defaulting to the empty list.
    pub fn string_list(name: impl Into<String>, url_key: impl Into<String>) -> Self {
        Self::new(name, url_key, FieldValue::StrList(Vec::new()))
    }

    /// A `numberArray` field defaulting to the empty list.
    pub fn number_list(name: impl Into<String>, url_key: impl Into<String>) -> Self {
        Self::new(name, url_key, FieldValue::NumList(Vec::new()))
    }

    /// Toggle persistence eligibility (defaults to `true`).
    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }
}

/// Sort direction for the common `sort_dir` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Lenient parse; anything other than "desc" reads as ascending.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

/// Field names of the implicit common fields, shared by every store.
pub const SEARCH_QUERY: &str = "search_query";
pub const SORT_BY: &str = "sort_by";
pub const SORT_DIR: &str = "sort_dir";
pub const SELECTED_SOURCES: &str = "selected_sources";

/// The four implicit common fields every store prepends to its declared
/// fields. `sort_by`/`sort_dir` use `emptyString` semantics so a non-default
/// sort counts as an active filter while the default sort does not. The
/// fifth common field, the filter-panel-open flag, is UI-only and lives
/// outside the field table entirely.
pub fn common_fields(default_sort: &str) -> Vec<FieldDef> {
    vec![
        FieldDef::string(SEARCH_QUERY, "q"),
        FieldDef::empty_string(SORT_BY, "sort", default_sort),
        FieldDef::empty_string(SORT_DIR, "dir", SortDirection::Asc.as_str()),
        FieldDef::string_list(SELECTED_SOURCES, "source"),
    ]
}
