//! Filter store: the factory output holding current values for all declared
//! fields plus the implicit common fields.
//!
//! A store is built once from a [`FilterStoreConfig`] and owned exclusively
//! by the page that activates it. Construction fails fast on configuration
//! errors (duplicate URL keys, kind/default mismatches); everything after
//! that degrades gracefully — malformed URL values and stale snapshots fall
//! back to "no filter applied".

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::core::filters::codec::FieldValue;
use crate::core::filters::error::{FilterError, FilterResult};
use crate::core::filters::field::{
    common_fields, FieldDef, SortDirection, SEARCH_QUERY, SELECTED_SOURCES, SORT_BY, SORT_DIR,
};
use crate::core::filters::url_sync::UrlQuery;

/// Configuration for one entity type's filter store.
#[derive(Debug, Clone)]
pub struct FilterStoreConfig {
    /// Store identity, used in logging.
    pub name: String,
    /// Persistence namespace; exclusively owned by this store.
    pub storage_key: String,
    /// Default value of the common `sort_by` field.
    pub default_sort: String,
    /// Entity-specific fields, appended after the common fields.
    pub fields: Vec<FieldDef>,
}

impl FilterStoreConfig {
    pub fn new(
        name: impl Into<String>,
        storage_key: impl Into<String>,
        fields: Vec<FieldDef>,
    ) -> Self {
        Self {
            name: name.into(),
            storage_key: storage_key.into(),
            default_sort: "name".to_string(),
            fields,
        }
    }

    pub fn with_default_sort(mut self, sort: impl Into<String>) -> Self {
        self.default_sort = sort.into();
        self
    }
}

/// Reactive container for one entity type's filter state.
#[derive(Debug, Clone)]
pub struct FilterStore {
    name: String,
    storage_key: String,
    fields: Vec<FieldDef>,
    values: IndexMap<String, FieldValue>,
    /// Whether the filter panel is expanded. UI-only: never serialized to
    /// the URL, never persisted, never counted as an active filter.
    pub filters_open: bool,
}

impl FilterStore {
    /// Build a store from its configuration. The four common fields are
    /// prepended before the declared fields.
    ///
    /// # Errors
    ///
    /// `DuplicateUrlKey`/`DuplicateField` when two definitions collide, and
    /// `TypeMismatch` when a definition's kind disagrees with its default's
    /// shape. These are programmer errors and surface immediately.
    pub fn new(config: FilterStoreConfig) -> FilterResult<Self> {
        let mut fields = common_fields(&config.default_sort);
        fields.extend(config.fields);

        let mut values = IndexMap::with_capacity(fields.len());
        let mut url_keys = std::collections::HashSet::new();
        for def in &fields {
            if def.kind != def.default.kind() {
                return Err(FilterError::type_mismatch(
                    &def.name,
                    def.kind.label(),
                    def.default.kind().label(),
                ));
            }
            if !url_keys.insert(def.url_key.clone()) {
                return Err(FilterError::DuplicateUrlKey(def.url_key.clone()));
            }
            if values.insert(def.name.clone(), def.default.clone()).is_some() {
                return Err(FilterError::DuplicateField(def.name.clone()));
            }
        }

        Ok(Self {
            name: config.name,
            storage_key: config.storage_key,
            fields,
            values,
            filters_open: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// All field definitions, common fields first, in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    fn def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|def| def.name == name)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current value of a field, if declared.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Assign a field value of the declared kind.
    pub fn set(&mut self, name: &str, value: FieldValue) -> FilterResult<()> {
        let def = self
            .def(name)
            .ok_or_else(|| FilterError::unknown_field(name))?;
        if def.kind != value.kind() {
            return Err(FilterError::type_mismatch(
                name,
                def.kind.label(),
                value.kind().label(),
            ));
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// `string` field accessor; `None` when absent or not a string field.
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            FieldValue::Str(value) => value.as_deref(),
            FieldValue::EmptyStr(value) => Some(value),
            _ => None,
        }
    }

    /// `number` field accessor.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.values.get(name)? {
            FieldValue::Num(value) => *value,
            _ => None,
        }
    }

    /// `stringArray` field accessor.
    pub fn string_list(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name)? {
            FieldValue::StrList(values) => Some(values),
            _ => None,
        }
    }

    /// `numberArray` field accessor.
    pub fn number_list(&self, name: &str) -> Option<&[f64]> {
        match self.values.get(name)? {
            FieldValue::NumList(values) => Some(values),
            _ => None,
        }
    }

    /// Assign a `string` field; `None` clears the filter.
    pub fn set_string(&mut self, name: &str, value: Option<&str>) -> FilterResult<()> {
        self.set(name, FieldValue::Str(value.map(str::to_string)))
    }

    /// Assign a `stringArray` field.
    pub fn set_strings<I, S>(&mut self, name: &str, values: I) -> FilterResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(
            name,
            FieldValue::StrList(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Assign a `number` field; `None` clears the filter.
    pub fn set_number(&mut self, name: &str, value: Option<f64>) -> FilterResult<()> {
        self.set(name, FieldValue::Num(value))
    }

    /// Assign a `numberArray` field.
    pub fn set_numbers(&mut self, name: &str, values: Vec<f64>) -> FilterResult<()> {
        self.set(name, FieldValue::NumList(values))
    }

    // ========================================================================
    // Common Fields
    // ========================================================================

    /// Free-text search query; empty when no search is applied.
    pub fn search_query(&self) -> &str {
        self.string(SEARCH_QUERY).unwrap_or("")
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        let value = if query.is_empty() {
            FieldValue::Str(None)
        } else {
            FieldValue::Str(Some(query))
        };
        // common field always declared
        let _ = self.set(SEARCH_QUERY, value);
    }

    pub fn sort_by(&self) -> &str {
        self.string(SORT_BY).unwrap_or("")
    }

    pub fn sort_dir(&self) -> SortDirection {
        SortDirection::parse(self.string(SORT_DIR).unwrap_or(""))
    }

    pub fn set_sort(&mut self, sort_by: impl Into<String>, dir: SortDirection) {
        let _ = self.set(SORT_BY, FieldValue::EmptyStr(sort_by.into()));
        let _ = self.set(SORT_DIR, FieldValue::EmptyStr(dir.as_str().to_string()));
    }

    pub fn selected_sources(&self) -> &[String] {
        self.string_list(SELECTED_SOURCES).unwrap_or(&[])
    }

    pub fn set_selected_sources<I, S>(&mut self, sources: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let _ = self.set_strings(SELECTED_SOURCES, sources);
    }

    // ========================================================================
    // Derived State
    // ========================================================================

    /// Whether the named field is currently filtering anything.
    pub fn is_field_active(&self, name: &str) -> bool {
        match (self.def(name), self.values.get(name)) {
            (Some(def), Some(value)) => value.is_active(&def.default),
            _ => false,
        }
    }

    /// True iff at least one field (common or declared) is active.
    pub fn has_active_filters(&self) -> bool {
        self.fields
            .iter()
            .any(|def| self.is_field_active(&def.name))
    }

    /// Number of active fields. A collection field counts once regardless
    /// of how many elements it holds.
    pub fn active_filter_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|def| self.is_field_active(&def.name))
            .count()
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Reset every field (including search and sort) to its default.
    /// Idempotent.
    pub fn clear_all(&mut self) {
        for def in &self.fields {
            self.values.insert(def.name.clone(), def.default.clone());
        }
    }

    /// Apply URL query parameters. Fields whose `url_key` is present are
    /// decoded and assigned; absent fields keep their current value, so the
    /// action is safe to call incrementally as navigation occurs. Malformed
    /// values degrade per the codec and never fail.
    pub fn set_from_url_query(&mut self, query: &UrlQuery) {
        for def in &self.fields {
            if let Some(raw) = query.get(&def.url_key) {
                let decoded = FieldValue::decode(def.kind, raw, &def.default);
                self.values.insert(def.name.clone(), decoded);
            }
        }
    }

    /// Emit `url_key → encoded value` for active, persist-eligible fields
    /// only. Inactive and default fields are omitted, keeping URLs minimal
    /// and stable under repeated round-trips.
    pub fn to_url_query(&self) -> UrlQuery {
        let mut query = UrlQuery::new();
        for def in &self.fields {
            if !def.persist || !self.is_field_active(&def.name) {
                continue;
            }
            if let Some(encoded) = self.values.get(&def.name).and_then(FieldValue::encode) {
                query.insert(def.url_key.clone(), encoded);
            }
        }
        query
    }

    // ========================================================================
    // Persistence Shape
    // ========================================================================

    /// Persisted snapshot: persist-eligible fields keyed by field *name*
    /// (not `url_key`), so persisted data survives URL renames.
    pub fn snapshot(&self) -> JsonValue {
        let mut map = serde_json::Map::new();
        for def in self.fields.iter().filter(|def| def.persist) {
            if let Some(value) = self.values.get(&def.name) {
                map.insert(def.name.clone(), value.to_json());
            }
        }
        JsonValue::Object(map)
    }

    /// Apply a persisted snapshot field-by-field. Unknown names and shape
    /// mismatches are skipped; fields the snapshot omits keep their current
    /// value. Fields marked `persist: false` are never read from snapshots.
    pub fn apply_snapshot(&mut self, snapshot: &JsonValue) {
        let JsonValue::Object(map) = snapshot else {
            tracing::warn!(store = %self.name, "snapshot is not an object, ignoring");
            return;
        };
        for def in self.fields.iter().filter(|def| def.persist) {
            let Some(raw) = map.get(&def.name) else {
                continue;
            };
            match FieldValue::from_json(def.kind, raw) {
                Some(value) => {
                    self.values.insert(def.name.clone(), value);
                }
                None => {
                    tracing::debug!(
                        store = %self.name,
                        field = %def.name,
                        "snapshot shape mismatch, keeping current value"
                    );
                }
            }
        }
    }
}
