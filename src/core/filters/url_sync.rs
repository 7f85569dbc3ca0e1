//! URL synchronization: query-string parsing/serialization, the navigable
//! location seam, and the sync adapter.
//!
//! The engine never touches a browser API directly; it talks to a
//! [`Location`] implementation. `sync_to_url` is history-neutral: it
//! replaces the current query string without creating a new history entry,
//! so the back button returns to the page prior to the filtered view rather
//! than stepping through every filter tweak.

use indexmap::IndexMap;

use crate::core::filters::codec::QueryValue;

// ============================================================================
// Url Query
// ============================================================================

/// Ordered set of query-string parameters (`url_key` → value).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlQuery {
    params: IndexMap<String, QueryValue>,
}

impl UrlQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: QueryValue) {
        self.params.insert(key.into(), value);
    }

    /// Convenience for building queries in tests and hosts.
    pub fn single(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, QueryValue::Single(value.into()));
        self
    }

    /// Convenience for building multi-valued parameters.
    pub fn multi<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(
            key,
            QueryValue::Multi(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QueryValue)> {
        self.params.iter()
    }

    /// Copy without blank parameters (empty-string singles, empty multis).
    pub fn without_blank_values(&self) -> UrlQuery {
        let params = self
            .params
            .iter()
            .filter(|(_, value)| !value.is_blank())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        UrlQuery { params }
    }

    /// Parse a raw query string (with or without a leading `?`). Repeated
    /// keys collect into a multi value; `+` reads as a space; undecodable
    /// pairs are skipped rather than failing the whole parse.
    pub fn parse(raw: &str) -> UrlQuery {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut query = UrlQuery::new();
        for pair in raw.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let (Some(key), Some(value)) = (decode_component(key), decode_component(value))
            else {
                tracing::debug!(pair, "undecodable query pair, skipping");
                continue;
            };
            if key.is_empty() {
                continue;
            }
            if let Some(existing) = query.params.get_mut(&key) {
                match existing {
                    QueryValue::Single(first) => {
                        let first = std::mem::take(first);
                        *existing = QueryValue::Multi(vec![first, value]);
                    }
                    QueryValue::Multi(values) => values.push(value),
                }
            } else {
                query.params.insert(key, QueryValue::Single(value));
            }
        }
        query
    }

    /// Serialize to a query string without a leading `?`. Multi values emit
    /// the repeated-parameter form.
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        for (key, value) in &self.params {
            match value {
                QueryValue::Single(v) => pairs.push(encode_pair(key, v)),
                QueryValue::Multi(values) => {
                    pairs.extend(values.iter().map(|v| encode_pair(key, v)));
                }
            }
        }
        pairs.join("&")
    }
}

impl FromIterator<(String, QueryValue)> for UrlQuery {
    fn from_iter<T: IntoIterator<Item = (String, QueryValue)>>(iter: T) -> Self {
        UrlQuery {
            params: iter.into_iter().collect(),
        }
    }
}

fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|c| c.into_owned())
}

fn encode_pair(key: &str, value: &str) -> String {
    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
}

// ============================================================================
// Location Seam
// ============================================================================

/// The host page's navigable location, reduced to what the engine needs:
/// read the current query and replace it without touching history.
pub trait Location {
    /// Query parameters of the current location.
    fn query(&self) -> UrlQuery;

    /// Replace the current location's query string. History-neutral: the
    /// current history entry is overwritten, no new entry is created.
    fn replace_query(&mut self, query: &UrlQuery);
}

/// In-memory location with real history semantics, used by native tests to
/// verify history neutrality and back/forward reconciliation.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    entries: Vec<UrlQuery>,
    index: usize,
}

impl MemoryLocation {
    /// A location with a single, empty history entry.
    pub fn new() -> Self {
        Self {
            entries: vec![UrlQuery::new()],
            index: 0,
        }
    }

    /// A location whose current entry already carries `query` (a shared or
    /// bookmarked link).
    pub fn with_query(query: UrlQuery) -> Self {
        Self {
            entries: vec![query],
            index: 0,
        }
    }

    /// Host-side navigation: pushes a new history entry. Entries ahead of
    /// the current index are discarded, as a browser would.
    pub fn push_query(&mut self, query: UrlQuery) {
        self.entries.truncate(self.index + 1);
        self.entries.push(query);
        self.index += 1;
    }

    /// Navigate back one entry, if possible.
    pub fn back(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Navigate forward one entry, if possible.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Number of history entries (replace must not grow this).
    pub fn history_len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for MemoryLocation {
    fn query(&self) -> UrlQuery {
        self.entries[self.index].clone()
    }

    fn replace_query(&mut self, query: &UrlQuery) {
        self.entries[self.index] = query.clone();
    }
}

// ============================================================================
// Sync Adapter
// ============================================================================

/// Bridges a filter store to the host's navigable location.
#[derive(Debug)]
pub struct UrlSyncAdapter<L: Location> {
    location: L,
}

impl<L: Location> UrlSyncAdapter<L> {
    pub fn new(location: L) -> Self {
        Self { location }
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    /// True iff the current location carries at least one query parameter.
    /// Decides hydration precedence: a link that encodes filters wins over
    /// the device cache for the fields it mentions.
    pub fn has_url_params(&self) -> bool {
        !self.location.query().is_empty()
    }

    /// Current location query.
    pub fn current_query(&self) -> UrlQuery {
        self.location.query()
    }

    /// Replace the query string with `query`, stripping blank values.
    /// Returns the query as written, for echo suppression by the caller.
    pub fn sync_to_url(&mut self, query: &UrlQuery) -> UrlQuery {
        let stripped = query.without_blank_values();
        self.location.replace_query(&stripped);
        stripped
    }

    /// Replace the query string with nothing.
    pub fn clear_url(&mut self) {
        self.location.replace_query(&UrlQuery::new());
    }
}
