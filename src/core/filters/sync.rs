//! Hydration protocol and live synchronization.
//!
//! [`SyncedStore`] ties a [`FilterStore`] to its two external stores of
//! record and drives the lifecycle
//! `Uninitialized → PersistedLoaded → UrlReconciled → Live`:
//!
//! - on hydration the persisted snapshot loads first, then any URL
//!   parameters present override it field-by-field (a shared or bookmarked
//!   link must reproduce exactly what it encodes);
//! - from `Live` onward every mutation batch produces one history-neutral
//!   URL write and one snapshot save;
//! - externally observed location changes reconcile the store, except when
//!   they echo a write the store itself just emitted (no feedback loop:
//!   the store is the sole writer of its own query parameters).
//!
//! Persistence failures never reach the page; they are logged and the
//! engine proceeds as if no cached value existed.

use std::sync::Arc;

use crate::core::filters::persist::FilterCache;
use crate::core::filters::store::FilterStore;
use crate::core::filters::url_sync::{Location, UrlQuery, UrlSyncAdapter};

/// Hydration lifecycle of a synced store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationState {
    /// Freshly constructed; field values are defaults.
    Uninitialized,
    /// Persisted snapshot applied (or skipped on failure).
    PersistedLoaded,
    /// URL parameters reconciled on top of the snapshot.
    UrlReconciled,
    /// Normal operation; mutations flow out to URL and cache.
    Live,
}

/// A filter store bound to its location and device cache.
pub struct SyncedStore<L: Location, C: FilterCache> {
    store: FilterStore,
    url: UrlSyncAdapter<L>,
    cache: Arc<C>,
    state: HydrationState,
    /// Query the store last wrote to the location, for echo suppression.
    last_emitted: Option<UrlQuery>,
}

impl<L: Location, C: FilterCache> SyncedStore<L, C> {
    pub fn new(store: FilterStore, location: L, cache: Arc<C>) -> Self {
        Self {
            store,
            url: UrlSyncAdapter::new(location),
            cache,
            state: HydrationState::Uninitialized,
            last_emitted: None,
        }
    }

    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    pub fn state(&self) -> HydrationState {
        self.state
    }

    pub fn location(&self) -> &L {
        self.url.location()
    }

    pub fn location_mut(&mut self) -> &mut L {
        self.url.location_mut()
    }

    /// Populate the store from the persisted snapshot, then reconcile any
    /// URL parameters on top of it. URL values win for every field the
    /// query string mentions; fields absent from the URL keep their
    /// persisted (or default) value. When the URL carries no parameters the
    /// snapshot stands as-is and nothing is written back to the URL.
    ///
    /// Never fails: a missing or unreadable snapshot means defaults.
    pub async fn hydrate(&mut self) {
        self.load_persisted().await;
        self.reconcile_url();
        self.state = HydrationState::Live;
        tracing::debug!(store = %self.store.name(), "filter store live");
    }

    async fn load_persisted(&mut self) {
        match self.cache.load(self.store.storage_key()).await {
            Ok(Some(fields)) => self.store.apply_snapshot(&fields),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    store = %self.store.name(),
                    error = %e,
                    "snapshot load failed, starting from defaults"
                );
            }
        }
        self.state = HydrationState::PersistedLoaded;
    }

    fn reconcile_url(&mut self) {
        if self.url.has_url_params() {
            let query = self.url.current_query();
            tracing::debug!(store = %self.store.name(), "reconciling filters from URL");
            self.store.set_from_url_query(&query);
        }
        self.state = HydrationState::UrlReconciled;
    }

    /// Apply a mutation batch. Every field change inside the closure
    /// coalesces into a single history-neutral URL write and a single
    /// snapshot save; rapid sequential toggles should share one batch.
    pub async fn mutate(&mut self, f: impl FnOnce(&mut FilterStore)) {
        f(&mut self.store);
        let emitted = self.url.sync_to_url(&self.store.to_url_query());
        self.last_emitted = Some(emitted);
        self.save_snapshot().await;
    }

    /// Reset every field to its default, clear the query string, and
    /// persist the cleared state.
    pub async fn clear_all(&mut self) {
        self.store.clear_all();
        self.url.clear_url();
        self.last_emitted = Some(UrlQuery::new());
        self.save_snapshot().await;
    }

    /// Host callback for externally observed location changes (back,
    /// forward, manual edits). A change that matches the query this store
    /// just emitted is an echo of its own write and is ignored; anything
    /// else is user navigation, reconciles the store, and persists the
    /// reconciled state so a later reload does not resurrect the filters
    /// the user navigated away from.
    pub async fn on_location_changed(&mut self) {
        let current = self.url.current_query();
        if self.last_emitted.as_ref() == Some(&current) {
            tracing::debug!(store = %self.store.name(), "ignoring echoed URL write");
            return;
        }
        tracing::debug!(store = %self.store.name(), "reconciling store after navigation");
        self.store.set_from_url_query(&current);
        self.last_emitted = Some(current);
        self.save_snapshot().await;
    }

    /// Snapshot save with log-and-proceed failure semantics; a save failure
    /// is non-fatal and never blocks the page.
    async fn save_snapshot(&self) {
        let snapshot = self.store.snapshot();
        if let Err(e) = self.cache.store(self.store.storage_key(), &snapshot).await {
            tracing::warn!(
                store = %self.store.name(),
                error = %e,
                "snapshot save failed, continuing without cache"
            );
        }
    }
}
