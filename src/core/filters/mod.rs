//! Entity filter state synchronization engine.
//!
//! Keeps three representations of a list page's filter state consistent:
//! the in-memory [`FilterStore`], the address-bar query string, and a
//! per-device persisted cache. One store exists per browsable entity type
//! (see [`EntityKind`]); each is generic over the same field machinery.
//!
//! # Modules
//!
//! - `codec` - field kinds, typed values, encode/decode, active predicate
//! - `field` - field definitions and the implicit common fields
//! - `store` - the store factory: state, derived queries, actions
//! - `url_sync` - location seam and history-neutral URL writes
//! - `persist` - async device cache (in-memory and JSON-file backends)
//! - `sync` - hydration protocol and live synchronization
//! - `entities` - the seven per-entity configurations
//! - `error` - error types

pub mod codec;
pub mod entities;
pub mod error;
pub mod field;
pub mod persist;
pub mod store;
pub mod sync;
pub mod url_sync;

pub use codec::{FieldKind, FieldValue, QueryValue};
pub use entities::EntityKind;
pub use error::{FilterError, FilterResult};
pub use field::{FieldDef, SortDirection};
pub use persist::{FilterCache, JsonFileCache, MemoryCache, SnapshotEnvelope, SNAPSHOT_VERSION};
pub use store::{FilterStore, FilterStoreConfig};
pub use sync::{HydrationState, SyncedStore};
pub use url_sync::{Location, MemoryLocation, UrlQuery, UrlSyncAdapter};
