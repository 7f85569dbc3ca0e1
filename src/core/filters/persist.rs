//! Persistence adapter: asynchronous device-local cache used to rehydrate a
//! store between sessions.
//!
//! Snapshots are wrapped in a versioned envelope so stale layouts can be
//! discarded as if no cache existed. Adapters report failures through
//! `FilterResult`; policy (log and proceed with defaults) lives in the sync
//! engine, never in the page.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;

use crate::core::filters::error::{FilterError, FilterResult};

/// Current snapshot envelope version. Bump when the layout changes
/// incompatibly; older envelopes are discarded on load.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Versioned wrapper around a store's persisted fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub fields: JsonValue,
}

impl SnapshotEnvelope {
    pub fn new(fields: JsonValue) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            fields,
        }
    }

    /// Unwrap the fields object, discarding unknown versions.
    pub fn into_fields(self) -> Option<JsonValue> {
        if self.version == SNAPSHOT_VERSION {
            Some(self.fields)
        } else {
            tracing::warn!(version = self.version, "unknown snapshot version, discarding");
            None
        }
    }
}

/// Asynchronous key/value cache for filter snapshots. Each storage key is
/// exclusively owned by one store; no cross-store coordination is needed.
#[async_trait]
pub trait FilterCache: Send + Sync {
    /// Load the persisted fields for `storage_key`, or `None` when nothing
    /// usable is cached.
    async fn load(&self, storage_key: &str) -> FilterResult<Option<JsonValue>>;

    /// Persist the fields object for `storage_key`, replacing any previous
    /// snapshot.
    async fn store(&self, storage_key: &str, fields: &JsonValue) -> FilterResult<()>;

    /// Drop the snapshot for `storage_key`, if present.
    async fn remove(&self, storage_key: &str) -> FilterResult<()>;
}

// ============================================================================
// In-Memory Cache
// ============================================================================

/// In-memory cache for tests and ephemeral sessions. Can be switched into a
/// failing mode to exercise the engine's degrade-on-error policy.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, SnapshotEnvelope>>,
    failing: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail, simulating an unavailable or
    /// quota-exceeded device store.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> FilterResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(FilterError::persistence("cache unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FilterCache for MemoryCache {
    async fn load(&self, storage_key: &str) -> FilterResult<Option<JsonValue>> {
        self.check_available()?;
        let entries = self.entries.lock().await;
        Ok(entries
            .get(storage_key)
            .cloned()
            .and_then(SnapshotEnvelope::into_fields))
    }

    async fn store(&self, storage_key: &str, fields: &JsonValue) -> FilterResult<()> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        entries.insert(storage_key.to_string(), SnapshotEnvelope::new(fields.clone()));
        Ok(())
    }

    async fn remove(&self, storage_key: &str) -> FilterResult<()> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        entries.remove(storage_key);
        Ok(())
    }
}

// ============================================================================
// File-Backed Cache
// ============================================================================

/// JSON-file-per-key cache under a configured directory. Corrupted blobs
/// load as `None` with a warning; the page stays fully functional.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    dir: PathBuf,
}

impl JsonFileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, storage_key: &str) -> PathBuf {
        // storage keys are internal identifiers; sanitize anyway so a key
        // can never escape the cache directory
        let safe: String = storage_key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

#[async_trait]
impl FilterCache for JsonFileCache {
    async fn load(&self, storage_key: &str) -> FilterResult<Option<JsonValue>> {
        let path = self.path_for(storage_key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice::<SnapshotEnvelope>(&bytes) {
            Ok(envelope) => Ok(envelope.into_fields()),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "corrupted filter snapshot, ignoring"
                );
                Ok(None)
            }
        }
    }

    async fn store(&self, storage_key: &str, fields: &JsonValue) -> FilterResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let envelope = SnapshotEnvelope::new(fields.clone());
        let bytes = serde_json::to_vec_pretty(&envelope)?;
        tokio::fs::write(self.path_for(storage_key), bytes).await?;
        Ok(())
    }

    async fn remove(&self, storage_key: &str) -> FilterResult<()> {
        match tokio::fs::remove_file(self.path_for(storage_key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
