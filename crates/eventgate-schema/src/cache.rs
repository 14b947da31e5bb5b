//! Subject-keyed schema cache with single-flight fetch coalescing.
//!
//! A cache hit returns the stored entry with no network call. A miss fetches
//! the latest version from the registry, parses it, and memoizes the result
//! for the process lifetime. Concurrent misses for the same subject are
//! coalesced: one fetch goes out, late arrivers block on a per-subject lock
//! and pick up the stored entry when it lands.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use apache_avro::Schema;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::error::SchemaFetchError;
use crate::registry::RegistryClient;

/// A resolved schema for one subject.
///
/// Immutable once created; the parsed schema is shared read-only across all
/// concurrent encode/decode calls. A registry ID is never reused for a
/// different schema body within the cache's lifetime — if the registry
/// rotates the ID for a subject, [`SchemaCache::refresh`] installs a fresh
/// entry and drops the stale one.
#[derive(Debug)]
pub struct SchemaEntry {
    pub subject: String,
    pub registry_id: u32,
    pub schema: Schema,
    pub fetched_at: SystemTime,
}

/// Memoizing resolver from subject name to [`SchemaEntry`].
pub struct SchemaCache {
    registry: RegistryClient,
    entries: RwLock<HashMap<String, Arc<SchemaEntry>>>,
    /// Per-subject fetch gates. Holding a subject's gate means a fetch for it
    /// is (or was just) in flight.
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SchemaCache {
    pub fn new(registry: RegistryClient) -> Self {
        Self {
            registry,
            entries: RwLock::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a subject to its latest schema, fetching at most once.
    pub async fn resolve(&self, subject: &str) -> Result<Arc<SchemaEntry>, SchemaFetchError> {
        if let Some(entry) = self.entries.read().await.get(subject) {
            trace!(subject = subject, registry_id = entry.registry_id, "schema cache hit");
            return Ok(entry.clone());
        }

        let gate = {
            let mut inflight = self.inflight.lock().await;
            inflight
                .entry(subject.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _fetch_permit = gate.lock().await;

        // A coalesced fetch may have completed while we waited on the gate.
        if let Some(entry) = self.entries.read().await.get(subject) {
            return Ok(entry.clone());
        }

        let result = self.fetch_entry(subject).await;
        if let Ok(entry) = &result {
            // Publish the entry before retiring the gate: newcomers hit the
            // cache and never reach the gate. On failure the gate stays in the
            // map, so retries for this subject keep serializing through it.
            self.entries
                .write()
                .await
                .insert(subject.to_string(), entry.clone());
            self.inflight.lock().await.remove(subject);
        }
        result
    }

    /// Bypass the cache and replace the stored entry with a fresh fetch.
    ///
    /// This is the new-entry-on-new-ID path for mid-process schema evolution:
    /// the stale entry is dropped from the cache but stays valid for callers
    /// still holding it.
    pub async fn refresh(&self, subject: &str) -> Result<Arc<SchemaEntry>, SchemaFetchError> {
        let entry = self.fetch_entry(subject).await?;
        let previous = self
            .entries
            .write()
            .await
            .insert(subject.to_string(), entry.clone());

        if let Some(previous) = previous {
            if previous.registry_id != entry.registry_id {
                debug!(
                    subject = subject,
                    old_id = previous.registry_id,
                    new_id = entry.registry_id,
                    "registry id rotated, replaced cache entry"
                );
            }
        }

        Ok(entry)
    }

    /// Look up the cached entry without fetching.
    pub async fn lookup(&self, subject: &str) -> Option<Arc<SchemaEntry>> {
        self.entries.read().await.get(subject).cloned()
    }

    async fn fetch_entry(&self, subject: &str) -> Result<Arc<SchemaEntry>, SchemaFetchError> {
        let (registry_id, schema_text) = self.registry.fetch_latest(subject).await?;

        let schema = Schema::parse_str(&schema_text).map_err(|e| SchemaFetchError::Parse {
            subject: subject.to_string(),
            reason: e.to_string(),
        })?;

        debug!(subject = subject, registry_id = registry_id, "schema resolved");

        Ok(Arc::new(SchemaEntry {
            subject: subject.to_string(),
            registry_id,
            schema,
            fetched_at: SystemTime::now(),
        }))
    }
}
