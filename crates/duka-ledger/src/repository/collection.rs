//! # Keyed Collection Repository
//!
//! The one copy of the read-all / mutate / write-all machinery shared
//! by the inventory and float collections.
//!
//! ## The Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │          Every collection save is a full cycle                  │
//! │                                                                 │
//! │   read entire collection ──► apply ONE entry change in          │
//! │        from the store          memory (merge / insert /         │
//! │              │                 remove)                          │
//! │              │                        │                         │
//! │              └────────────────────────▼                         │
//! │                        write the ENTIRE collection              │
//! │                        back in one store put                    │
//! │                                                                 │
//! │  Never several partial writes for one logical update: a single  │
//! │  put per collection per operation is what keeps interleaved     │
//! │  calls from corrupting the books.                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads never fail: a storage error or an undecodable value degrades
//! to an empty collection with a `warn!`, so the app stays usable on a
//! fresh or damaged store. Writes always propagate their errors.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{LedgerResult, StoreError};
use crate::store::KeyValueStore;
use duka_core::validation::validate_name;

// =============================================================================
// Record Traits
// =============================================================================

/// A collection entry addressed by a case-insensitive natural key.
pub trait LedgerRecord: Clone + Serialize + DeserializeOwned + Send + Sync {
    /// Store key the whole collection persists under.
    const STORE_KEY: &'static str;
    /// Entity label for logs and validation messages.
    const ENTITY: &'static str;
    /// Field name of the natural key, for validation messages.
    const NAME_FIELD: &'static str;

    /// The natural key (item name / network name).
    fn natural_key(&self) -> &str;

    /// Refreshes the last-updated timestamp.
    fn touch(&mut self, now: DateTime<Utc>);
}

/// An upsert patch for a [`LedgerRecord`].
///
/// `merge_into` must let present fields win while absent numeric fields
/// fall back to the existing record's values (never to zero); `build`
/// constructs a fresh record when no match exists.
pub trait RecordPatch<T: LedgerRecord>: Send + Sync {
    /// The natural key this patch targets.
    fn natural_key(&self) -> &str;

    /// Applies the patch onto an existing record.
    fn merge_into(&self, existing: &mut T);

    /// Builds a brand-new record with the given identity.
    fn build(&self, id: String, now: DateTime<Utc>) -> T;
}

/// Case-insensitive natural-key comparison used for every lookup.
pub(crate) fn name_matches(candidate: &str, query: &str) -> bool {
    candidate.trim().eq_ignore_ascii_case(query.trim())
}

// =============================================================================
// Keyed Collection
// =============================================================================

/// Generic repository over one collection-valued store key.
pub struct KeyedCollection<T> {
    store: Arc<dyn KeyValueStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for KeyedCollection<T> {
    fn clone(&self) -> Self {
        KeyedCollection {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T: LedgerRecord> KeyedCollection<T> {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        KeyedCollection {
            store,
            _marker: PhantomData,
        }
    }

    /// Returns all entries, normalized: undecodable state degrades to
    /// empty, blank-named entries are dropped.
    ///
    /// Never fails; callers cannot (and by design need not) distinguish
    /// "truly empty" from "read failed".
    pub async fn list(&self) -> Vec<T> {
        let value = match self.store.get(T::STORE_KEY).await {
            Ok(Some(value)) => value,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(key = T::STORE_KEY, error = %err, "Collection read failed, defaulting to empty");
                return Vec::new();
            }
        };

        match serde_json::from_value::<Vec<T>>(value) {
            Ok(entries) => entries
                .into_iter()
                .filter(|entry| {
                    let keep = !entry.natural_key().trim().is_empty();
                    if !keep {
                        warn!(key = T::STORE_KEY, "Dropping blank-named entry");
                    }
                    keep
                })
                .collect(),
            Err(err) => {
                warn!(key = T::STORE_KEY, error = %err, "Collection undecodable, defaulting to empty");
                Vec::new()
            }
        }
    }

    /// Finds one entry by case-insensitive natural key.
    pub async fn find(&self, name: &str) -> Option<T> {
        self.list()
            .await
            .into_iter()
            .find(|entry| name_matches(entry.natural_key(), name))
    }

    /// Persists the entire collection in one write.
    pub async fn save_all(&self, entries: &[T]) -> LedgerResult<()> {
        let value = serde_json::to_value(entries).map_err(StoreError::from)?;
        self.store.put(T::STORE_KEY, value).await?;
        Ok(())
    }

    /// Merges the patch into the matching entry, or inserts a new
    /// record with a fresh id and timestamps.
    ///
    /// ## Errors
    /// - `ValidationError` when the patch's natural key is blank
    /// - `StoreError` when the single collection write fails (no
    ///   internal retry; the caller surfaces it)
    pub async fn upsert<P: RecordPatch<T>>(&self, patch: &P) -> LedgerResult<T> {
        validate_name(T::NAME_FIELD, patch.natural_key())?;

        let mut entries = self.list().await;
        let now = Utc::now();

        let saved = match entries
            .iter_mut()
            .find(|entry| name_matches(entry.natural_key(), patch.natural_key()))
        {
            Some(existing) => {
                debug!(entity = T::ENTITY, name = patch.natural_key(), "Merging into existing entry");
                patch.merge_into(existing);
                existing.touch(now);
                existing.clone()
            }
            None => {
                debug!(entity = T::ENTITY, name = patch.natural_key(), "Inserting new entry");
                let record = patch.build(Uuid::new_v4().to_string(), now);
                entries.push(record.clone());
                record
            }
        };

        self.save_all(&entries).await?;
        Ok(saved)
    }

    /// Removes the first entry matching the name. Returns whether a
    /// removal occurred; a miss is a no-op, not an error, and performs
    /// no write.
    pub async fn delete(&self, name: &str) -> LedgerResult<bool> {
        let mut entries = self.list().await;

        let position = entries
            .iter()
            .position(|entry| name_matches(entry.natural_key(), name));

        match position {
            Some(index) => {
                entries.remove(index);
                self.save_all(&entries).await?;
                debug!(entity = T::ENTITY, name, "Deleted entry");
                Ok(true)
            }
            None => {
                debug!(entity = T::ENTITY, name, "Delete target not found, no-op");
                Ok(false)
            }
        }
    }

    /// Resets the collection to empty.
    pub async fn clear(&self) -> LedgerResult<()> {
        self.save_all(&[]).await
    }
}
