//! # In-Memory Store
//!
//! A `HashMap`-backed [`KeyValueStore`] for tests and ephemeral runs.
//! No durability, but the same observable contract as the SQLite
//! backend, including batch atomicity (the whole batch lands under one
//! lock acquisition).

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::error::StoreResult;
use crate::store::KeyValueStore;

/// In-memory key-value store.
///
/// ## Usage
/// ```rust,ignore
/// let store = Arc::new(MemoryStore::new());
/// let ledger = Ledger::new(store);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Creates a store pre-populated with the given entries. Handy for
    /// tests that start from a legacy on-disk state.
    pub fn with_entries(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        MemoryStore {
            entries: Mutex::new(entries.into_iter().collect()),
        }
    }

    /// Number of keys currently stored (for test assertions).
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> StoreResult<()> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn put_many(&self, batch: Vec<(String, Value)>) -> StoreResult<()> {
        // One lock acquisition for the whole batch: readers never
        // observe a partially applied unit.
        let mut entries = self.entries.lock().await;
        for (key, value) in batch {
            entries.insert(key, value);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn clear_all(&self) -> StoreResult<()> {
        self.entries.lock().await.clear();
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
