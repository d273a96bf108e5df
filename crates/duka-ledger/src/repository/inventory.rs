//! # Inventory Repository
//!
//! General-shop stock collection, persisted under
//! [`keys::GENERAL_INVENTORY`](crate::store::keys::GENERAL_INVENTORY).

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::error::LedgerResult;
use crate::repository::collection::{KeyedCollection, LedgerRecord, RecordPatch};
use crate::store::{keys, KeyValueStore};
use duka_core::types::{InventoryItem, InventoryUpsert};

impl LedgerRecord for InventoryItem {
    const STORE_KEY: &'static str = keys::GENERAL_INVENTORY;
    const ENTITY: &'static str = "InventoryItem";
    const NAME_FIELD: &'static str = "itemName";

    fn natural_key(&self) -> &str {
        &self.item_name
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_updated = now;
    }
}

impl RecordPatch<InventoryItem> for InventoryUpsert {
    fn natural_key(&self) -> &str {
        &self.item_name
    }

    fn merge_into(&self, existing: &mut InventoryItem) {
        // Present fields win; absent numerics keep the existing value,
        // never reset to zero.
        if let Some(stock) = self.current_stock {
            existing.current_stock = stock;
        }
        if let Some(cost) = self.cost_price {
            existing.cost_price = cost;
        }
        if let Some(price) = self.selling_price {
            existing.selling_price = price;
        }
        if let Some(unit) = &self.unit {
            existing.unit = unit.clone();
        }
        if let Some(category) = &self.category {
            existing.category = category.clone();
        }
        if let Some(description) = &self.description {
            existing.description = description.clone();
        }
        if let Some(keywords) = &self.voice_keywords {
            existing.voice_keywords = keywords.clone();
        }
    }

    fn build(&self, id: String, now: DateTime<Utc>) -> InventoryItem {
        InventoryItem {
            id,
            item_name: self.item_name.trim().to_string(),
            current_stock: self.current_stock.unwrap_or(0),
            cost_price: self.cost_price.unwrap_or(0),
            selling_price: self.selling_price.unwrap_or(0),
            unit: self.unit.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            voice_keywords: self.voice_keywords.clone().unwrap_or_default(),
            created_at: now,
            last_updated: now,
        }
    }
}

/// Repository for general-shop inventory.
#[derive(Clone)]
pub struct InventoryRepository {
    items: KeyedCollection<InventoryItem>,
}

impl InventoryRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        InventoryRepository {
            items: KeyedCollection::new(store),
        }
    }

    /// All items, numeric fields defaulted, blank names dropped.
    pub async fn list(&self) -> Vec<InventoryItem> {
        self.items.list().await
    }

    /// One item by case-insensitive name.
    pub async fn find(&self, name: &str) -> Option<InventoryItem> {
        self.items.find(name).await
    }

    /// Merge-or-insert; see [`KeyedCollection::upsert`].
    pub async fn upsert(&self, patch: &InventoryUpsert) -> LedgerResult<InventoryItem> {
        self.items.upsert(patch).await
    }

    /// Removes one item by name; `false` (not an error) on a miss.
    pub async fn delete(&self, name: &str) -> LedgerResult<bool> {
        self.items.delete(name).await
    }

    /// Resets the collection to empty.
    pub async fn clear(&self) -> LedgerResult<()> {
        self.items.clear().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn repo() -> InventoryRepository {
        InventoryRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_upsert_then_list_round_trip() {
        let repo = repo();

        let patch = InventoryUpsert {
            item_name: "Sugar".to_string(),
            current_stock: Some(10),
            selling_price: Some(100),
            cost_price: Some(80),
            ..InventoryUpsert::default()
        };
        repo.upsert(&patch).await.unwrap();

        let items = repo.list().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_name, "Sugar");
        assert_eq!(items[0].current_stock, 10);
        assert_eq!(items[0].selling_price, 100);
    }

    #[tokio::test]
    async fn test_case_insensitive_merge_not_duplicate() {
        let repo = repo();

        let mut patch = InventoryUpsert::named("Sugar");
        patch.current_stock = Some(10);
        repo.upsert(&patch).await.unwrap();

        let mut patch = InventoryUpsert::named("SUGAR");
        patch.current_stock = Some(25);
        repo.upsert(&patch).await.unwrap();

        let items = repo.list().await;
        assert_eq!(items.len(), 1, "expected one merged entry, not two");
        assert_eq!(items[0].current_stock, 25);
    }

    #[tokio::test]
    async fn test_omitted_numerics_keep_existing_values() {
        let repo = repo();

        let patch = InventoryUpsert {
            item_name: "Rice".to_string(),
            current_stock: Some(40),
            cost_price: Some(3_000),
            selling_price: Some(3_800),
            ..InventoryUpsert::default()
        };
        repo.upsert(&patch).await.unwrap();

        // A stock-only adjustment must not wipe the prices.
        let mut patch = InventoryUpsert::named("rice");
        patch.current_stock = Some(35);
        let saved = repo.upsert(&patch).await.unwrap();

        assert_eq!(saved.current_stock, 35);
        assert_eq!(saved.cost_price, 3_000);
        assert_eq!(saved.selling_price, 3_800);
    }

    #[tokio::test]
    async fn test_blank_name_rejected_before_io() {
        let repo = repo();
        let result = repo.upsert(&InventoryUpsert::named("   ")).await;
        assert!(result.is_err());
        assert!(repo.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop_not_error() {
        let repo = repo();
        repo.upsert(&InventoryUpsert::named("Soap")).await.unwrap();

        assert!(!repo.delete("Sugar").await.unwrap());
        assert_eq!(repo.list().await.len(), 1);

        assert!(repo.delete("soap").await.unwrap());
        assert!(repo.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_idempotent_listing() {
        let repo = repo();
        repo.upsert(&InventoryUpsert::named("Bread")).await.unwrap();

        let first = repo.list().await;
        let second = repo.list().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_blank_named_legacy_entries_filtered() {
        let store = MemoryStore::with_entries([(
            "general_inventory".to_string(),
            json!([
                { "id": "a", "itemName": "Sugar" },
                { "id": "b", "itemName": "   " },
                { "id": "c", "itemName": "Salt" }
            ]),
        )]);
        let repo = InventoryRepository::new(Arc::new(store));

        let names: Vec<String> = repo
            .list()
            .await
            .into_iter()
            .map(|item| item.item_name)
            .collect();
        assert_eq!(names, vec!["Sugar".to_string(), "Salt".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_collection_defaults_to_empty() {
        let store = MemoryStore::with_entries([(
            "general_inventory".to_string(),
            json!("definitely not an array"),
        )]);
        let repo = InventoryRepository::new(Arc::new(store));
        assert!(repo.list().await.is_empty());
    }
}
