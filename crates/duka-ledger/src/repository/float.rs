//! # Float Repository
//!
//! Mobile-money network balances, persisted under
//! [`keys::MOBILE_MONEY_FLOAT`](crate::store::keys::MOBILE_MONEY_FLOAT).
//! Contract is symmetric with the inventory repository; only the entity
//! shape differs.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::error::LedgerResult;
use crate::repository::collection::{KeyedCollection, LedgerRecord, RecordPatch};
use crate::store::{keys, KeyValueStore};
use duka_core::types::{FloatEntry, FloatUpsert};
use duka_core::validation::validate_rate;

impl LedgerRecord for FloatEntry {
    const STORE_KEY: &'static str = keys::MOBILE_MONEY_FLOAT;
    const ENTITY: &'static str = "FloatEntry";
    const NAME_FIELD: &'static str = "network";

    fn natural_key(&self) -> &str {
        &self.network
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_updated = now;
    }
}

impl RecordPatch<FloatEntry> for FloatUpsert {
    fn natural_key(&self) -> &str {
        &self.network
    }

    fn merge_into(&self, existing: &mut FloatEntry) {
        if let Some(balance) = self.balance {
            existing.balance = balance;
        }
        if let Some(rates) = self.commission_rates {
            existing.commission_rates = rates;
        }
        if let Some(keywords) = &self.voice_keywords {
            existing.voice_keywords = keywords.clone();
        }
    }

    fn build(&self, id: String, now: DateTime<Utc>) -> FloatEntry {
        FloatEntry {
            id,
            network: self.network.trim().to_string(),
            balance: self.balance.unwrap_or(0),
            commission_rates: self.commission_rates.unwrap_or_default(),
            voice_keywords: self.voice_keywords.clone().unwrap_or_default(),
            created_at: now,
            last_updated: now,
        }
    }
}

/// Repository for mobile-money float entries.
#[derive(Clone)]
pub struct FloatRepository {
    entries: KeyedCollection<FloatEntry>,
}

impl FloatRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        FloatRepository {
            entries: KeyedCollection::new(store),
        }
    }

    /// All entries, normalized.
    pub async fn list(&self) -> Vec<FloatEntry> {
        self.entries.list().await
    }

    /// One entry by case-insensitive network name.
    pub async fn find(&self, network: &str) -> Option<FloatEntry> {
        self.entries.find(network).await
    }

    /// Merge-or-insert. Rejects NaN/out-of-range commission rates
    /// before any I/O; NaN must never reach the store.
    pub async fn upsert(&self, patch: &FloatUpsert) -> LedgerResult<FloatEntry> {
        if let Some(rates) = patch.commission_rates {
            validate_rate("deposit rate", rates.deposit)?;
            validate_rate("withdrawal rate", rates.withdrawal)?;
        }
        self.entries.upsert(patch).await
    }

    /// Removes one entry by name; `false` (not an error) on a miss.
    pub async fn delete(&self, network: &str) -> LedgerResult<bool> {
        self.entries.delete(network).await
    }

    /// Resets the collection to empty.
    pub async fn clear(&self) -> LedgerResult<()> {
        self.entries.clear().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use duka_core::types::CommissionRates;

    fn repo() -> FloatRepository {
        FloatRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_upsert_and_find_case_insensitive() {
        let repo = repo();

        let patch = FloatUpsert {
            network: "MTN".to_string(),
            balance: Some(500_000),
            commission_rates: Some(CommissionRates {
                deposit: 0.01,
                withdrawal: 0.015,
            }),
            ..FloatUpsert::default()
        };
        repo.upsert(&patch).await.unwrap();

        let entry = repo.find("mtn").await.expect("entry should resolve");
        assert_eq!(entry.balance, 500_000);
        assert!((entry.commission_rates.withdrawal - 0.015).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_nan_rate_rejected() {
        let repo = repo();

        let patch = FloatUpsert {
            network: "Airtel".to_string(),
            commission_rates: Some(CommissionRates {
                deposit: f64::NAN,
                withdrawal: 0.01,
            }),
            ..FloatUpsert::default()
        };

        assert!(repo.upsert(&patch).await.is_err());
        assert!(repo.list().await.is_empty(), "nothing may reach the store");
    }

    #[tokio::test]
    async fn test_omitted_rates_keep_existing() {
        let repo = repo();

        let patch = FloatUpsert {
            network: "Airtel".to_string(),
            balance: Some(300_000),
            commission_rates: Some(CommissionRates {
                deposit: 0.01,
                withdrawal: 0.012,
            }),
            ..FloatUpsert::default()
        };
        repo.upsert(&patch).await.unwrap();

        let mut patch = FloatUpsert::named("AIRTEL");
        patch.balance = Some(250_000);
        let saved = repo.upsert(&patch).await.unwrap();

        assert_eq!(saved.balance, 250_000);
        assert!((saved.commission_rates.deposit - 0.01).abs() < f64::EPSILON);
        assert_eq!(repo.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let repo = repo();
        repo.upsert(&FloatUpsert::named("MTN")).await.unwrap();
        repo.upsert(&FloatUpsert::named("Airtel")).await.unwrap();

        assert!(repo.delete("mtn").await.unwrap());
        assert!(!repo.delete("mtn").await.unwrap());
        assert_eq!(repo.list().await.len(), 1);

        repo.clear().await.unwrap();
        assert!(repo.list().await.is_empty());
    }
}
