//! # Transaction Log Repository
//!
//! The append-only ledger log under
//! [`keys::TRANSACTIONS`](crate::store::keys::TRANSACTIONS).
//!
//! Records are immutable once written; corrections are compensating
//! appends. The only bulk mutation is [`TransactionRepository::overwrite`],
//! used by initialization and full clears, and it is a single store
//! write.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{LedgerResult, StoreError};
use crate::store::{keys, KeyValueStore};
use duka_core::types::Transaction;

/// Encodes a full log for persistence.
pub(crate) fn encode_log(log: &[Transaction]) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(log)?)
}

/// Repository for the transaction log.
#[derive(Clone)]
pub struct TransactionRepository {
    store: Arc<dyn KeyValueStore>,
}

impl TransactionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        TransactionRepository { store }
    }

    /// Returns the full log in insertion order. Callers filter and
    /// sort. Never fails: read errors and undecodable logs degrade to
    /// empty with a `warn!`.
    pub async fn list(&self) -> Vec<Transaction> {
        let value = match self.store.get(keys::TRANSACTIONS).await {
            Ok(Some(value)) => value,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "Transaction log read failed, defaulting to empty");
                return Vec::new();
            }
        };

        match serde_json::from_value(value) {
            Ok(log) => log,
            Err(err) => {
                warn!(error = %err, "Transaction log undecodable, defaulting to empty");
                Vec::new()
            }
        }
    }

    /// Appends one record, preserving insertion order, via the usual
    /// read-all / write-all cycle.
    pub async fn append(&self, transaction: Transaction) -> LedgerResult<()> {
        debug!(id = %transaction.id, subject = transaction.subject(), "Appending transaction");

        let mut log = self.list().await;
        log.push(transaction);
        self.store
            .put(keys::TRANSACTIONS, encode_log(&log)?)
            .await?;
        Ok(())
    }

    /// Replaces the log wholesale in one write.
    pub async fn overwrite(&self, log: &[Transaction]) -> LedgerResult<()> {
        self.store
            .put(keys::TRANSACTIONS, encode_log(log)?)
            .await?;
        Ok(())
    }

    /// Empties the log.
    pub async fn clear(&self) -> LedgerResult<()> {
        self.overwrite(&[]).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use duka_core::types::{StockMovement, TransactionEntry};

    fn tx(id: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            recorded_at: Utc::now(),
            notes: None,
            entry: TransactionEntry::Shop {
                item_name: "Sugar".to_string(),
                movement: StockMovement::Sale,
                quantity: 1,
                unit_cost: 80,
                unit_price: 100,
                amount: 100,
            },
        }
    }

    #[tokio::test]
    async fn test_append_preserves_insertion_order() {
        let repo = TransactionRepository::new(Arc::new(MemoryStore::new()));

        repo.append(tx("t-1")).await.unwrap();
        repo.append(tx("t-2")).await.unwrap();
        repo.append(tx("t-3")).await.unwrap();

        let ids: Vec<String> = repo.list().await.into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["t-1", "t-2", "t-3"]);
    }

    #[tokio::test]
    async fn test_overwrite_and_clear() {
        let repo = TransactionRepository::new(Arc::new(MemoryStore::new()));
        repo.append(tx("t-1")).await.unwrap();

        repo.overwrite(&[tx("t-9")]).await.unwrap();
        let ids: Vec<String> = repo.list().await.into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["t-9"]);

        repo.clear().await.unwrap();
        assert!(repo.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_store_lists_empty() {
        let repo = TransactionRepository::new(Arc::new(MemoryStore::new()));
        assert!(repo.list().await.is_empty());
    }
}
