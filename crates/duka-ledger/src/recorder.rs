//! # Transaction Recorder
//!
//! The single write path that keeps the four balances mutually
//! consistent when a transaction is booked.
//!
//! ## Effects By Transaction Kind
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Draft                 │ Stock/Float      │ Cash     │ Commis.  │
//! ├────────────────────────┼──────────────────┼──────────┼──────────┤
//! │  Shop sale             │ stock − qty      │ + price  │    -     │
//! │  Shop restock          │ stock + qty      │ − cost   │    -     │
//! │  Float withdrawal      │ float + amount   │ − amount │ + fee    │
//! │  Float deposit         │ float − amount   │ + amount │ + fee    │
//! └────────────────────────┴──────────────────┴──────────┴──────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Unit economics for shop entries are copied from the inventory item
//! *at record time*. A later price change never rewrites history.
//!
//! ## Mechanics, Not Policy
//! The recorder does not reject a sale that drives stock negative or a
//! deposit that overdraws float - whether the user may do something is
//! the calling layer's decision (see `duka_core::validation`). The
//! recorder's only rejections are structural: a blank subject name.
//!
//! ## Atomicity
//! Every key a single `record` call touches (log, cash, one collection,
//! commission scalar) is persisted through one [`KeyValueStore::put_many`]
//! batch. If that batch fails the error propagates and the caller must
//! re-check balances; it must never report success.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{LedgerResult, StoreError};
use crate::repository::balance::{encode_scalar, BalanceRepository};
use crate::repository::collection::{name_matches, KeyedCollection, LedgerRecord};
use crate::repository::transactions::{encode_log, TransactionRepository};
use crate::store::{keys, KeyValueStore};
use duka_core::commission::{commission_for, matches_network};
use duka_core::types::{
    FloatDirection, FloatEntry, InventoryItem, StockMovement, Transaction, TransactionDraft,
    TransactionEntry,
};
use duka_core::validation::validate_name;

// =============================================================================
// Record Outcome
// =============================================================================

/// What happened when a draft was recorded.
///
/// Unknown subjects are outcomes, not errors: a voice-dictated or
/// slightly mistyped name must not hard-fail the booking, but the UI
/// needs enough signal to warn the user that balances were not (fully)
/// touched.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// All balance effects applied.
    Applied(Transaction),

    /// Shop transaction against an item the inventory doesn't know:
    /// logged with zero unit economics, stock and cash untouched.
    LoggedUnknownItem(Transaction),

    /// Mobile-money movement on an unconfigured network: cash moved
    /// and the record was logged, but no float entry was updated and
    /// the commission fell back to zero.
    AppliedUnknownNetwork(Transaction),
}

impl RecordOutcome {
    /// The logged transaction, whatever the outcome.
    pub fn transaction(&self) -> &Transaction {
        match self {
            RecordOutcome::Applied(tx)
            | RecordOutcome::LoggedUnknownItem(tx)
            | RecordOutcome::AppliedUnknownNetwork(tx) => tx,
        }
    }

    /// Whether every balance effect was applied.
    pub fn fully_applied(&self) -> bool {
        matches!(self, RecordOutcome::Applied(_))
    }
}

// =============================================================================
// Transaction Recorder
// =============================================================================

/// The central write path for the ledger.
#[derive(Clone)]
pub struct TransactionRecorder {
    store: Arc<dyn KeyValueStore>,
    inventory: KeyedCollection<InventoryItem>,
    float: KeyedCollection<FloatEntry>,
    balances: BalanceRepository,
    transactions: TransactionRepository,
}

impl TransactionRecorder {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        TransactionRecorder {
            inventory: KeyedCollection::new(Arc::clone(&store)),
            float: KeyedCollection::new(Arc::clone(&store)),
            balances: BalanceRepository::new(Arc::clone(&store)),
            transactions: TransactionRepository::new(Arc::clone(&store)),
            store,
        }
    }

    /// Validates the draft structurally, applies its effects and
    /// persists everything touched as one batch.
    ///
    /// Id and timestamp are assigned here; callers cannot supply them.
    pub async fn record(&self, draft: TransactionDraft) -> LedgerResult<RecordOutcome> {
        let field = match &draft {
            TransactionDraft::FloatMovement { .. } => "network",
            _ => "itemName",
        };
        validate_name(field, draft.subject())?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        match draft {
            TransactionDraft::ShopSale {
                item_name,
                quantity,
                notes,
            } => {
                self.record_shop(id, now, item_name, StockMovement::Sale, quantity, notes)
                    .await
            }
            TransactionDraft::ShopRestock {
                item_name,
                quantity,
                notes,
            } => {
                self.record_shop(id, now, item_name, StockMovement::Restock, quantity, notes)
                    .await
            }
            TransactionDraft::FloatMovement {
                network,
                direction,
                amount,
                notes,
            } => {
                self.record_float(id, now, network, direction, amount, notes)
                    .await
            }
        }
    }

    async fn record_shop(
        &self,
        id: String,
        now: DateTime<Utc>,
        item_name: String,
        movement: StockMovement,
        quantity: i64,
        notes: Option<String>,
    ) -> LedgerResult<RecordOutcome> {
        let mut items = self.inventory.list().await;
        let mut log = self.transactions.list().await;

        let position = items
            .iter()
            .position(|item| name_matches(&item.item_name, &item_name));

        let Some(index) = position else {
            // Degraded booking: the record survives, the balances don't
            // move, and the outcome tells the UI to warn.
            warn!(item = %item_name, "Recording against unknown item; stock and cash untouched");

            let tx = Transaction {
                id,
                recorded_at: now,
                notes,
                entry: TransactionEntry::Shop {
                    item_name,
                    movement,
                    quantity,
                    unit_cost: 0,
                    unit_price: 0,
                    amount: 0,
                },
            };
            log.push(tx.clone());

            self.store
                .put_many(vec![(keys::TRANSACTIONS.to_string(), encode_log(&log)?)])
                .await?;
            return Ok(RecordOutcome::LoggedUnknownItem(tx));
        };

        // Unit economics at the time of recording, not a later value.
        let unit_cost = items[index].cost_price;
        let unit_price = items[index].selling_price;

        let (stock_delta, amount, cash_delta) = match movement {
            StockMovement::Sale => (-quantity, unit_price * quantity, unit_price * quantity),
            StockMovement::Restock => (quantity, unit_cost * quantity, -(unit_cost * quantity)),
        };

        items[index].current_stock += stock_delta;
        items[index].touch(now);
        let cash = self.balances.physical_cash().await + cash_delta;

        let tx = Transaction {
            id,
            recorded_at: now,
            notes,
            entry: TransactionEntry::Shop {
                item_name: items[index].item_name.clone(),
                movement,
                quantity,
                unit_cost,
                unit_price,
                amount,
            },
        };
        log.push(tx.clone());

        debug!(
            id = %tx.id,
            item = %tx.subject(),
            ?movement,
            quantity,
            amount,
            "Recording shop transaction"
        );

        self.store
            .put_many(vec![
                (keys::TRANSACTIONS.to_string(), encode_log(&log)?),
                (keys::GENERAL_INVENTORY.to_string(), encode_collection(&items)?),
                (keys::PHYSICAL_CASH.to_string(), encode_scalar(cash)),
            ])
            .await?;

        Ok(RecordOutcome::Applied(tx))
    }

    async fn record_float(
        &self,
        id: String,
        now: DateTime<Utc>,
        network: String,
        direction: FloatDirection,
        amount: i64,
        notes: Option<String>,
    ) -> LedgerResult<RecordOutcome> {
        let mut entries = self.float.list().await;
        let mut log = self.transactions.list().await;

        // Zero for unknown networks or unusable rates; never blocks.
        let commission = commission_for(&entries, &network, amount, direction);

        // Withdrawal: till cash goes out, e-value comes back from the
        // network. Deposit is the mirror image.
        let cash_delta = match direction {
            FloatDirection::Withdrawal => -amount,
            FloatDirection::Deposit => amount,
        };
        let float_delta = -cash_delta;

        let cash = self.balances.physical_cash().await + cash_delta;
        let earnings = self.balances.commission_earnings().await + commission;

        let tx = Transaction {
            id,
            recorded_at: now,
            notes,
            entry: TransactionEntry::MobileMoney {
                network: network.clone(),
                direction,
                amount,
                commission,
            },
        };
        log.push(tx.clone());

        debug!(
            id = %tx.id,
            network = %network,
            ?direction,
            amount,
            commission,
            "Recording mobile-money transaction"
        );

        let mut batch = vec![
            (keys::TRANSACTIONS.to_string(), encode_log(&log)?),
            (keys::PHYSICAL_CASH.to_string(), encode_scalar(cash)),
            (keys::COMMISSION_EARNINGS.to_string(), encode_scalar(earnings)),
        ];

        let matched = entries
            .iter()
            .position(|entry| matches_network(entry, &network));

        match matched {
            Some(index) => {
                entries[index].balance += float_delta;
                entries[index].touch(now);
                batch.push((
                    keys::MOBILE_MONEY_FLOAT.to_string(),
                    encode_collection(&entries)?,
                ));
                self.store.put_many(batch).await?;
                Ok(RecordOutcome::Applied(tx))
            }
            None => {
                warn!(network = %network, "Unknown network; float balance untouched");
                self.store.put_many(batch).await?;
                Ok(RecordOutcome::AppliedUnknownNetwork(tx))
            }
        }
    }
}

fn encode_collection<T: LedgerRecord>(entries: &[T]) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(entries)?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{FloatRepository, InventoryRepository};
    use crate::store::MemoryStore;
    use duka_core::types::{CommissionRates, FloatUpsert, InventoryUpsert};

    struct Fixture {
        store: Arc<MemoryStore>,
        recorder: TransactionRecorder,
        inventory: InventoryRepository,
        float: FloatRepository,
        balances: BalanceRepository,
        transactions: TransactionRepository,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let dyn_store: Arc<dyn KeyValueStore> = Arc::clone(&store) as Arc<dyn KeyValueStore>;
        Fixture {
            recorder: TransactionRecorder::new(Arc::clone(&dyn_store)),
            inventory: InventoryRepository::new(Arc::clone(&dyn_store)),
            float: FloatRepository::new(Arc::clone(&dyn_store)),
            balances: BalanceRepository::new(Arc::clone(&dyn_store)),
            transactions: TransactionRepository::new(dyn_store),
            store,
        }
    }

    async fn stock_sugar(fx: &Fixture) {
        let patch = InventoryUpsert {
            item_name: "Sugar".to_string(),
            current_stock: Some(10),
            cost_price: Some(80),
            selling_price: Some(100),
            ..InventoryUpsert::default()
        };
        fx.inventory.upsert(&patch).await.unwrap();
    }

    async fn configure_mtn(fx: &Fixture) {
        let patch = FloatUpsert {
            network: "Mtn".to_string(),
            balance: Some(500_000),
            commission_rates: Some(CommissionRates {
                deposit: 0.01,
                withdrawal: 0.015,
            }),
            ..FloatUpsert::default()
        };
        fx.float.upsert(&patch).await.unwrap();
    }

    #[tokio::test]
    async fn test_conservation_under_sale() {
        let fx = fixture();
        stock_sugar(&fx).await;

        let outcome = fx
            .recorder
            .record(TransactionDraft::ShopSale {
                item_name: "sugar".to_string(),
                quantity: 3,
                notes: None,
            })
            .await
            .unwrap();

        assert!(outcome.fully_applied());
        let item = fx.inventory.find("Sugar").await.unwrap();
        assert_eq!(item.current_stock, 7);
        assert_eq!(fx.balances.physical_cash().await, 300);
        assert_eq!(fx.transactions.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_restock_spends_cost_price() {
        let fx = fixture();
        stock_sugar(&fx).await;
        fx.balances.set_physical_cash(1_000).await.unwrap();

        fx.recorder
            .record(TransactionDraft::ShopRestock {
                item_name: "SUGAR".to_string(),
                quantity: 5,
                notes: None,
            })
            .await
            .unwrap();

        let item = fx.inventory.find("Sugar").await.unwrap();
        assert_eq!(item.current_stock, 15);
        // 5 units at cost 80
        assert_eq!(fx.balances.physical_cash().await, 600);
    }

    #[tokio::test]
    async fn test_conservation_under_withdrawal() {
        let fx = fixture();
        configure_mtn(&fx).await;
        fx.balances.set_physical_cash(1_000_000).await.unwrap();

        let outcome = fx
            .recorder
            .record(TransactionDraft::FloatMovement {
                network: "Mtn".to_string(),
                direction: FloatDirection::Withdrawal,
                amount: 50_000,
                notes: None,
            })
            .await
            .unwrap();

        assert!(outcome.fully_applied());
        assert_eq!(fx.balances.physical_cash().await, 950_000);
        assert_eq!(fx.float.find("Mtn").await.unwrap().balance, 550_000);
        assert_eq!(fx.balances.commission_earnings().await, 750);

        match &outcome.transaction().entry {
            TransactionEntry::MobileMoney { commission, .. } => assert_eq!(*commission, 750),
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_deposit_inverts_signs() {
        let fx = fixture();
        configure_mtn(&fx).await;
        fx.balances.set_physical_cash(100_000).await.unwrap();

        fx.recorder
            .record(TransactionDraft::FloatMovement {
                network: "mtn momo".to_string(),
                direction: FloatDirection::Deposit,
                amount: 20_000,
                notes: None,
            })
            .await
            .unwrap();

        assert_eq!(fx.balances.physical_cash().await, 120_000);
        assert_eq!(fx.float.find("Mtn").await.unwrap().balance, 480_000);
        assert_eq!(fx.balances.commission_earnings().await, 200);
    }

    #[tokio::test]
    async fn test_unknown_item_logged_but_balances_untouched() {
        let fx = fixture();
        stock_sugar(&fx).await;
        fx.balances.set_physical_cash(500).await.unwrap();

        let outcome = fx
            .recorder
            .record(TransactionDraft::ShopSale {
                item_name: "Mystery Item".to_string(),
                quantity: 2,
                notes: None,
            })
            .await
            .unwrap();

        assert!(matches!(outcome, RecordOutcome::LoggedUnknownItem(_)));
        assert!(!outcome.fully_applied());

        // The record is in the log, the books did not move.
        assert_eq!(fx.transactions.list().await.len(), 1);
        assert_eq!(fx.balances.physical_cash().await, 500);
        assert_eq!(fx.inventory.find("Sugar").await.unwrap().current_stock, 10);
    }

    #[tokio::test]
    async fn test_unknown_network_moves_cash_without_float() {
        let fx = fixture();
        fx.balances.set_physical_cash(100_000).await.unwrap();

        let outcome = fx
            .recorder
            .record(TransactionDraft::FloatMovement {
                network: "UnknownNet".to_string(),
                direction: FloatDirection::Deposit,
                amount: 10_000,
                notes: None,
            })
            .await
            .unwrap();

        assert!(matches!(outcome, RecordOutcome::AppliedUnknownNetwork(_)));
        assert_eq!(fx.balances.physical_cash().await, 110_000);
        assert_eq!(fx.balances.commission_earnings().await, 0);
        assert!(fx.float.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_subject_rejected_before_io() {
        let fx = fixture();

        let result = fx
            .recorder
            .record(TransactionDraft::ShopSale {
                item_name: "  ".to_string(),
                quantity: 1,
                notes: None,
            })
            .await;

        assert!(result.is_err());
        assert!(fx.store.is_empty().await, "no partial state may be left");
    }

    #[tokio::test]
    async fn test_recorder_is_mechanics_not_policy() {
        let fx = fixture();
        stock_sugar(&fx).await;

        // Selling more than is on the shelf is the caller's problem to
        // block; the ledger books it faithfully.
        fx.recorder
            .record(TransactionDraft::ShopSale {
                item_name: "Sugar".to_string(),
                quantity: 25,
                notes: None,
            })
            .await
            .unwrap();

        assert_eq!(fx.inventory.find("Sugar").await.unwrap().current_stock, -15);
        assert_eq!(fx.balances.physical_cash().await, 2_500);
    }
}
