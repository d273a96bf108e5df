//! # Ledger Facade
//!
//! The single entry point the calling layer talks to.
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Ledger                                 │
//! │                                                                 │
//! │  inventory() ─► InventoryRepository ─┐                          │
//! │  float() ─────► FloatRepository ─────┤                          │
//! │  balances() ──► BalanceRepository ───┼──► Arc<dyn KeyValueStore>│
//! │  transactions() TransactionRepository┤                          │
//! │  periods() ───► PeriodRepository ────┤                          │
//! │                                      │                          │
//! │  record_transaction() ► Recorder ────┤                          │
//! │  open/close/summary() ► SummaryEngine┘                          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Constructed once at startup from an injected store handle; tests
//! pass a [`MemoryStore`](crate::store::MemoryStore), the application
//! passes a [`SqliteStore`](crate::store::SqliteStore). Nothing outside
//! this crate writes store keys directly.
//!
//! All calls are async and fire-to-completion; the calling layer is
//! expected to keep at most one mutation in flight at a time (disable
//! the button while saving), matching the store's read-modify-write
//! collection cycles.

use std::sync::Arc;

use crate::error::LedgerResult;
use crate::recorder::{RecordOutcome, TransactionRecorder};
use crate::repository::{
    BalanceRepository, FloatRepository, InventoryRepository, PeriodRepository,
    TransactionRepository,
};
use crate::store::KeyValueStore;
use crate::summary::SummaryEngine;
use duka_core::commission::commission_for;
use duka_core::types::{
    BusinessPeriod, FloatDirection, SummaryReport, Transaction, TransactionDraft,
};

/// Facade over all ledger state, constructed once per store.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn KeyValueStore>,
    inventory: InventoryRepository,
    float: FloatRepository,
    balances: BalanceRepository,
    transactions: TransactionRepository,
    periods: PeriodRepository,
    recorder: TransactionRecorder,
    engine: SummaryEngine,
}

impl Ledger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Ledger {
            inventory: InventoryRepository::new(Arc::clone(&store)),
            float: FloatRepository::new(Arc::clone(&store)),
            balances: BalanceRepository::new(Arc::clone(&store)),
            transactions: TransactionRepository::new(Arc::clone(&store)),
            periods: PeriodRepository::new(Arc::clone(&store)),
            recorder: TransactionRecorder::new(Arc::clone(&store)),
            engine: SummaryEngine::new(Arc::clone(&store)),
            store,
        }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    pub fn inventory(&self) -> &InventoryRepository {
        &self.inventory
    }

    pub fn float(&self) -> &FloatRepository {
        &self.float
    }

    pub fn balances(&self) -> &BalanceRepository {
        &self.balances
    }

    pub fn periods(&self) -> &PeriodRepository {
        &self.periods
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Books a draft through the recorder; see
    /// [`TransactionRecorder::record`] for the balance effects.
    pub async fn record_transaction(&self, draft: TransactionDraft) -> LedgerResult<RecordOutcome> {
        self.recorder.record(draft).await
    }

    /// The full transaction log in insertion order.
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.transactions.list().await
    }

    /// Empties the transaction log. Balances are left as they are;
    /// clearing history is not an undo.
    pub async fn clear_transactions(&self) -> LedgerResult<()> {
        self.transactions.clear().await
    }

    /// Previews the commission a float movement would earn, without
    /// recording anything. Unknown networks preview as 0.
    pub async fn calculate_commission(
        &self,
        network: &str,
        amount: i64,
        direction: FloatDirection,
    ) -> i64 {
        commission_for(&self.float.list().await, network, amount, direction)
    }

    // =========================================================================
    // Business Period & Summary
    // =========================================================================

    pub async fn business_period(&self) -> BusinessPeriod {
        self.engine.period_state().await
    }

    pub async fn open_business(&self) -> LedgerResult<()> {
        self.engine.open_business().await
    }

    pub async fn close_business(&self) -> LedgerResult<SummaryReport> {
        self.engine.close_business().await
    }

    pub async fn summary(&self) -> LedgerResult<SummaryReport> {
        self.engine.summary().await
    }

    // =========================================================================
    // Whole-Store Operations
    // =========================================================================

    /// Wipes every key, including the first-launch flag. Intended for
    /// the explicit "reset my shop" action, nothing else.
    pub async fn clear_all(&self) -> LedgerResult<()> {
        self.store.clear_all().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
