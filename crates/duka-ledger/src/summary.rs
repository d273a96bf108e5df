//! # Summary Engine
//!
//! Business-period state machine plus cache-or-recompute summaries.
//!
//! ## Period State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                                                                 │
//! │            open_business()                                      │
//! │   Closed ────────────────────► Open                             │
//! │      ▲    reset window,          │                              │
//! │      │    zero baseline cache    │                              │
//! │      │                           │                              │
//! │      └───────────────────────────┘                              │
//! │            close_business()                                     │
//! │            compute period summary,                              │
//! │            roll net P&L into cash                               │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Redundant transitions (open while open, close while closed) are not
//! rejected here; whether the button should be enabled is the calling
//! layer's concern. Opening twice just moves the window forward. Note
//! that close does NOT move the window, so closing twice rolls the same
//! net into cash twice - gating the close button is load-bearing for
//! the caller.
//!
//! ## Cache Validity
//! A cached snapshot is trusted only while `calculated_at` falls inside
//! the current window (`>= last_reset`) AND no transaction was recorded
//! after it. Anything else is recomputed from the log, which is sound
//! because [`duka_core::summary::compute`] is deterministic. Without
//! the second condition the all-zero baseline written at open would
//! mask every sale until close.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::LedgerResult;
use crate::repository::balance::{encode_scalar, BalanceRepository};
use crate::repository::period::{encode_reset, encode_snapshot, encode_state, PeriodRepository};
use crate::repository::TransactionRepository;
use crate::store::{keys, KeyValueStore};
use duka_core::summary::compute;
use duka_core::types::{BusinessPeriod, SummaryReport, SummarySnapshot, Transaction};

/// Drives period boundaries and serves summaries.
#[derive(Clone)]
pub struct SummaryEngine {
    store: Arc<dyn KeyValueStore>,
    periods: PeriodRepository,
    balances: BalanceRepository,
    transactions: TransactionRepository,
}

impl SummaryEngine {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        SummaryEngine {
            periods: PeriodRepository::new(Arc::clone(&store)),
            balances: BalanceRepository::new(Arc::clone(&store)),
            transactions: TransactionRepository::new(Arc::clone(&store)),
            store,
        }
    }

    /// Current period state; fresh stores read as closed.
    pub async fn period_state(&self) -> BusinessPeriod {
        self.periods.state().await
    }

    /// Opens a business period: resets the summary window to now and
    /// caches an all-zero baseline. The transaction log is untouched;
    /// only the window moves.
    pub async fn open_business(&self) -> LedgerResult<()> {
        let now = Utc::now();
        let baseline = SummarySnapshot {
            report: SummaryReport::default(),
            calculated_at: now,
        };

        info!(at = %now, "Opening business period");

        self.store
            .put_many(vec![
                (keys::LAST_PERIOD_RESET.to_string(), encode_reset(now)),
                (
                    keys::SUMMARY_SNAPSHOT.to_string(),
                    encode_snapshot(&baseline)?,
                ),
                (
                    keys::BUSINESS_PERIOD.to_string(),
                    encode_state(BusinessPeriod::Open),
                ),
            ])
            .await?;
        Ok(())
    }

    /// Closes the business period: summarizes the window, rolls the
    /// overall net profit or loss into physical cash, caches the final
    /// snapshot and marks the period closed.
    ///
    /// Returns the period's final summary.
    pub async fn close_business(&self) -> LedgerResult<SummaryReport> {
        let now = Utc::now();
        let report = compute(&self.window_transactions().await);

        let cash = self.balances.physical_cash().await + report.overall_net_profit_or_loss;
        let snapshot = SummarySnapshot {
            report,
            calculated_at: now,
        };

        info!(
            net = report.overall_net_profit_or_loss,
            cash_after = cash,
            "Closing business period"
        );

        self.store
            .put_many(vec![
                (keys::PHYSICAL_CASH.to_string(), encode_scalar(cash)),
                (
                    keys::SUMMARY_SNAPSHOT.to_string(),
                    encode_snapshot(&snapshot)?,
                ),
                (
                    keys::BUSINESS_PERIOD.to_string(),
                    encode_state(BusinessPeriod::Closed),
                ),
            ])
            .await?;

        Ok(report)
    }

    /// Serves the current period's summary, from cache when the cached
    /// snapshot still falls inside the window, otherwise recomputed
    /// from the log (and re-cached).
    pub async fn summary(&self) -> LedgerResult<SummaryReport> {
        let last_reset = self.periods.last_reset().await;
        let window = self.window_transactions().await;

        if let Some(snapshot) = self.periods.snapshot().await {
            let in_window = snapshot.calculated_at >= last_reset;
            let fresh = window
                .iter()
                .all(|tx| tx.recorded_at <= snapshot.calculated_at);
            if in_window && fresh {
                debug!("Serving summary from cached snapshot");
                return Ok(snapshot.report);
            }
        }

        debug!("Summary cache stale or absent, recomputing from log");
        let report = compute(&window);
        self.periods
            .set_snapshot(&SummarySnapshot {
                report,
                calculated_at: Utc::now(),
            })
            .await?;
        Ok(report)
    }

    /// Transactions recorded since the window last reset, in log order.
    async fn window_transactions(&self) -> Vec<Transaction> {
        let last_reset = self.periods.last_reset().await;
        self.transactions
            .list()
            .await
            .into_iter()
            .filter(|tx| tx.recorded_at >= last_reset)
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::TransactionRecorder;
    use crate::repository::InventoryRepository;
    use crate::store::MemoryStore;
    use duka_core::types::{InventoryUpsert, TransactionDraft};

    struct Fixture {
        engine: SummaryEngine,
        recorder: TransactionRecorder,
        balances: BalanceRepository,
        transactions: TransactionRepository,
    }

    async fn fixture_with_sugar() -> Fixture {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let inventory = InventoryRepository::new(Arc::clone(&store));
        let patch = InventoryUpsert {
            item_name: "Sugar".to_string(),
            current_stock: Some(50),
            cost_price: Some(80),
            selling_price: Some(100),
            ..InventoryUpsert::default()
        };
        inventory.upsert(&patch).await.unwrap();

        Fixture {
            engine: SummaryEngine::new(Arc::clone(&store)),
            recorder: TransactionRecorder::new(Arc::clone(&store)),
            balances: BalanceRepository::new(Arc::clone(&store)),
            transactions: TransactionRepository::new(store),
        }
    }

    async fn sell_sugar(fx: &Fixture, quantity: i64) {
        fx.recorder
            .record(TransactionDraft::ShopSale {
                item_name: "Sugar".to_string(),
                quantity,
                notes: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_open_sets_state_and_zero_baseline() {
        let fx = fixture_with_sugar().await;

        fx.engine.open_business().await.unwrap();

        assert_eq!(fx.engine.period_state().await, BusinessPeriod::Open);
        assert_eq!(fx.engine.summary().await.unwrap(), SummaryReport::default());
    }

    #[tokio::test]
    async fn test_close_rolls_net_into_cash() {
        let fx = fixture_with_sugar().await;
        fx.engine.open_business().await.unwrap();

        sell_sugar(&fx, 3).await;
        let cash_before = fx.balances.physical_cash().await;

        let report = fx.engine.close_business().await.unwrap();

        assert_eq!(report.shop.total_sales_revenue, 300);
        assert_eq!(report.overall_net_profit_or_loss, 300);
        assert_eq!(
            fx.balances.physical_cash().await,
            cash_before + report.overall_net_profit_or_loss
        );
        assert_eq!(fx.engine.period_state().await, BusinessPeriod::Closed);
    }

    #[tokio::test]
    async fn test_reopen_zeroes_summary_without_touching_log() {
        let fx = fixture_with_sugar().await;
        fx.engine.open_business().await.unwrap();
        sell_sugar(&fx, 2).await;
        fx.engine.close_business().await.unwrap();

        let log_len = fx.transactions.list().await.len();
        fx.engine.open_business().await.unwrap();

        // New window, same log: the summary starts over.
        assert_eq!(fx.engine.summary().await.unwrap(), SummaryReport::default());
        assert_eq!(fx.transactions.list().await.len(), log_len);
    }

    #[tokio::test]
    async fn test_stale_cache_recomputed() {
        let fx = fixture_with_sugar().await;
        fx.engine.open_business().await.unwrap();
        sell_sugar(&fx, 4).await;

        // The cached baseline predates the sale, so a fresh summary
        // must recompute rather than serve it.
        let report = fx.engine.summary().await.unwrap();
        assert_eq!(report.shop.items_sold, 4);
        assert_eq!(report.shop.total_sales_revenue, 400);

        // And the recompute refreshed the cache.
        let again = fx.engine.summary().await.unwrap();
        assert_eq!(again, report);
    }

    #[tokio::test]
    async fn test_double_close_rolls_the_same_net_again() {
        let fx = fixture_with_sugar().await;
        fx.engine.open_business().await.unwrap();
        sell_sugar(&fx, 1).await;

        let first = fx.engine.close_business().await.unwrap();
        let cash_after_first = fx.balances.physical_cash().await;

        // Close does not move the window, so a second close summarizes
        // the same transactions and moves cash by the same net again.
        // The caller gates the button; the engine stays mechanical.
        let second = fx.engine.close_business().await.unwrap();
        assert_eq!(second, first);
        assert_eq!(
            fx.balances.physical_cash().await,
            cash_after_first + second.overall_net_profit_or_loss
        );
    }

    #[tokio::test]
    async fn test_fresh_store_summary_is_all_zero() {
        let fx = fixture_with_sugar().await;
        assert_eq!(fx.engine.summary().await.unwrap(), SummaryReport::default());
    }
}
