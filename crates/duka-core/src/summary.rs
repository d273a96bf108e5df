//! # Summary Computation
//!
//! Pure aggregation of a transaction log into a period summary.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    compute(&transactions)                       │
//! │                                                                 │
//! │   Transaction log (period-filtered by the caller)               │
//! │        │                                                        │
//! │        ├── Shop entries ──────► ShopSummary                     │
//! │        │     sales revenue − restock cost = shop net            │
//! │        │                                                        │
//! │        └── MobileMoney entries ──► MobileMoneySummary           │
//! │              commission earned = mobile-money net               │
//! │              (float movement itself is NOT profit)              │
//! │                                                                 │
//! │   overall net = shop net + mobile-money net                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This function is deterministic and side-effect free. That property
//! is load-bearing: the summary engine substitutes a cached snapshot
//! for a recompute whenever the cache is still inside the current
//! business period, which is only sound if recomputing would give the
//! identical answer.

use crate::types::{
    FloatDirection, MobileMoneySummary, ShopSummary, StockMovement, SummaryReport, Transaction,
    TransactionEntry,
};

/// Folds a transaction slice into a combined period summary.
///
/// Callers are responsible for period filtering; this function
/// aggregates exactly what it is given.
pub fn compute(transactions: &[Transaction]) -> SummaryReport {
    let mut shop = ShopSummary::default();
    let mut mobile = MobileMoneySummary::default();

    for tx in transactions {
        match &tx.entry {
            TransactionEntry::Shop {
                movement,
                quantity,
                amount,
                ..
            } => match movement {
                StockMovement::Sale => {
                    shop.sale_count += 1;
                    shop.items_sold += quantity;
                    shop.total_sales_revenue += amount;
                }
                StockMovement::Restock => {
                    shop.restock_count += 1;
                    shop.items_restocked += quantity;
                    shop.total_restock_cost += amount;
                }
            },
            TransactionEntry::MobileMoney {
                direction,
                amount,
                commission,
                ..
            } => {
                match direction {
                    FloatDirection::Withdrawal => mobile.withdrawal_count += 1,
                    FloatDirection::Deposit => mobile.deposit_count += 1,
                }
                mobile.total_transaction_value += amount;
                mobile.total_commission_earned += commission;
            }
        }
    }

    shop.net_profit_or_loss = shop.total_sales_revenue - shop.total_restock_cost;
    mobile.net_profit_or_loss = mobile.total_commission_earned;

    SummaryReport {
        shop,
        mobile_money: mobile,
        overall_net_profit_or_loss: shop.net_profit_or_loss + mobile.net_profit_or_loss,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
