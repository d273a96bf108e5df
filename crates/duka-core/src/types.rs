//! # Domain Types
//!
//! Core domain types for the Duka ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                            │
//! │                                                                 │
//! │  ┌───────────────┐  ┌───────────────┐  ┌────────────────────┐  │
//! │  │ InventoryItem │  │  FloatEntry   │  │    Transaction     │  │
//! │  │ ───────────── │  │ ───────────── │  │ ────────────────── │  │
//! │  │ id (UUID)     │  │ id (UUID)     │  │ id (UUID)          │  │
//! │  │ item_name     │  │ network       │  │ recorded_at        │  │
//! │  │ current_stock │  │ balance       │  │ entry:             │  │
//! │  │ cost_price    │  │ commission    │  │   Shop |           │  │
//! │  │ selling_price │  │   rates       │  │   MobileMoney      │  │
//! │  └───────────────┘  └───────────────┘  └────────────────────┘  │
//! │                                                                 │
//! │  ┌───────────────┐  ┌─────────────────────────────────────────┐ │
//! │  │BusinessPeriod │  │ SummaryReport                           │ │
//! │  │ Open | Closed │  │ shop + mobile money + overall net       │ │
//! │  └───────────────┘  └─────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Natural-Key Identity Pattern
//! Every collection entry has:
//! - `id`: UUID v4 - immutable, generated on first insert
//! - Natural key: `item_name` / `network` - unique case-insensitively,
//!   used for every lookup (voice-dictated names arrive as text)
//!
//! ## Money
//! All monetary values are whole currency units in `i64` (shilling-style
//! currency: the smallest unit is 1, commissions round to it). Never
//! floats for stored amounts; only commission *rates* are `f64`
//! fractions, and those are validated finite before they are persisted.
//!
//! ## Wire Compatibility
//! The persisted store predates this crate. Transactions are kept
//! type-safe in memory (`TransactionEntry` variants) but serialize
//! to/from the legacy flat shape where `type = "sell"` means a
//! withdrawal when `isMobileMoney` is set. See [`RawTransaction`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// =============================================================================
// Commission Rates
// =============================================================================

/// Per-network commission rate table, as fractions in `[0, 1]`.
///
/// A rate of `0.015` means the agent earns 1.5% of the moved amount.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CommissionRates {
    /// Rate earned when a customer deposits cash with the agent.
    #[serde(default)]
    pub deposit: f64,

    /// Rate earned when a customer withdraws cash from the agent.
    #[serde(default)]
    pub withdrawal: f64,
}

impl CommissionRates {
    /// Returns the rate for the given float direction.
    pub fn for_direction(&self, direction: FloatDirection) -> f64 {
        match direction {
            FloatDirection::Deposit => self.deposit,
            FloatDirection::Withdrawal => self.withdrawal,
        }
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A general-shop stock unit.
///
/// Numeric fields carry `#[serde(default)]` so records written by older
/// app versions (or hand-edited stores) coerce missing numbers to 0
/// instead of failing the whole collection read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Unique identifier (UUID v4), assigned on first insert.
    pub id: String,

    /// Display name; natural key, unique case-insensitively.
    pub item_name: String,

    /// Units on hand. Expected >= 0, but the ledger does not enforce
    /// it: policy checks live in the calling layer.
    #[serde(default)]
    pub current_stock: i64,

    /// Purchase cost per unit, in whole currency units.
    #[serde(default, rename = "costPricePerUnit")]
    pub cost_price: i64,

    /// Selling price per unit, in whole currency units.
    #[serde(default, rename = "sellingPricePerUnit")]
    pub selling_price: i64,

    /// Display unit label ("kg", "piece", "bottle").
    #[serde(default)]
    pub unit: String,

    /// Free-form category label.
    #[serde(default)]
    pub category: String,

    /// Optional description.
    #[serde(default)]
    pub description: String,

    /// Alternate spellings for fuzzy voice matching.
    #[serde(default)]
    pub voice_keywords: Vec<String>,

    /// When the item was first created.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// When the item was last touched by an upsert or a transaction.
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

/// Patch shape for inventory upserts.
///
/// ## Merge Semantics
/// `None` numeric fields fall back to the *existing* record's values on
/// merge - never to zero. On insert they default to 0. This is what
/// lets a restock form submit only a stock delta without wiping prices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpsert {
    /// Natural key; must be non-blank.
    pub item_name: String,
    pub current_stock: Option<i64>,
    #[serde(rename = "costPricePerUnit")]
    pub cost_price: Option<i64>,
    #[serde(rename = "sellingPricePerUnit")]
    pub selling_price: Option<i64>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub voice_keywords: Option<Vec<String>>,
}

impl InventoryUpsert {
    /// Convenience constructor with just the natural key.
    pub fn named(item_name: impl Into<String>) -> Self {
        InventoryUpsert {
            item_name: item_name.into(),
            ..InventoryUpsert::default()
        }
    }
}

// =============================================================================
// Float Entry
// =============================================================================

/// A mobile-money network's e-value balance ("float").
///
/// The legacy store reuses the inventory field names for float entries
/// (`itemName` for the network, `currentStock` for the balance), so the
/// serde renames below keep the on-disk shape while the Rust side gets
/// honest names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Network name ("MTN", "Airtel"); natural key.
    #[serde(rename = "itemName")]
    pub network: String,

    /// E-value balance in whole currency units. Signed in principle;
    /// expected >= 0 in ordinary operation.
    #[serde(default, rename = "currentStock")]
    pub balance: i64,

    /// Commission rate table for this network.
    #[serde(default, rename = "commissionRate")]
    pub commission_rates: CommissionRates,

    /// Alternate spellings for fuzzy voice matching.
    #[serde(default)]
    pub voice_keywords: Vec<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

/// Patch shape for float-entry upserts. Same merge semantics as
/// [`InventoryUpsert`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatUpsert {
    /// Network name; must be non-blank.
    #[serde(rename = "itemName")]
    pub network: String,
    #[serde(rename = "currentStock")]
    pub balance: Option<i64>,
    #[serde(rename = "commissionRate")]
    pub commission_rates: Option<CommissionRates>,
    pub voice_keywords: Option<Vec<String>>,
}

impl FloatUpsert {
    /// Convenience constructor with just the network name.
    pub fn named(network: impl Into<String>) -> Self {
        FloatUpsert {
            network: network.into(),
            ..FloatUpsert::default()
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// Direction of a general-shop stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockMovement {
    /// Stock leaves the shelf; cash comes in at selling price.
    Sale,
    /// Stock arrives; cash goes out at cost price.
    Restock,
}

/// Direction of a mobile-money movement, from the agent's perspective.
///
/// The sign conventions are the counter-intuitive part of agent
/// bookkeeping and worth spelling out once:
///
/// ```text
/// ┌──────────────┬───────────────┬────────────────┐
/// │              │ Physical cash │ Float balance  │
/// ├──────────────┼───────────────┼────────────────┤
/// │ Withdrawal   │   - amount    │   + amount     │
/// │ Deposit      │   + amount    │   - amount     │
/// └──────────────┴───────────────┴────────────────┘
/// ```
///
/// On a withdrawal the customer walks away with till cash and the
/// network credits the agent's e-value; a deposit is the mirror image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatDirection {
    Deposit,
    Withdrawal,
}

/// The business content of a transaction.
///
/// The legacy shape overloaded `type = "sell" | "restock"` with an
/// `isMobileMoney` flag, so "sell" meant *withdrawal* for mobile money.
/// This enum removes that indirection at the type level; the wire shape
/// is preserved by [`RawTransaction`].
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionEntry {
    /// A general-shop sale or restock.
    Shop {
        item_name: String,
        movement: StockMovement,
        /// Units moved.
        quantity: i64,
        /// Cost per unit at the time of recording (snapshot).
        unit_cost: i64,
        /// Selling price per unit at the time of recording (snapshot).
        unit_price: i64,
        /// Total money value of the transaction.
        amount: i64,
    },
    /// A mobile-money deposit or withdrawal.
    MobileMoney {
        network: String,
        direction: FloatDirection,
        /// E-value moved.
        amount: i64,
        /// Commission earned, computed at save time.
        commission: i64,
    },
}

/// An append-only ledger log entry.
///
/// Once written, a transaction is immutable; corrections are made by
/// appending compensating transactions, never by editing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTransaction", into = "RawTransaction")]
pub struct Transaction {
    /// Unique identifier; generation order equals insertion order.
    pub id: String,

    /// Creation instant, assigned by the recorder.
    pub recorded_at: DateTime<Utc>,

    /// Optional free-form note.
    pub notes: Option<String>,

    /// What actually happened.
    pub entry: TransactionEntry,
}

impl Transaction {
    /// Whether this entry touches float/commission rather than stock.
    pub fn is_mobile_money(&self) -> bool {
        matches!(self.entry, TransactionEntry::MobileMoney { .. })
    }

    /// The product or network name this entry references.
    pub fn subject(&self) -> &str {
        match &self.entry {
            TransactionEntry::Shop { item_name, .. } => item_name,
            TransactionEntry::MobileMoney { network, .. } => network,
        }
    }

    /// Total money value of the transaction.
    pub fn amount(&self) -> i64 {
        match &self.entry {
            TransactionEntry::Shop { amount, .. } => *amount,
            TransactionEntry::MobileMoney { amount, .. } => *amount,
        }
    }
}

/// The legacy flat transaction shape, exactly as persisted.
///
/// ## Mapping
/// ```text
/// isMobileMoney │ type      │ meaning
/// ──────────────┼───────────┼─────────────────────────
/// false         │ "sell"    │ shop sale
/// false         │ "restock" │ shop restock
/// true          │ "sell"    │ mobile-money withdrawal
/// true          │ "restock" │ mobile-money deposit
/// ```
/// For mobile money the legacy `quantity` field mirrors the e-value
/// amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "isMobileMoney", default)]
    pub is_mobile_money: bool,
    #[serde(rename = "itemName", default)]
    pub item_name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub amount: i64,
    #[serde(rename = "costPrice", default)]
    pub cost_price: i64,
    #[serde(rename = "sellingPrice", default)]
    pub selling_price: i64,
    #[serde(rename = "commissionEarned", default)]
    pub commission_earned: i64,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = CoreError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        let entry = match (raw.is_mobile_money, raw.kind.as_str()) {
            (false, "sell") => TransactionEntry::Shop {
                item_name: raw.item_name,
                movement: StockMovement::Sale,
                quantity: raw.quantity,
                unit_cost: raw.cost_price,
                unit_price: raw.selling_price,
                amount: raw.amount,
            },
            (false, "restock") => TransactionEntry::Shop {
                item_name: raw.item_name,
                movement: StockMovement::Restock,
                quantity: raw.quantity,
                unit_cost: raw.cost_price,
                unit_price: raw.selling_price,
                amount: raw.amount,
            },
            (true, "sell") => TransactionEntry::MobileMoney {
                network: raw.item_name,
                direction: FloatDirection::Withdrawal,
                amount: raw.amount,
                commission: raw.commission_earned,
            },
            (true, "restock") => TransactionEntry::MobileMoney {
                network: raw.item_name,
                direction: FloatDirection::Deposit,
                amount: raw.amount,
                commission: raw.commission_earned,
            },
            (_, other) => return Err(CoreError::UnknownTransactionType(other.to_string())),
        };

        Ok(Transaction {
            id: raw.id,
            recorded_at: raw.timestamp,
            notes: raw.notes,
            entry,
        })
    }
}

impl From<Transaction> for RawTransaction {
    fn from(tx: Transaction) -> Self {
        match tx.entry {
            TransactionEntry::Shop {
                item_name,
                movement,
                quantity,
                unit_cost,
                unit_price,
                amount,
            } => RawTransaction {
                id: tx.id,
                kind: match movement {
                    StockMovement::Sale => "sell",
                    StockMovement::Restock => "restock",
                }
                .to_string(),
                is_mobile_money: false,
                item_name,
                quantity,
                amount,
                cost_price: unit_cost,
                selling_price: unit_price,
                commission_earned: 0,
                timestamp: tx.recorded_at,
                notes: tx.notes,
            },
            TransactionEntry::MobileMoney {
                network,
                direction,
                amount,
                commission,
            } => RawTransaction {
                id: tx.id,
                kind: match direction {
                    FloatDirection::Withdrawal => "sell",
                    FloatDirection::Deposit => "restock",
                }
                .to_string(),
                is_mobile_money: true,
                item_name: network,
                // Legacy records mirror the e-value amount here.
                quantity: amount,
                amount,
                cost_price: 0,
                selling_price: 0,
                commission_earned: commission,
                timestamp: tx.recorded_at,
                notes: tx.notes,
            },
        }
    }
}

// =============================================================================
// Transaction Draft
// =============================================================================

/// A proposed transaction, as submitted by the calling layer.
///
/// Id, timestamp, commission and unit-economics snapshots are assigned
/// by the recorder and cannot be supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionDraft {
    /// Sell `quantity` units of the named item at its current selling
    /// price.
    ShopSale {
        item_name: String,
        quantity: i64,
        notes: Option<String>,
    },
    /// Restock `quantity` units of the named item at its current cost
    /// price.
    ShopRestock {
        item_name: String,
        quantity: i64,
        notes: Option<String>,
    },
    /// Move `amount` of e-value for the named network.
    FloatMovement {
        network: String,
        direction: FloatDirection,
        amount: i64,
        notes: Option<String>,
    },
}

impl TransactionDraft {
    /// The product or network name this draft references.
    pub fn subject(&self) -> &str {
        match self {
            TransactionDraft::ShopSale { item_name, .. } => item_name,
            TransactionDraft::ShopRestock { item_name, .. } => item_name,
            TransactionDraft::FloatMovement { network, .. } => network,
        }
    }
}

// =============================================================================
// Business Period
// =============================================================================

/// The open/closed bookkeeping window over which a summary accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessPeriod {
    Open,
    Closed,
}

impl Default for BusinessPeriod {
    fn default() -> Self {
        BusinessPeriod::Closed
    }
}

// =============================================================================
// Summary Types
// =============================================================================

/// General-shop aggregates over one business period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSummary {
    /// Number of sale transactions.
    #[serde(default)]
    pub sale_count: i64,
    /// Number of restock transactions.
    #[serde(default)]
    pub restock_count: i64,
    /// Total units sold.
    #[serde(default)]
    pub items_sold: i64,
    /// Total units restocked.
    #[serde(default)]
    pub items_restocked: i64,
    /// Sum of sale amounts.
    #[serde(default)]
    pub total_sales_revenue: i64,
    /// Sum of restock amounts.
    #[serde(default)]
    pub total_restock_cost: i64,
    /// Revenue minus restock cost.
    #[serde(default)]
    pub net_profit_or_loss: i64,
}

/// Mobile-money aggregates over one business period.
///
/// The float movement itself is not profit; commission is the agent's
/// only profit signal here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileMoneySummary {
    /// Number of withdrawals.
    #[serde(default)]
    pub withdrawal_count: i64,
    /// Number of deposits.
    #[serde(default)]
    pub deposit_count: i64,
    /// Sum of amounts across both directions.
    #[serde(default)]
    pub total_transaction_value: i64,
    /// Sum of commission earned.
    #[serde(default)]
    pub total_commission_earned: i64,
    /// Equals `total_commission_earned`.
    #[serde(default)]
    pub net_profit_or_loss: i64,
}

/// Combined period summary: shop plus mobile money.
///
/// Persisted under the legacy snapshot keys (`generalSummary`,
/// `mobileMoneySummary`, `overallNetProfitOrLoss`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummaryReport {
    #[serde(default, rename = "generalSummary")]
    pub shop: ShopSummary,
    #[serde(default, rename = "mobileMoneySummary")]
    pub mobile_money: MobileMoneySummary,
    #[serde(default, rename = "overallNetProfitOrLoss")]
    pub overall_net_profit_or_loss: i64,
}

/// A cached summary, valid only while no period boundary has occurred
/// since `calculated_at`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummarySnapshot {
    #[serde(flatten)]
    pub report: SummaryReport,
    #[serde(rename = "calculatedAt")]
    pub calculated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shop_sale() -> Transaction {
        Transaction {
            id: "t-1".to_string(),
            recorded_at: Utc::now(),
            notes: None,
            entry: TransactionEntry::Shop {
                item_name: "Sugar".to_string(),
                movement: StockMovement::Sale,
                quantity: 3,
                unit_cost: 80,
                unit_price: 100,
                amount: 300,
            },
        }
    }

    #[test]
    fn test_shop_sale_wire_shape() {
        let raw = RawTransaction::from(shop_sale());
        assert_eq!(raw.kind, "sell");
        assert!(!raw.is_mobile_money);
        assert_eq!(raw.item_name, "Sugar");
        assert_eq!(raw.selling_price, 100);
        assert_eq!(raw.amount, 300);
    }

    #[test]
    fn test_withdrawal_wire_shape() {
        let tx = Transaction {
            id: "t-2".to_string(),
            recorded_at: Utc::now(),
            notes: None,
            entry: TransactionEntry::MobileMoney {
                network: "MTN".to_string(),
                direction: FloatDirection::Withdrawal,
                amount: 50_000,
                commission: 750,
            },
        };
        let raw = RawTransaction::from(tx.clone());

        // "sell" means withdrawal on the wire when isMobileMoney is set,
        // and quantity mirrors the e-value amount.
        assert_eq!(raw.kind, "sell");
        assert!(raw.is_mobile_money);
        assert_eq!(raw.quantity, 50_000);
        assert_eq!(raw.commission_earned, 750);

        let back = Transaction::try_from(raw).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn test_legacy_json_round_trip() {
        let json = serde_json::json!({
            "id": "abc",
            "type": "restock",
            "isMobileMoney": true,
            "itemName": "Airtel",
            "quantity": 20000,
            "amount": 20000,
            "commissionEarned": 100,
            "timestamp": "2026-01-05T08:30:00Z"
        });
        let tx: Transaction = serde_json::from_value(json).unwrap();
        assert!(matches!(
            tx.entry,
            TransactionEntry::MobileMoney {
                direction: FloatDirection::Deposit,
                amount: 20_000,
                commission: 100,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let json = serde_json::json!({
            "id": "abc",
            "type": "refund",
            "itemName": "Sugar",
            "timestamp": "2026-01-05T08:30:00Z"
        });
        assert!(serde_json::from_value::<Transaction>(json).is_err());
    }

    #[test]
    fn test_inventory_item_defaults_missing_numerics() {
        let json = serde_json::json!({
            "id": "i-1",
            "itemName": "Salt"
        });
        let item: InventoryItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.current_stock, 0);
        assert_eq!(item.cost_price, 0);
        assert_eq!(item.selling_price, 0);
    }

    #[test]
    fn test_float_entry_legacy_field_names() {
        let json = serde_json::json!({
            "id": "f-1",
            "itemName": "MTN",
            "currentStock": 500000,
            "commissionRate": { "deposit": 0.01, "withdrawal": 0.015 }
        });
        let entry: FloatEntry = serde_json::from_value(json).unwrap();
        assert_eq!(entry.network, "MTN");
        assert_eq!(entry.balance, 500_000);
        assert!((entry.commission_rates.withdrawal - 0.015).abs() < f64::EPSILON);

        // And it serializes back under the same names.
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["itemName"], "MTN");
        assert_eq!(value["currentStock"], 500_000);
    }

    #[test]
    fn test_business_period_default_and_wire() {
        assert_eq!(BusinessPeriod::default(), BusinessPeriod::Closed);
        assert_eq!(
            serde_json::to_value(BusinessPeriod::Open).unwrap(),
            serde_json::json!("open")
        );
    }

    #[test]
    fn test_snapshot_legacy_keys() {
        let snap = SummarySnapshot {
            report: SummaryReport::default(),
            calculated_at: Utc::now(),
        };
        let value = serde_json::to_value(snap).unwrap();
        assert!(value.get("generalSummary").is_some());
        assert!(value.get("mobileMoneySummary").is_some());
        assert!(value.get("overallNetProfitOrLoss").is_some());
        assert!(value.get("calculatedAt").is_some());
    }
}
