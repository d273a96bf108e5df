//! # Key-Value Store Abstraction
//!
//! The durable collaborator underneath every repository: a mapping from
//! string key to JSON value.
//!
//! ## Why a Trait?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Store Injection Seam                            │
//! │                                                                 │
//! │   Ledger ──► Arc<dyn KeyValueStore>                             │
//! │                      │                                          │
//! │          ┌───────────┴───────────┐                              │
//! │          ▼                       ▼                              │
//! │   SqliteStore               MemoryStore                         │
//! │   (production,              (tests, no I/O,                     │
//! │    WAL SQLite)               deterministic)                     │
//! │                                                                 │
//! │  The store is constructed ONCE at startup and passed in -       │
//! │  never imported as ambient global state. Swapping in the        │
//! │  in-memory fake is what keeps every repository testable.        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! `put_many` writes a batch of keys as one unit (a single SQLite
//! transaction in the durable backend, a single lock acquisition in the
//! memory fake). The recorder and the summary engine route every
//! multi-key mutation through it, so a crash can no longer land between
//! "transaction logged" and "balance updated".

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::error::StoreResult;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StoreConfig};

// =============================================================================
// Persisted Key Space
// =============================================================================

/// The logical key space of the ledger. Nothing outside this crate may
/// write these keys.
pub mod keys {
    /// Append-only transaction log (JSON array).
    pub const TRANSACTIONS: &str = "transactions";
    /// General-shop inventory collection (JSON array).
    pub const GENERAL_INVENTORY: &str = "general_inventory";
    /// Mobile-money float collection (JSON array).
    pub const MOBILE_MONEY_FLOAT: &str = "mobile_money_float";
    /// Physical cash on hand (numeric string, legacy layout).
    pub const PHYSICAL_CASH: &str = "physical_cash";
    /// Cumulative commission income (numeric string).
    pub const COMMISSION_EARNINGS: &str = "commission_earnings";
    /// Millisecond epoch of the last period open (numeric string).
    pub const LAST_PERIOD_RESET: &str = "last_period_reset_timestamp";
    /// Cached period summary (JSON object).
    pub const SUMMARY_SNAPSHOT: &str = "daily_summary_snapshot";
    /// Business period state: `"open"` or `"closed"`.
    pub const BUSINESS_PERIOD: &str = "business_period_state";
    /// One-time seed guard.
    pub const FIRST_LAUNCH_DONE: &str = "first_launch_done";
}

// =============================================================================
// Store Trait
// =============================================================================

/// Durable string-key → JSON-value store.
///
/// All operations are asynchronous and may fail with a [`StoreError`]
/// (`crate::error::StoreError`); "absent" is `Ok(None)`, distinct from
/// failure. How the two are treated (default vs propagate) is decided
/// by the repositories, not here.
#[async_trait]
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Reads one key. `Ok(None)` when the key was never written.
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Writes one key, replacing any previous value.
    async fn put(&self, key: &str, value: Value) -> StoreResult<()>;

    /// Writes a batch of keys as one atomic unit: either every entry
    /// lands or none does.
    async fn put_many(&self, entries: Vec<(String, Value)>) -> StoreResult<()>;

    /// Removes one key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Removes every key. Used by full resets only.
    async fn clear_all(&self) -> StoreResult<()>;
}
