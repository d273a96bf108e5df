//! # duka-ledger: Storage and Write Paths for the Duka Ledger
//!
//! This crate keeps a small shop's four balances consistent: inventory
//! stock, per-network mobile-money float, physical cash and accumulated
//! commission. It persists everything through a key-value store over
//! SQLite (with an in-memory fake for tests).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Duka Ledger Data Flow                            │
//! │                                                                         │
//! │  UI action handler (record sale, open day, ...)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    duka-ledger (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌───────────────┐   ┌──────────────────┐  │   │
//! │  │   │    Ledger    │   │ Repositories  │   │ Recorder +       │  │   │
//! │  │   │  (facade)    │──►│ inventory /   │   │ Summary Engine   │  │   │
//! │  │   │              │   │ float / cash /│   │ (write paths,    │  │   │
//! │  │   │              │   │ log / period  │   │  period machine) │  │   │
//! │  │   └──────────────┘   └───────┬───────┘   └────────┬─────────┘  │   │
//! │  │                             │                     │            │   │
//! │  │                             ▼                     ▼            │   │
//! │  │                  ┌────────────────────────────────────────┐   │   │
//! │  │                  │  KeyValueStore (SqliteStore | Memory)  │   │   │
//! │  │                  └────────────────────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database: one kv(key, value) table, JSON values                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure domain logic (types, commission math, summary aggregation)
//! lives in `duka-core`; this crate owns everything that touches the
//! store.
//!
//! ## Module Organization
//!
//! - [`store`] - the `KeyValueStore` trait, SQLite and in-memory backends
//! - [`repository`] - typed repositories over the store keys
//! - [`recorder`] - the single transaction write path
//! - [`summary`] - business-period state machine and summaries
//! - [`seed`] - one-time starter catalog for fresh stores
//! - [`ledger`] - the facade the calling layer holds
//! - [`error`] - store and ledger error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use duka_ledger::{Ledger, SqliteStore, StoreConfig};
//! use duka_core::types::TransactionDraft;
//! use std::sync::Arc;
//!
//! let store = SqliteStore::open(StoreConfig::new("duka.db")).await?;
//! let ledger = Ledger::new(Arc::new(store));
//! duka_ledger::seed::seed_if_first_launch(&ledger).await?;
//!
//! ledger
//!     .record_transaction(TransactionDraft::ShopSale {
//!         item_name: "Sugar".into(),
//!         quantity: 2,
//!         notes: None,
//!     })
//!     .await?;
//! ```
//!
//! ## Atomicity
//! Multi-key effects (a recorded transaction, a period close) go
//! through a single [`KeyValueStore::put_many`] batch, which the SQLite
//! backend runs in one database transaction. The observable
//! read-modify-write cycle per collection is unchanged; only the final
//! flush is atomic.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod recorder;
pub mod repository;
pub mod seed;
pub mod store;
pub mod summary;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{LedgerError, LedgerResult, StoreError, StoreResult};
pub use ledger::Ledger;
pub use recorder::{RecordOutcome, TransactionRecorder};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreConfig};
pub use summary::SummaryEngine;

// Repository re-exports for convenience
pub use repository::{
    BalanceRepository, FloatRepository, InventoryRepository, PeriodRepository,
    TransactionRepository,
};
