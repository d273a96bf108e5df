//! # Repository Module
//!
//! Repository implementations over the key-value store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    One Write Rule                               │
//! │                                                                 │
//! │  UI action handler                                              │
//! │       │  ledger.inventory().upsert(&patch)                      │
//! │       ▼                                                         │
//! │  InventoryRepository ──► KeyedCollection<InventoryItem>         │
//! │       │                                                         │
//! │       │  read full collection → mutate one entry → write        │
//! │       ▼  the full collection back in ONE put                    │
//! │  KeyValueStore                                                  │
//! │                                                                 │
//! │  The same KeyedCollection machinery serves both inventory and   │
//! │  float - one copy of the merge logic, not four subtly           │
//! │  different ones.                                                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`] - general-shop stock
//! - [`FloatRepository`] - mobile-money network balances
//! - [`BalanceRepository`] - physical cash + commission scalars
//! - [`TransactionRepository`] - the append-only log
//! - [`PeriodRepository`] - business-period state and summary cache

pub mod balance;
pub mod collection;
pub mod float;
pub mod inventory;
pub mod period;
pub mod transactions;

pub use balance::BalanceRepository;
pub use collection::{KeyedCollection, LedgerRecord, RecordPatch};
pub use float::FloatRepository;
pub use inventory::InventoryRepository;
pub use period::PeriodRepository;
pub use transactions::TransactionRepository;
