//! # duka-core: Pure Business Logic for Duka Ledger
//!
//! This crate is the heart of the Duka bookkeeping engine. It contains
//! all business math as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Duka Ledger Architecture                    │
//! │                                                                 │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │              UI forms / voice dictation                 │    │
//! │  │        (external callers, out of this workspace)        │    │
//! │  └───────────────────────────┬─────────────────────────────┘    │
//! │                              │                                  │
//! │  ┌───────────────────────────▼─────────────────────────────┐    │
//! │  │                ★ duka-core (THIS CRATE) ★               │    │
//! │  │                                                         │    │
//! │  │  ┌──────────┐ ┌────────────┐ ┌─────────┐ ┌──────────┐   │    │
//! │  │  │  types   │ │ commission │ │ summary │ │validation│   │    │
//! │  │  │ Item     │ │  rate      │ │ period  │ │  rules   │   │    │
//! │  │  │ Float    │ │  lookup    │ │ P&L     │ │  checks  │   │    │
//! │  │  │ Tx enum  │ │  rounding  │ │ math    │ │          │   │    │
//! │  │  └──────────┘ └────────────┘ └─────────┘ └──────────┘   │    │
//! │  │                                                         │    │
//! │  │  NO I/O • NO STORE • NO CLOCK READS IN MATH             │    │
//! │  └───────────────────────────┬─────────────────────────────┘    │
//! │                              │                                  │
//! │  ┌───────────────────────────▼─────────────────────────────┐    │
//! │  │              duka-ledger (storage layer)                │    │
//! │  │   key-value store, repositories, recorder, summary      │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InventoryItem, FloatEntry, Transaction, ...)
//! - [`commission`] - Commission rate lookup and rounding
//! - [`summary`] - Period summary aggregation
//! - [`validation`] - Caller-side input checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output - this is what makes
//!    the summary cache/recompute substitution safe
//! 2. **Integer money**: whole currency units in `i64`; only commission
//!    *rates* are floats, validated finite before storage
//! 3. **Typed transactions**: the legacy `type` + `isMobileMoney`
//!    overload is a tagged enum here, while still serializing to the
//!    legacy flat shape

// =============================================================================
// Module Declarations
// =============================================================================

pub mod commission;
pub mod error;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;
