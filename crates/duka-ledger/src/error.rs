//! # Ledger Error Types
//!
//! Error types for the storage layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                            │
//! │                                                                 │
//! │  Backend error (sqlx::Error / serde_json::Error)                │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  StoreError (store module) ← categorized, key-value level       │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  LedgerError (this module) ← what repositories/recorder raise   │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  UI action handler displays a user-facing message               │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read/Write Asymmetry
//! This split is deliberate and part of the external contract:
//!
//! - **Reads** recover silently to documented defaults (collections →
//!   empty, scalars → 0, period state → closed) with a `warn!` line.
//!   The shop must stay usable on a fresh or corrupted store, and
//!   callers should not need to distinguish "truly empty" from "read
//!   failed".
//! - **Writes** always propagate. A failed write means the books may
//!   not reflect the operation; the caller must surface it and re-check
//!   balances rather than assume a rollback happened.

use duka_core::error::ValidationError;
use thiserror::Error;

// =============================================================================
// Store Error
// =============================================================================

/// Key-value backend failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not open or reach the backing database.
    #[error("Store connection failed: {0}")]
    Connection(String),

    /// A read or write was rejected by the backend.
    #[error("Store operation failed: {0}")]
    Backend(String),

    /// A value could not be encoded to / decoded from JSON.
    #[error("Store serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convert sqlx errors to StoreError.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                StoreError::Connection("connection pool exhausted".to_string())
            }
            sqlx::Error::PoolClosed => StoreError::Connection("pool is closed".to_string()),
            sqlx::Error::Io(io) => StoreError::Connection(io.to_string()),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Result type for raw store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Ledger Error
// =============================================================================

/// Errors raised by repositories, the recorder and the summary engine.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Caller supplied structurally invalid input (blank name,
    /// non-finite rate). Raised before any I/O; never leaves partial
    /// state.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The persistent store rejected a write (or a read on a path that
    /// cannot default). Effects already applied are NOT rolled back;
    /// see the crate docs on atomicity.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_passes_through() {
        let err: LedgerError = ValidationError::required("itemName").into();
        assert_eq!(err.to_string(), "itemName is required");
    }

    #[test]
    fn test_store_error_is_wrapped() {
        let err: LedgerError = StoreError::Backend("disk full".to_string()).into();
        assert_eq!(err.to_string(), "Storage error: Store operation failed: disk full");
    }
}
