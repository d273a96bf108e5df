//! # Error Types
//!
//! Domain-specific error types for duka-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Error Types                             │
//! │                                                                 │
//! │  duka-core errors (this file)                                   │
//! │  ├── CoreError        - General domain errors                   │
//! │  └── ValidationError  - Input validation failures               │
//! │                                                                 │
//! │  duka-ledger errors (separate crate)                            │
//! │  ├── StoreError       - Key-value backend failures              │
//! │  └── LedgerError      - Repository / recorder failures          │
//! │                                                                 │
//! │  Flow: ValidationError → LedgerError → UI action handler        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, field, etc.)
//! 3. Errors are enum variants, never String
//! 4. "Not found" on delete and unknown-item sells are outcomes, not
//!    errors (see the recorder's `RecordOutcome`)

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A persisted transaction record carried a discriminator this
    /// version does not understand.
    ///
    /// ## When This Occurs
    /// - Decoding a log written by a newer (or corrupted) store where
    ///   `type` is neither `sell` nor `restock`
    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet structural requirements.
/// Raised before any I/O, so a validation failure never leaves partial
/// state behind.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A floating-point rate was NaN or infinite. NaN must never be
    /// coerced into storage.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
