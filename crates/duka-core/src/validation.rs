//! # Validation Module
//!
//! Input validation helpers for the layers *above* the ledger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                          │
//! │                                                                 │
//! │  Layer 1: UI form / voice parser                                │
//! │  ├── Required-field presence, positive amounts                  │
//! │  ├── Sufficient-stock / sufficient-float warnings               │
//! │  └── THIS MODULE: the checks that layer calls                   │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  Layer 2: Ledger (repositories + recorder)                      │
//! │  ├── Structural checks only (non-blank natural key,             │
//! │  │   finite rates)                                              │
//! │  └── Mechanics, not policy: it applies effects, it does not     │
//! │      decide whether the user should be allowed to               │
//! │                                                                 │
//! │  A sale that drives stock negative is the caller's call to      │
//! │  block; the recorder will book it faithfully either way.        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted item/network name. Generous, but bounds what a
/// runaway dictation can push into the store.
pub const MAX_NAME_LEN: usize = 120;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a natural-key name (item name or network name).
///
/// ## Rules
/// - Must not be blank after trimming
/// - Must be at most [`MAX_NAME_LEN`] characters
///
/// Returns the trimmed name so callers store a canonical form.
pub fn validate_name<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::required(field));
    }

    if trimmed.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(trimmed)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a commission rate: finite and within `[0, 1]`.
pub fn validate_rate(field: &str, rate: f64) -> ValidationResult<()> {
    if !rate.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if !(0.0..=1.0).contains(&rate) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: 1.0,
        });
    }

    Ok(())
}

/// Validates a money amount: strictly positive.
///
/// UI-layer policy for transaction forms; the recorder itself does not
/// call this.
pub fn validate_amount(field: &str, amount: i64) -> ValidationResult<()> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a unit quantity: strictly positive.
pub fn validate_quantity(field: &str, quantity: i64) -> ValidationResult<()> {
    validate_amount(field, quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================
