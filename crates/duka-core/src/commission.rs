//! # Commission Calculator
//!
//! Pure fee computation for mobile-money movements.
//!
//! ## Lookup Tolerance
//! Network names arrive from voice dictation or abbreviated typing
//! ("mtn", "MTN MoMo", "airtel money"), so the lookup is a
//! case-insensitive *substring* match between the configured entry name
//! and the query, in either direction. A miss is not an error: a
//! missing commission must never block a transaction from being
//! recorded, so the fallback is simply 0.

use crate::types::{CommissionRates, FloatDirection, FloatEntry};

/// Whether a configured float entry answers to the given query name,
/// case-insensitively and tolerating substrings either way.
pub fn matches_network(entry: &FloatEntry, network: &str) -> bool {
    let query = network.trim().to_lowercase();
    if query.is_empty() {
        return false;
    }

    let name = entry.network.trim().to_lowercase();
    !name.is_empty() && (name.contains(&query) || query.contains(&name))
}

/// Finds the float entry whose network name matches `network`.
///
/// Returns the first match in collection order, mirroring how entries
/// resolve everywhere else in the ledger.
pub fn find_network<'a>(entries: &'a [FloatEntry], network: &str) -> Option<&'a FloatEntry> {
    entries.iter().find(|entry| matches_network(entry, network))
}

/// Computes the commission for moving `amount` of e-value on the given
/// network, rounded to the nearest whole currency unit.
///
/// ## Fallbacks (documented, silent)
/// - Unknown network → 0
/// - NaN/infinite or non-positive rate → 0
///
/// ## Example
/// ```rust
/// use duka_core::commission::commission_for;
/// use duka_core::types::{CommissionRates, FloatDirection, FloatEntry};
/// use chrono::Utc;
///
/// let entries = vec![FloatEntry {
///     id: "f-1".into(),
///     network: "MTN".into(),
///     balance: 500_000,
///     commission_rates: CommissionRates { deposit: 0.01, withdrawal: 0.015 },
///     voice_keywords: vec![],
///     created_at: Utc::now(),
///     last_updated: Utc::now(),
/// }];
///
/// assert_eq!(
///     commission_for(&entries, "mtn", 50_000, FloatDirection::Withdrawal),
///     750
/// );
/// assert_eq!(
///     commission_for(&entries, "UnknownNet", 1_000, FloatDirection::Deposit),
///     0
/// );
/// ```
pub fn commission_for(
    entries: &[FloatEntry],
    network: &str,
    amount: i64,
    direction: FloatDirection,
) -> i64 {
    let rates = match find_network(entries, network) {
        Some(entry) => entry.commission_rates,
        None => return 0,
    };

    apply_rate(amount, rates, direction)
}

/// Applies a rate table to an amount, rounding to the nearest whole
/// currency unit.
pub fn apply_rate(amount: i64, rates: CommissionRates, direction: FloatDirection) -> i64 {
    let rate = rates.for_direction(direction);
    if !rate.is_finite() || rate <= 0.0 {
        return 0;
    }

    (amount as f64 * rate).round() as i64
}

// =============================================================================
// Unit Tests
// =============================================================================
