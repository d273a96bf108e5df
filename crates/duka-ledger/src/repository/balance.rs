//! # Balance Repository
//!
//! The two singleton scalars: physical cash on hand and cumulative
//! commission earnings.
//!
//! ## Legacy Layout
//! Both persist as numeric *strings* (`"150000"`), matching the store
//! this crate inherits. Reads are lenient - a JSON number is accepted
//! too - and anything absent, empty or unparseable silently becomes 0
//! with a `warn!`. That substitution is a documented recovery, not an
//! error: a fresh store must read as "no cash yet", never as a crash.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::LedgerResult;
use crate::store::{keys, KeyValueStore};

/// Encodes a scalar for persistence (legacy numeric-string layout).
pub(crate) fn encode_scalar(amount: i64) -> Value {
    Value::String(amount.to_string())
}

/// Decodes a stored scalar leniently. `None` means "use the default".
fn decode_scalar(value: &Value) -> Option<i64> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            // Whole units preferred, but tolerate a decimal tail.
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.round() as i64))
        }
        Value::Number(num) => num
            .as_i64()
            .or_else(|| num.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        _ => None,
    }
}

/// Repository for the physical-cash and commission-earnings scalars.
#[derive(Clone)]
pub struct BalanceRepository {
    store: Arc<dyn KeyValueStore>,
}

impl BalanceRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        BalanceRepository { store }
    }

    async fn read_scalar(&self, key: &'static str) -> i64 {
        match self.store.get(key).await {
            Ok(Some(value)) => match decode_scalar(&value) {
                Some(amount) => amount,
                None => {
                    warn!(key, "Stored scalar unparseable, defaulting to 0");
                    0
                }
            },
            Ok(None) => 0,
            Err(err) => {
                warn!(key, error = %err, "Scalar read failed, defaulting to 0");
                0
            }
        }
    }

    /// Physical cash in the till. Always a plain number; an empty store
    /// reads as exactly 0.
    pub async fn physical_cash(&self) -> i64 {
        self.read_scalar(keys::PHYSICAL_CASH).await
    }

    /// Sets physical cash outright (direct user adjustment).
    pub async fn set_physical_cash(&self, amount: i64) -> LedgerResult<()> {
        debug!(amount, "Setting physical cash");
        self.store
            .put(keys::PHYSICAL_CASH, encode_scalar(amount))
            .await?;
        Ok(())
    }

    /// Adjusts physical cash by a signed delta; returns the new value.
    pub async fn add_physical_cash(&self, delta: i64) -> LedgerResult<i64> {
        let updated = self.physical_cash().await + delta;
        self.set_physical_cash(updated).await?;
        Ok(updated)
    }

    /// Cumulative commission income. Monotonically non-decreasing in
    /// the absence of a reset.
    pub async fn commission_earnings(&self) -> i64 {
        self.read_scalar(keys::COMMISSION_EARNINGS).await
    }

    /// Adds commission; returns the new cumulative total.
    pub async fn add_commission(&self, earned: i64) -> LedgerResult<i64> {
        let updated = self.commission_earnings().await + earned;
        self.store
            .put(keys::COMMISSION_EARNINGS, encode_scalar(updated))
            .await?;
        Ok(updated)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
