//! # Business Period Repository
//!
//! Persistence for the open/closed period state, the last reset
//! timestamp (millisecond epoch, numeric string - legacy layout) and
//! the cached summary snapshot.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::error::{LedgerResult, StoreError};
use crate::store::{keys, KeyValueStore};
use duka_core::types::{BusinessPeriod, SummarySnapshot};

/// Encodes the period state for persistence.
pub(crate) fn encode_state(state: BusinessPeriod) -> Value {
    // Infallible: BusinessPeriod serializes to a bare string.
    serde_json::to_value(state).unwrap_or_else(|_| Value::String("closed".to_string()))
}

/// Encodes the reset timestamp (millisecond epoch, numeric string).
pub(crate) fn encode_reset(at: DateTime<Utc>) -> Value {
    Value::String(at.timestamp_millis().to_string())
}

/// Encodes the summary snapshot.
pub(crate) fn encode_snapshot(snapshot: &SummarySnapshot) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(snapshot)?)
}

/// Repository for business-period bookkeeping state.
#[derive(Clone)]
pub struct PeriodRepository {
    store: Arc<dyn KeyValueStore>,
}

impl PeriodRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        PeriodRepository { store }
    }

    /// Current period state; a fresh store reads as closed.
    pub async fn state(&self) -> BusinessPeriod {
        match self.store.get(keys::BUSINESS_PERIOD).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(state) => state,
                Err(err) => {
                    warn!(error = %err, "Period state undecodable, defaulting to closed");
                    BusinessPeriod::Closed
                }
            },
            Ok(None) => BusinessPeriod::Closed,
            Err(err) => {
                warn!(error = %err, "Period state read failed, defaulting to closed");
                BusinessPeriod::Closed
            }
        }
    }

    pub async fn set_state(&self, state: BusinessPeriod) -> LedgerResult<()> {
        self.store
            .put(keys::BUSINESS_PERIOD, encode_state(state))
            .await?;
        Ok(())
    }

    /// Instant of the last period open. A store that has never opened
    /// a period reads as the epoch, so every transaction falls inside
    /// the current window.
    pub async fn last_reset(&self) -> DateTime<Utc> {
        let fallback = Utc.timestamp_millis_opt(0).single().unwrap_or_else(Utc::now);

        let value = match self.store.get(keys::LAST_PERIOD_RESET).await {
            Ok(Some(value)) => value,
            Ok(None) => return fallback,
            Err(err) => {
                warn!(error = %err, "Reset timestamp read failed, defaulting to epoch");
                return fallback;
            }
        };

        let millis = match &value {
            Value::String(text) => text.trim().parse::<i64>().ok(),
            Value::Number(num) => num.as_i64(),
            _ => None,
        };

        match millis.and_then(|m| Utc.timestamp_millis_opt(m).single()) {
            Some(at) => at,
            None => {
                warn!("Reset timestamp unparseable, defaulting to epoch");
                fallback
            }
        }
    }

    pub async fn set_last_reset(&self, at: DateTime<Utc>) -> LedgerResult<()> {
        self.store
            .put(keys::LAST_PERIOD_RESET, encode_reset(at))
            .await?;
        Ok(())
    }

    /// The cached summary, if one has been stored. Undecodable caches
    /// read as absent - the engine then recomputes, which is always
    /// safe.
    pub async fn snapshot(&self) -> Option<SummarySnapshot> {
        match self.store.get(keys::SUMMARY_SNAPSHOT).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    warn!(error = %err, "Summary snapshot undecodable, ignoring");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "Summary snapshot read failed, ignoring");
                None
            }
        }
    }

    pub async fn set_snapshot(&self, snapshot: &SummarySnapshot) -> LedgerResult<()> {
        self.store
            .put(keys::SUMMARY_SNAPSHOT, encode_snapshot(snapshot)?)
            .await?;
        Ok(())
    }

    pub async fn clear_snapshot(&self) -> LedgerResult<()> {
        self.store.remove(keys::SUMMARY_SNAPSHOT).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
