//! # SQLite Store Backend
//!
//! The durable [`KeyValueStore`] implementation: one `kv` table of
//! JSON-encoded values, accessed through an async sqlx pool.
//!
//! ## Schema
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  kv                                                             │
//! │  ┌──────────────────────────┬──────────────────────────────┐    │
//! │  │ key   TEXT PRIMARY KEY   │ value  TEXT NOT NULL (JSON)  │    │
//! │  ├──────────────────────────┼──────────────────────────────┤    │
//! │  │ "general_inventory"      │ [{"itemName":"Sugar",...}]   │    │
//! │  │ "physical_cash"          │ "150000"                     │    │
//! │  │ "transactions"           │ [{"type":"sell",...}]        │    │
//! │  └──────────────────────────┴──────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are opaque JSON text; the repositories own their shapes.
//! Runtime `query`/`bind` is used throughout - there is no per-entity
//! schema for compile-time query checking to verify against.
//!
//! ## WAL Mode
//! WAL journal mode is enabled so summary reads never block the
//! recorder's writes, and for better crash recovery.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::KeyValueStore;

// =============================================================================
// Configuration
// =============================================================================

/// SQLite store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("./data/duka.db").max_connections(5);
/// let store = SqliteStore::open(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the database file; `:memory:` for an ephemeral store.
    pub database_path: PathBuf,

    /// Maximum pool connections. Default: 5 (a local single-user app).
    pub max_connections: u32,

    /// Minimum connections kept alive. Default: 1.
    pub min_connections: u32,

    /// Acquire timeout. Default: 30 seconds.
    pub connect_timeout: Duration,

    /// Idle timeout before a connection is closed. Default: 10 minutes.
    pub idle_timeout: Duration,
}

impl StoreConfig {
    /// Creates a configuration for the given database path. The file
    /// is created on open if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Creates an in-memory configuration (for testing).
    ///
    /// In-memory SQLite requires a single connection: each connection
    /// would otherwise see its own private database.
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }
}

// =============================================================================
// SQLite Store
// =============================================================================

/// SQLite-backed key-value store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (and if necessary creates) the store.
    ///
    /// ## What This Does
    /// 1. Builds connection options (WAL, NORMAL synchronous,
    ///    create-if-missing)
    /// 2. Creates the connection pool
    /// 3. Ensures the `kv` table exists (idempotent)
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening ledger store"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StoreError::Connection(e.to_string()))?
        } else {
            let url = format!("sqlite://{}?mode=rwc", config.database_path.display());
            SqliteConnectOptions::from_str(&url)
                .map_err(|e| StoreError::Connection(e.to_string()))?
                // WAL: readers don't block the recorder's writes
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = SqliteStore { pool };
        store.ensure_schema().await?;

        debug!("Ledger store ready");
        Ok(store)
    }

    /// Creates the `kv` table if it doesn't exist. Safe to run on every
    /// open.
    async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Closes the connection pool. All operations fail afterwards.
    pub async fn close(&self) {
        info!("Closing ledger store");
        self.pool.close().await;
    }

    /// Checks whether the store can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

const UPSERT_SQL: &str = r#"
    INSERT INTO kv (key, value) VALUES (?1, ?2)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value
"#;

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let row: Option<String> = sqlx::query_scalar("SELECT value FROM kv WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: Value) -> StoreResult<()> {
        let text = serde_json::to_string(&value)?;

        sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(text)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn put_many(&self, batch: Vec<(String, Value)>) -> StoreResult<()> {
        // Encode everything before the transaction starts so a bad
        // value can't abort a half-written unit.
        let mut encoded = Vec::with_capacity(batch.len());
        for (key, value) in batch {
            encoded.push((key, serde_json::to_string(&value)?));
        }

        let mut tx = self.pool.begin().await?;
        for (key, text) in encoded {
            sqlx::query(UPSERT_SQL)
                .bind(key)
                .bind(text)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM kv WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn clear_all(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM kv").execute(&self.pool).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_open_in_memory_and_round_trip() {
        let store = SqliteStore::open(StoreConfig::in_memory()).await.unwrap();
        assert!(store.health_check().await);

        assert_eq!(store.get("missing").await.unwrap(), None);

        store
            .put("physical_cash", json!("150000"))
            .await
            .unwrap();
        assert_eq!(
            store.get("physical_cash").await.unwrap(),
            Some(json!("150000"))
        );

        store.put("physical_cash", json!("90000")).await.unwrap();
        assert_eq!(
            store.get("physical_cash").await.unwrap(),
            Some(json!("90000"))
        );
    }

    #[tokio::test]
    async fn test_put_many_and_clear() {
        let store = SqliteStore::open(StoreConfig::in_memory()).await.unwrap();

        store
            .put_many(vec![
                ("a".to_string(), json!([1, 2, 3])),
                ("b".to_string(), json!({"x": true})),
            ])
            .await
            .unwrap();

        assert_eq!(store.get("a").await.unwrap(), Some(json!([1, 2, 3])));
        assert_eq!(store.get("b").await.unwrap(), Some(json!({"x": true})));

        store.clear_all().await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_absent_key_is_noop() {
        let store = SqliteStore::open(StoreConfig::in_memory()).await.unwrap();
        store.remove("never-written").await.unwrap();
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = StoreConfig::new("/tmp/duka.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.is_in_memory());
    }
}
