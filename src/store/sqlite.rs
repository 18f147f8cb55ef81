use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::{debug, info};

use crate::error::Result;

use super::KeyValueStore;

const DEFAULT_NAMESPACE: &str = "default";

/// SQLite-backed store that survives restarts.
///
/// Keys live in a namespace; stores for different namespaces share one pool
/// and never evict each other's keys.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    namespace: String,
    /// `None` never evicts
    max_entries: Option<i64>,
}

impl SqliteStore {
    /// Open (or create) the database at `database_url` and initialize its schema
    pub async fn new(database_url: &str) -> Result<Self> {
        // Create data directory if needed
        if let Some(path) = database_url.strip_prefix("sqlite:") {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self {
            pool,
            namespace: DEFAULT_NAMESPACE.to_string(),
            max_entries: None,
        };
        store.init_schema().await?;

        info!("Key-value store initialized at {}", database_url);
        Ok(store)
    }

    /// A store over the same database whose keys live in `namespace`
    pub fn namespace(&self, namespace: &str) -> Self {
        Self {
            pool: self.pool.clone(),
            namespace: namespace.to_string(),
            max_entries: None,
        }
    }

    /// Keep at most `max_entries` keys (minimum 1) in this namespace
    pub fn bounded(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries.max(1) as i64);
        self
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                seq INTEGER NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (namespace, key)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_kv_entries_seq
            ON kv_entries (namespace, seq)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Number of keys in this namespace
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kv_entries WHERE namespace = ?")
            .bind(&self.namespace)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }

    async fn evict_overflow(&self) -> Result<()> {
        let Some(max_entries) = self.max_entries else {
            return Ok(());
        };

        let result = sqlx::query(
            r#"
            DELETE FROM kv_entries
            WHERE namespace = ?
              AND key NOT IN (
                SELECT key FROM kv_entries
                WHERE namespace = ?
                ORDER BY seq DESC
                LIMIT ?
              )
            "#,
        )
        .bind(&self.namespace)
        .bind(&self.namespace)
        .bind(max_entries)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            debug!(
                "Evicted {} keys from '{}'",
                result.rows_affected(),
                self.namespace
            );
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM kv_entries WHERE namespace = ? AND key = ?")
                .bind(&self.namespace)
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|r| r.0))
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_entries (namespace, key, value, seq, updated_at)
            VALUES (
                ?1, ?2, ?3,
                (SELECT COALESCE(MAX(seq), 0) + 1 FROM kv_entries WHERE namespace = ?1),
                ?4
            )
            ON CONFLICT(namespace, key) DO UPDATE SET
                value = excluded.value,
                seq = excluded.seq,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.namespace)
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.evict_overflow().await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_entries WHERE namespace = ? AND key = ?")
            .bind(&self.namespace)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
