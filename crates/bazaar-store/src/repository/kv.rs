//! # Key-Value Repository
//!
//! Database operations for the `kv_store` table.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;

/// Repository for `kv_store` rows.
///
/// ## Usage
/// ```rust,ignore
/// let repo = KvRepository::new(pool);
/// repo.upsert("installed_modules", "[]").await?;
/// let value = repo.get("installed_modules").await?;
/// ```
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    /// Gets the value stored under `key`.
    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        debug!(key = %key, "Reading key");

        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Inserts or replaces the value under `key`.
    pub async fn upsert(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing key");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
