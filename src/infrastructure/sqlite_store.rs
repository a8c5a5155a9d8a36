use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

use crate::application::{AppError, AppResult, CooldownStore};
use crate::infrastructure::file_store::FileCooldownStore;

/// Cooldown state as one row of `notify_log`, keyed by target scope.
pub struct SqliteCooldownStore {
    pool: SqlitePool,
    scope_key: String,
}

impl SqliteCooldownStore {
    /// db_url examples
    /// - "sqlite:/data/state.db"
    /// - "sqlite:./state.db?mode=rwc"
    pub async fn new(db_url: &str, scope_key: &str) -> AppResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(db_url)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let store = Self {
            pool,
            scope_key: scope_key.to_string(),
        };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notify_log (
                scope_key TEXT PRIMARY KEY,
                last_sent_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl CooldownStore for SqliteCooldownStore {
    async fn read(&self) -> AppResult<Option<DateTime<Utc>>> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT last_sent_at FROM notify_log WHERE scope_key = ? LIMIT 1")
                .bind(&self.scope_key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;

        match row {
            None => Ok(None),
            Some((secs,)) => DateTime::from_timestamp(secs, 0)
                .map(Some)
                .ok_or_else(|| AppError::Storage(format!("invalid last_sent_at {secs}"))),
        }
    }

    async fn write(&self, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notify_log(scope_key, last_sent_at) VALUES(?, ?)
            ON CONFLICT(scope_key) DO UPDATE SET last_sent_at=excluded.last_sent_at
            "#,
        )
        .bind(&self.scope_key)
        .bind(at.timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        sqlx::query("DELETE FROM notify_log WHERE scope_key = ?")
            .bind(&self.scope_key)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        Ok(())
    }
}

/// SQLite when `db_url` is set and opens, the state file otherwise. A broken
/// database is logged and never stops the cycle.
pub async fn open_cooldown_store(
    db_url: Option<&str>,
    scope_key: &str,
    state_file: &Path,
) -> Box<dyn CooldownStore> {
    if let Some(url) = db_url {
        match SqliteCooldownStore::new(url, scope_key).await {
            Ok(store) => return Box::new(store),
            Err(e) => tracing::warn!(
                "failed to open cooldown database, falling back to {}: {e}",
                state_file.display()
            ),
        }
    }
    Box::new(FileCooldownStore::new(state_file))
}
