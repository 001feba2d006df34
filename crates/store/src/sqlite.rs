//! SQLite-backed credential store using sqlx.
//!
//! Schema: `credentials(key, value, updated_at)` with `key` as primary key.
//! Every write is a single-row upsert, so each key is updated atomically.

use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use storefront_types::{CredentialStore, StorageKey, traits::Result};

/// A persistent [`CredentialStore`] backed by `SQLite`.
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    /// Connects to a `SQLite` database (e.g. `"sqlite:./session.db"` or `"sqlite::memory:"`).
    ///
    /// Automatically creates the database file if it does not exist and runs
    /// schema migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`sqlx::Error`] if the connection or table creation fails.
    pub async fn new(database_url: &str) -> std::result::Result<Self, sqlx::Error> {
        let opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = Self::pool_options(database_url)
            .connect_with(opts)
            .await?;
        Self::migrate(&pool).await?;
        tracing::debug!(url = database_url, "credential store ready");
        Ok(Self { pool })
    }

    /// Opens (or creates) the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`sqlx::Error`] if the file cannot be opened or migrated.
    pub async fn open(path: &std::path::Path) -> std::result::Result<Self, sqlx::Error> {
        Self::new(&format!("sqlite://{}", path.display())).await
    }

    fn pool_options(database_url: &str) -> SqlitePoolOptions {
        if database_url.contains(":memory:") {
            // Each in-memory connection is its own database; keep exactly one, forever.
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        }
    }

    async fn migrate(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS credentials (
                key         TEXT    PRIMARY KEY,
                value       TEXT    NOT NULL,
                updated_at  INTEGER NOT NULL DEFAULT (unixepoch())
            )",
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM credentials WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO credentials (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = unixepoch()",
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<()> {
        sqlx::query("DELETE FROM credentials WHERE key = ?")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM credentials")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn mem() -> SqliteCredentialStore {
        SqliteCredentialStore::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let s = mem().await;
        s.set(StorageKey::AccessToken, "access").await.unwrap();
        s.set(StorageKey::RefreshToken, "refresh").await.unwrap();
        assert_eq!(
            s.get(StorageKey::AccessToken).await.unwrap().as_deref(),
            Some("access")
        );
        assert_eq!(
            s.get(StorageKey::RefreshToken).await.unwrap().as_deref(),
            Some("refresh")
        );
    }

    #[tokio::test]
    async fn test_get_missing() {
        let s = mem().await;
        assert!(s.get(StorageKey::User).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert() {
        let s = mem().await;
        s.set(StorageKey::AccessToken, "first").await.unwrap();
        s.set(StorageKey::AccessToken, "second").await.unwrap();
        assert_eq!(
            s.get(StorageKey::AccessToken).await.unwrap().as_deref(),
            Some("second")
        );
    }

    #[tokio::test]
    async fn test_remove_only_touches_one_key() {
        let s = mem().await;
        s.set(StorageKey::AccessToken, "a").await.unwrap();
        s.set(StorageKey::User, r#"{"email":"x"}"#).await.unwrap();
        s.remove(StorageKey::AccessToken).await.unwrap();
        assert!(s.get(StorageKey::AccessToken).await.unwrap().is_none());
        assert!(s.get(StorageKey::User).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let s = mem().await;
        for key in StorageKey::ALL {
            s.set(key, "v").await.unwrap();
        }
        s.clear().await.unwrap();
        for key in StorageKey::ALL {
            assert!(s.get(key).await.unwrap().is_none());
        }
    }

    #[test]
    fn test_memory_pool_never_recycles_its_connection() {
        let opts = SqliteCredentialStore::pool_options("sqlite::memory:");
        assert_eq!(opts.get_min_connections(), 1);
        assert_eq!(opts.get_max_connections(), 1);
        assert_eq!(opts.get_idle_timeout(), None);
        assert_eq!(opts.get_max_lifetime(), None);

        let opts = SqliteCredentialStore::pool_options("sqlite://session.db");
        assert_eq!(opts.get_max_connections(), 5);
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.db");
        {
            let s = SqliteCredentialStore::open(&path).await.unwrap();
            s.set(StorageKey::RefreshToken, "keep-me").await.unwrap();
            s.pool.close().await;
        }
        let s = SqliteCredentialStore::open(&path).await.unwrap();
        assert_eq!(
            s.get(StorageKey::RefreshToken).await.unwrap().as_deref(),
            Some("keep-me")
        );
    }
}
