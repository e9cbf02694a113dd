//! libSQL backend for the session cache.
//!
//! Supports local file and in-memory databases. The file-backed cache plays
//! the part the browser's local storage played for the web frontends: it
//! survives restarts on the same machine.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::info;

use crate::error::CacheError;
use crate::store::migrations;
use crate::store::traits::{RoleHintCache, cache_keys};

/// libSQL session cache backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlCache {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlCache {
    /// Open (or create) a local cache file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CacheError::Open(format!("Failed to create cache directory: {e}")))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| CacheError::Open(format!("Failed to open cache database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| CacheError::Open(format!("Failed to create connection: {e}")))?;

        let cache = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&cache.conn).await?;
        info!(path = %path.display(), "Session cache opened");
        Ok(cache)
    }

    /// Create an in-memory cache (for tests).
    pub async fn new_memory() -> Result<Self, CacheError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| CacheError::Open(format!("Failed to create in-memory cache: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| CacheError::Open(format!("Failed to create connection: {e}")))?;

        let cache = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&cache.conn).await?;
        Ok(cache)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut rows = self
            .conn
            .query(
                "SELECT value FROM session_cache WHERE key = ?1",
                params![key],
            )
            .await
            .map_err(|e| CacheError::Query(format!("Failed to read {key}: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| CacheError::Query(format!("Failed to read {key}: {e}")))?;

        match row {
            Some(row) => {
                let value: String = row
                    .get(0)
                    .map_err(|e| CacheError::Query(format!("Failed to decode {key}: {e}")))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.conn
            .execute(
                "INSERT INTO session_cache (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .await
            .map_err(|e| CacheError::Query(format!("Failed to write {key}: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl RoleHintCache for LibSqlCache {
    async fn role_hint(&self) -> Result<Option<String>, CacheError> {
        self.get(cache_keys::USER_ROLE).await
    }

    async fn set_role_hint(&self, role: &str) -> Result<(), CacheError> {
        self.set(cache_keys::USER_ROLE, role).await
    }

    async fn registration_complete(&self) -> Result<bool, CacheError> {
        Ok(self
            .get(cache_keys::REGISTRATION_COMPLETE)
            .await?
            .is_some_and(|v| v == "true"))
    }

    async fn set_registration_complete(&self, complete: bool) -> Result<(), CacheError> {
        self.set(
            cache_keys::REGISTRATION_COMPLETE,
            if complete { "true" } else { "false" },
        )
        .await
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.conn
            .execute(
                "DELETE FROM session_cache WHERE key IN (?1, ?2)",
                params![cache_keys::USER_ROLE, cache_keys::REGISTRATION_COMPLETE],
            )
            .await
            .map_err(|e| CacheError::Query(format!("Failed to clear cache: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hint_roundtrip() {
        let cache = LibSqlCache::new_memory().await.unwrap();
        assert_eq!(cache.role_hint().await.unwrap(), None);

        cache.set_role_hint("photographer").await.unwrap();
        assert_eq!(
            cache.role_hint().await.unwrap(),
            Some("photographer".to_string())
        );

        // Overwrite, not duplicate.
        cache.set_role_hint("caterer").await.unwrap();
        assert_eq!(cache.role_hint().await.unwrap(), Some("caterer".to_string()));
    }

    #[tokio::test]
    async fn registration_flag_defaults_to_false() {
        let cache = LibSqlCache::new_memory().await.unwrap();
        assert!(!cache.registration_complete().await.unwrap());

        cache.set_registration_complete(true).await.unwrap();
        assert!(cache.registration_complete().await.unwrap());

        cache.set_registration_complete(false).await.unwrap();
        assert!(!cache.registration_complete().await.unwrap());
    }

    #[tokio::test]
    async fn clear_removes_both_keys() {
        let cache = LibSqlCache::new_memory().await.unwrap();
        cache.set_role_hint("transport").await.unwrap();
        cache.set_registration_complete(true).await.unwrap();

        cache.clear().await.unwrap();
        assert_eq!(cache.role_hint().await.unwrap(), None);
        assert!(!cache.registration_complete().await.unwrap());
    }

    #[tokio::test]
    async fn file_backed_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");

        {
            let cache = LibSqlCache::new_local(&path).await.unwrap();
            cache.set_role_hint("event_company").await.unwrap();
        }

        let reopened = LibSqlCache::new_local(&path).await.unwrap();
        assert_eq!(
            reopened.role_hint().await.unwrap(),
            Some("event_company".to_string())
        );
    }
}
