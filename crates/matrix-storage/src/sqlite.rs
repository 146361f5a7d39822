// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the KeyValueStore trait.

use async_trait::async_trait;
use rusqlite::params;
use tokio::sync::OnceCell;
use tracing::debug;

use matrix_config::model::StorageConfig;
use matrix_core::{AdapterType, HealthStatus, KeyValueStore, MatrixError, PluginAdapter};

use crate::database::{Database, map_tr_err};

/// Durable key/value store, the process analogue of browser local storage.
///
/// The database is lazily opened on the first call to
/// [`KeyValueStore::initialize`]; every other operation fails until then.
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new store for the configured database path.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, MatrixError> {
        self.db.get().ok_or_else(|| MatrixError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MatrixError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MatrixError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn initialize(&self) -> Result<(), MatrixError> {
        let path = self.config.database_path.clone();
        let wal_mode = self.config.wal_mode;
        self.db
            .get_or_try_init(|| Database::open(&path, wal_mode))
            .await?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, MatrixError> {
        let key = key.to_string();
        self.db()?
            .connection()
            .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
                let result = conn.query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                );
                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(map_tr_err)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), MatrixError> {
        let key = key.to_string();
        let value = value.to_string();
        self.db()?
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO kv_store (key, value, updated_at)
                     VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                     ON CONFLICT(key) DO UPDATE SET
                         value = excluded.value,
                         updated_at = excluded.updated_at",
                    params![key, value],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn remove(&self, key: &str) -> Result<(), MatrixError> {
        let key = key.to_string();
        self.db()?
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn keys(&self) -> Result<Vec<String>, MatrixError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_store_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(store.name(), "sqlite");
        assert_eq!(store.version(), semver::Version::new(0, 1, 0));
        assert_eq!(store.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_creates_database_and_parent_dirs() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/dir/matrix.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("twice.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        store.initialize().await.unwrap();
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("uninit.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        let err = store.get("matrix_lang").await.unwrap_err();
        assert!(err.to_string().contains("not initialized"));
    }

    #[tokio::test]
    async fn set_overwrites_and_remove_deletes() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("kv.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        assert_eq!(store.get("matrix_theme").await.unwrap(), None);
        store.set("matrix_theme", "light").await.unwrap();
        store.set("matrix_theme", "dark").await.unwrap();
        assert_eq!(
            store.get("matrix_theme").await.unwrap().as_deref(),
            Some("dark")
        );

        store.remove("matrix_theme").await.unwrap();
        store.remove("matrix_theme").await.unwrap();
        assert_eq!(store.get("matrix_theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn keys_are_sorted() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("keys.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        store.set("matrix_theme", "dark").await.unwrap();
        store.set("consent_logs", "[]").await.unwrap();
        store.set("matrix_lang", "ja").await.unwrap();

        assert_eq!(
            store.keys().await.unwrap(),
            vec!["consent_logs", "matrix_lang", "matrix_theme"]
        );
    }

    #[tokio::test]
    async fn shutdown_checkpoints_without_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("close.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        // Shutdown before initialize is a no-op.
        store.shutdown().await.unwrap();

        store.initialize().await.unwrap();
        store.set("k", "v").await.unwrap();
        store.shutdown().await.unwrap();
    }
}
