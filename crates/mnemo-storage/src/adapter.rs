// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the Exchange Log and Memory Store traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use mnemo_config::model::StorageConfig;
use mnemo_core::types::{MemoryUpdate, SearchQuery};
use mnemo_core::{
    AdapterType, ExchangeLogAdapter, ExchangeMessage, HealthStatus, MemoryRecord,
    MemoryStoreAdapter, MnemoError, PluginAdapter, RankedRecord, Role,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed Exchange Log and Memory Store.
///
/// Both stores share one [`Database`] handle. The database is opened on
/// the first call to [`SqliteStorage::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`SqliteStorage::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database and apply migrations.
    pub async fn initialize(&self) -> Result<(), MnemoError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| MnemoError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoint the WAL. The connection itself closes when the adapter drops.
    pub async fn close(&self) -> Result<(), MnemoError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    fn db(&self) -> Result<&Database, MnemoError> {
        self.db.get().ok_or_else(|| MnemoError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        let db = match self.db() {
            Ok(db) => db,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> { conn.execute_batch("SELECT 1;") })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        if self.db.get().is_some() {
            self.close().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ExchangeLogAdapter for SqliteStorage {
    async fn append(&self, thread_id: &str, role: Role, content: &str) -> Result<i64, MnemoError> {
        queries::exchanges::append(self.db()?, thread_id, role, content).await
    }

    async fn list_unconsolidated(&self, thread_id: &str) -> Result<Vec<ExchangeMessage>, MnemoError> {
        queries::exchanges::list_unconsolidated(self.db()?, thread_id).await
    }

    async fn list_recent(
        &self,
        thread_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ExchangeMessage>, MnemoError> {
        queries::exchanges::list_recent(self.db()?, thread_id, limit).await
    }

    async fn mark_consolidated(&self, ids: &[i64]) -> Result<(), MnemoError> {
        let changed = queries::exchanges::mark_consolidated(self.db()?, ids).await?;
        debug!(requested = ids.len(), changed, "marked messages consolidated");
        Ok(())
    }
}

#[async_trait]
impl MemoryStoreAdapter for SqliteStorage {
    async fn insert(&self, record: &MemoryRecord) -> Result<String, MnemoError> {
        queries::memories::insert(self.db()?, record).await
    }

    async fn get(&self, id: &str) -> Result<Option<MemoryRecord>, MnemoError> {
        queries::memories::get(self.db()?, id).await
    }

    async fn update(&self, id: &str, update: &MemoryUpdate) -> Result<bool, MnemoError> {
        queries::memories::update(self.db()?, id, update).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RankedRecord>, MnemoError> {
        queries::memories::search(self.db()?, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_in(dir: &tempfile::TempDir) -> StorageConfig {
        StorageConfig {
            database_path: dir.path().join("mnemo.db").to_string_lossy().into_owned(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(config_in(&dir));
        let err = storage.list_unconsolidated("t1").await.unwrap_err();
        assert!(err.to_string().contains("not initialized"));
        assert!(matches!(
            storage.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    async fn double_initialize_is_rejected() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(config_in(&dir));
        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
        storage.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn adapter_serves_both_stores() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(config_in(&dir));
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        assert_eq!(storage.adapter_type(), AdapterType::Storage);

        let id = storage.append("t1", Role::User, "I like tea").await.unwrap();
        storage.mark_consolidated(&[id]).await.unwrap();
        assert!(storage.list_unconsolidated("t1").await.unwrap().is_empty());
        assert_eq!(storage.list_recent("t1", Some(10)).await.unwrap().len(), 1);

        let query = SearchQuery {
            owner_id: "alice".into(),
            kind: mnemo_core::MemoryKind::Semantic,
            thread_id: None,
            embedding: None,
            threshold: 0.0,
            limit: 5,
        };
        assert!(storage.search(&query).await.unwrap().is_empty());
        storage.shutdown().await.unwrap();
    }
}
