// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the DocumentStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use razecrypt_config::model::StorageConfig;
use razecrypt_core::{
    AdapterType, Document, DocumentStore, Fields, HealthStatus, OwnerId, PluginAdapter, RecordId,
    RecordKind, VaultError,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed document store.
///
/// Wraps a [`Database`] handle and delegates all query operations to
/// [`queries::records`]. The database is opened on the first call to
/// [`DocumentStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`DocumentStore::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, VaultError> {
        self.db.get().ok_or_else(|| VaultError::Storage {
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

    async fn health_check(&self) -> Result<HealthStatus, VaultError> {
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

    async fn shutdown(&self) -> Result<(), VaultError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn initialize(&self) -> Result<(), VaultError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| VaultError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), VaultError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn insert_one(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
        fields: Fields,
    ) -> Result<RecordId, VaultError> {
        queries::records::insert(self.db()?, kind, owner, &fields).await
    }

    async fn find_many(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
    ) -> Result<Vec<Document>, VaultError> {
        queries::records::list(self.db()?, kind, owner).await
    }

    async fn find_one(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
        id: &RecordId,
    ) -> Result<Option<Document>, VaultError> {
        queries::records::get(self.db()?, kind, owner, id).await
    }

    async fn find_one_and_update(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
        id: &RecordId,
        fields: Fields,
    ) -> Result<Option<Document>, VaultError> {
        queries::records::update(self.db()?, kind, owner, id, &fields).await
    }

    async fn find_one_and_delete(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
        id: &RecordId,
    ) -> Result<Option<Document>, VaultError> {
        queries::records::delete(self.db()?, kind, owner, id).await
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
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        let result = store.initialize().await;
        assert!(result.is_err(), "second initialize should fail");
    }

    #[tokio::test]
    async fn health_check_reflects_initialization() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        assert!(store.health_check().await.is_err());
        store.initialize().await.unwrap();
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn operations_before_initialize_are_storage_errors() {
        let store = SqliteStore::new(make_config("unused.db"));
        let owner = OwnerId::new("alice").unwrap();
        let result = store.find_many(RecordKind::Card, &owner).await;
        assert!(matches!(result, Err(VaultError::Storage { .. })));
    }

    #[tokio::test]
    async fn documents_survive_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("persist.db");
        let owner = OwnerId::new("alice").unwrap();

        let id = {
            let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));
            store.initialize().await.unwrap();
            let mut fields = Fields::new();
            fields.insert("website".into(), "example.com".into());
            let id = store
                .insert_one(RecordKind::Password, &owner, fields)
                .await
                .unwrap();
            store.shutdown().await.unwrap();
            id
        };

        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();
        let doc = store
            .find_one(RecordKind::Password, &owner, &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.fields["website"], "example.com");
        store.close().await.unwrap();
    }
}
