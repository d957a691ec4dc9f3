// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness backed by a real SQLite database.
//!
//! `TestHarness` opens a `SqliteStore` in a temporary directory and derives
//! an envelope codec, so integration tests exercise the same storage path
//! the binary uses.

use std::sync::Arc;

use razecrypt_config::model::StorageConfig;
use razecrypt_core::{DocumentStore, VaultError};
use razecrypt_storage::SqliteStore;
use razecrypt_vault::EnvelopeCodec;

use crate::fixtures::{TEST_SECRET, codec_for};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    secret: String,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            secret: TEST_SECRET.to_string(),
        }
    }

    /// Derive the codec from a specific operator secret.
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    /// Build the harness, creating and initializing the database.
    pub async fn build(self) -> Result<TestHarness, VaultError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| VaultError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let store = SqliteStore::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        });
        store.initialize().await?;

        Ok(TestHarness {
            store: Arc::new(store),
            codec: codec_for(&self.secret),
            _temp_dir: temp_dir,
        })
    }
}

/// A SQLite store plus codec living in a temporary directory.
pub struct TestHarness {
    pub store: Arc<SqliteStore>,
    pub codec: Arc<EnvelopeCodec>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }
}
