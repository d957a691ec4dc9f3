// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage collaborator trait for secret-bearing documents.

use async_trait::async_trait;

use crate::error::VaultError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Document, Fields, OwnerId, RecordId, RecordKind};

/// A document store queried by owner identity and record id.
///
/// Every lookup that targets a single record matches on the full
/// `(kind, owner, id)` key. An id that exists under another owner is
/// indistinguishable from an id that does not exist.
///
/// Implementations must serialize mutations of the same record: a delete
/// racing an update must never leave the updated document behind.
#[async_trait]
pub trait DocumentStore: PluginAdapter {
    /// Initializes the storage backend (migrations, connections, etc.).
    async fn initialize(&self) -> Result<(), VaultError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), VaultError>;

    /// Persist a new document and return its generated id.
    async fn insert_one(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
        fields: Fields,
    ) -> Result<RecordId, VaultError>;

    /// All documents of `kind` owned by `owner`, most recently created first.
    async fn find_many(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
    ) -> Result<Vec<Document>, VaultError>;

    /// The single document matching the compound key, if any.
    async fn find_one(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
        id: &RecordId,
    ) -> Result<Option<Document>, VaultError>;

    /// Merge `fields` into the matching document and return the updated document.
    ///
    /// Fields not present in `fields` keep their stored values.
    async fn find_one_and_update(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
        id: &RecordId,
        fields: Fields,
    ) -> Result<Option<Document>, VaultError>;

    /// Remove the matching document and return it as it was before removal.
    async fn find_one_and_delete(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
        id: &RecordId,
    ) -> Result<Option<Document>, VaultError>;
}
