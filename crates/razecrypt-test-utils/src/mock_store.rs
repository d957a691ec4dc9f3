// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory document store for deterministic testing.
//!
//! `MockStore` implements `DocumentStore` over a mutex-guarded vector, and
//! exposes the raw stored documents so tests can inspect or tamper with
//! envelopes directly.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tokio::sync::Mutex;

use razecrypt_core::{
    AdapterType, Document, DocumentStore, Fields, HealthStatus, OwnerId, PluginAdapter, RecordId,
    RecordKind, VaultError,
};

/// A mock document store holding everything in memory.
///
/// Documents are kept in insertion order; reads return them newest first.
#[derive(Clone, Default)]
pub struct MockStore {
    documents: Arc<Mutex<Vec<Document>>>,
}

impl MockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored document, across owners and kinds, in insertion order.
    pub async fn raw_documents(&self) -> Vec<Document> {
        self.documents.lock().await.clone()
    }

    /// The stored document with `id`, regardless of owner.
    pub async fn raw_document(&self, id: &RecordId) -> Option<Document> {
        self.documents
            .lock()
            .await
            .iter()
            .find(|d| &d.id == id)
            .cloned()
    }

    /// Overwrite one stored field, bypassing the vault. Returns false if `id`
    /// is unknown.
    pub async fn overwrite_field(&self, id: &RecordId, field: &str, value: &str) -> bool {
        let mut documents = self.documents.lock().await;
        match documents.iter_mut().find(|d| &d.id == id) {
            Some(doc) => {
                doc.fields.insert(field.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    fn matches(doc: &Document, kind: RecordKind, owner: &OwnerId, id: &RecordId) -> bool {
        doc.kind == kind && &doc.owner_id == owner && &doc.id == id
    }
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, VaultError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VaultError> {
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn initialize(&self) -> Result<(), VaultError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), VaultError> {
        Ok(())
    }

    async fn insert_one(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
        fields: Fields,
    ) -> Result<RecordId, VaultError> {
        let id = RecordId(uuid::Uuid::new_v4().to_string());
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.documents.lock().await.push(Document {
            id: id.clone(),
            kind,
            owner_id: owner.clone(),
            fields,
            created_at: now.clone(),
            updated_at: now,
        });
        Ok(id)
    }

    async fn find_many(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
    ) -> Result<Vec<Document>, VaultError> {
        Ok(self
            .documents
            .lock()
            .await
            .iter()
            .rev()
            .filter(|d| d.kind == kind && &d.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn find_one(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
        id: &RecordId,
    ) -> Result<Option<Document>, VaultError> {
        Ok(self
            .documents
            .lock()
            .await
            .iter()
            .find(|d| Self::matches(d, kind, owner, id))
            .cloned())
    }

    async fn find_one_and_update(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
        id: &RecordId,
        fields: Fields,
    ) -> Result<Option<Document>, VaultError> {
        let mut documents = self.documents.lock().await;
        let Some(doc) = documents
            .iter_mut()
            .find(|d| Self::matches(d, kind, owner, id))
        else {
            return Ok(None);
        };
        doc.fields.extend(fields);
        doc.updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        Ok(Some(doc.clone()))
    }

    async fn find_one_and_delete(
        &self,
        kind: RecordKind,
        owner: &OwnerId,
        id: &RecordId,
    ) -> Result<Option<Document>, VaultError> {
        let mut documents = self.documents.lock().await;
        let position = documents
            .iter()
            .position(|d| Self::matches(d, kind, owner, id));
        Ok(position.map(|i| documents.remove(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn find_many_is_newest_first_and_owner_scoped() {
        let store = MockStore::new();
        let alice = OwnerId::new("alice").unwrap();
        let bob = OwnerId::new("bob").unwrap();

        let a1 = store.insert_one(RecordKind::Card, &alice, Fields::new()).await.unwrap();
        store.insert_one(RecordKind::Card, &bob, Fields::new()).await.unwrap();
        let a2 = store.insert_one(RecordKind::Card, &alice, Fields::new()).await.unwrap();

        let ids: Vec<RecordId> = store
            .find_many(RecordKind::Card, &alice)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![a2, a1]);
    }

    #[tokio::test]
    async fn delete_requires_matching_owner() {
        let store = MockStore::new();
        let alice = OwnerId::new("alice").unwrap();
        let bob = OwnerId::new("bob").unwrap();
        let id = store.insert_one(RecordKind::Password, &alice, Fields::new()).await.unwrap();

        assert!(
            store
                .find_one_and_delete(RecordKind::Password, &bob, &id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(store.raw_document(&id).await.is_some());
        assert!(
            store
                .find_one_and_delete(RecordKind::Password, &alice, &id)
                .await
                .unwrap()
                .is_some()
        );
        assert!(store.raw_documents().await.is_empty());
    }
}
