// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ownership-scoped record operations.
//!
//! Every secret field passes through the envelope codec exactly once per
//! direction. Every single-record operation matches on `(owner, id)`; a
//! record owned by someone else is reported as [`VaultError::NotFound`],
//! exactly like a record that does not exist.

use std::collections::BTreeMap;
use std::sync::Arc;

use razecrypt_core::{
    Document, DocumentStore, Fields, IdentityResolver, OwnerId, RecordId, VaultError,
};
use razecrypt_vault::EnvelopeCodec;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::mask::RevealMode;
use crate::record::{NewRecord, Record, RecordPatch, VaultRecord};
use crate::schema::{FieldRole, FieldSet, Schema};

/// Card and password records on top of a document store.
pub struct VaultRecords<S: ?Sized> {
    store: Arc<S>,
    codec: Arc<EnvelopeCodec>,
}

impl<S: ?Sized> Clone for VaultRecords<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<S: DocumentStore + ?Sized> VaultRecords<S> {
    pub fn new(store: Arc<S>, codec: Arc<EnvelopeCodec>) -> Self {
        Self { store, codec }
    }

    /// The underlying document store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Resolve the caller once and return a handle bound to that identity.
    pub async fn for_caller(
        &self,
        identity: &dyn IdentityResolver,
    ) -> Result<CallerVault<'_, S>, VaultError> {
        let owner = identity.resolve().await?;
        Ok(CallerVault {
            records: self,
            owner,
        })
    }

    /// Encrypt the secret fields of `input` and persist a new record.
    ///
    /// Duplicates are allowed; no existing record is consulted.
    pub async fn create<N: NewRecord>(
        &self,
        owner: &OwnerId,
        input: N,
    ) -> Result<RecordId, VaultError> {
        let schema = <N::Record as Record>::SCHEMA;
        let input: FieldSet = input.into();
        schema.validate_complete(&input)?;

        let fields = self.seal(schema, &input)?;
        let id = self.store.insert_one(schema.kind, owner, fields).await?;
        info!(kind = %schema.kind, owner = %owner, id = %id, "record created");
        Ok(id)
    }

    /// Every record of the collection owned by `owner`, newest first.
    ///
    /// One envelope that fails to open fails the whole read.
    pub async fn list<R: Record>(
        &self,
        owner: &OwnerId,
        mode: RevealMode,
    ) -> Result<Vec<R>, VaultError> {
        let schema = R::SCHEMA;
        let documents = self.store.find_many(schema.kind, owner).await?;
        debug!(kind = %schema.kind, owner = %owner, count = documents.len(), "listing records");

        documents
            .into_iter()
            .map(|doc| self.open(schema, doc, mode).and_then(R::try_from))
            .collect()
    }

    /// One record by its compound key.
    pub async fn get<R: Record>(
        &self,
        owner: &OwnerId,
        id: &RecordId,
        mode: RevealMode,
    ) -> Result<R, VaultError> {
        let schema = R::SCHEMA;
        let document = self
            .store
            .find_one(schema.kind, owner, id)
            .await?
            .ok_or(VaultError::NotFound)?;
        R::try_from(self.open(schema, document, mode)?)
    }

    /// Apply `patch` to the record matching `(owner, id)`.
    ///
    /// Supplied secret fields are sealed under fresh nonces; other fields keep
    /// their stored values.
    pub async fn update<P: RecordPatch>(
        &self,
        owner: &OwnerId,
        id: &RecordId,
        patch: P,
    ) -> Result<(), VaultError> {
        let schema = <P::Record as Record>::SCHEMA;
        let patch: FieldSet = patch.into();
        schema.validate_patch(&patch)?;

        let fields = self.seal(schema, &patch)?;
        let changed: Vec<&str> = patch.iter().map(|(name, _)| name).collect();
        match self
            .store
            .find_one_and_update(schema.kind, owner, id, fields)
            .await?
        {
            Some(_) => {
                info!(kind = %schema.kind, owner = %owner, id = %id, fields = ?changed, "record updated");
                Ok(())
            }
            None => Err(VaultError::NotFound),
        }
    }

    /// Remove the record matching `(owner, id)`. Deletion is permanent.
    pub async fn delete<R: Record>(&self, owner: &OwnerId, id: &RecordId) -> Result<(), VaultError> {
        let schema = R::SCHEMA;
        match self
            .store
            .find_one_and_delete(schema.kind, owner, id)
            .await?
        {
            Some(_) => {
                info!(kind = %schema.kind, owner = %owner, id = %id, "record deleted");
                Ok(())
            }
            None => Err(VaultError::NotFound),
        }
    }

    /// Seal secret fields and pass metadata through, under stored names.
    fn seal(&self, schema: &Schema, input: &FieldSet) -> Result<Fields, VaultError> {
        let mut fields = Fields::new();
        for (name, value) in input.iter() {
            let Some(spec) = schema.field(name) else {
                continue;
            };
            let stored = match spec.role {
                FieldRole::Metadata => value.expose_secret().to_string(),
                FieldRole::Secret { .. } => self.codec.encrypt(value.expose_secret())?,
            };
            fields.insert(spec.stored_name(), stored);
        }
        Ok(fields)
    }

    /// Split a stored document into metadata and opened secrets.
    fn open(
        &self,
        schema: &Schema,
        mut document: Document,
        mode: RevealMode,
    ) -> Result<VaultRecord, VaultError> {
        let mut metadata = Fields::new();
        let mut secrets = BTreeMap::new();

        for spec in schema.fields {
            let stored_name = spec.stored_name();
            let Some(stored) = document.fields.remove(&stored_name) else {
                return Err(match spec.role {
                    FieldRole::Metadata => VaultError::Internal(format!(
                        "stored {} {} has no {stored_name}",
                        schema.kind, document.id
                    )),
                    FieldRole::Secret { .. } => {
                        warn!(kind = %schema.kind, id = %document.id, field = spec.name, "envelope missing from stored record");
                        VaultError::Format(format!("{stored_name} is missing"))
                    }
                });
            };

            match spec.role {
                FieldRole::Metadata => {
                    metadata.insert(spec.name.to_string(), stored);
                }
                FieldRole::Secret { mask } => {
                    let plaintext = self.codec.decrypt(&stored).inspect_err(|e| {
                        warn!(
                            kind = %schema.kind,
                            id = %document.id,
                            field = spec.name,
                            error = %e,
                            "stored envelope could not be opened"
                        );
                    })?;
                    let value = match mode {
                        RevealMode::Full => plaintext,
                        RevealMode::Masked => {
                            SecretString::from(mask(plaintext.expose_secret()))
                        }
                    };
                    secrets.insert(spec.name.to_string(), value);
                }
            }
        }

        Ok(VaultRecord {
            id: document.id,
            kind: document.kind,
            owner_id: document.owner_id,
            metadata,
            secrets,
            created_at: document.created_at,
            updated_at: document.updated_at,
            reveal: mode,
        })
    }
}

/// Record operations bound to one resolved caller.
pub struct CallerVault<'a, S: ?Sized> {
    records: &'a VaultRecords<S>,
    owner: OwnerId,
}

impl<S: DocumentStore + ?Sized> CallerVault<'_, S> {
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub async fn create<N: NewRecord>(&self, input: N) -> Result<RecordId, VaultError> {
        self.records.create(&self.owner, input).await
    }

    pub async fn list<R: Record>(&self, mode: RevealMode) -> Result<Vec<R>, VaultError> {
        self.records.list(&self.owner, mode).await
    }

    pub async fn get<R: Record>(&self, id: &RecordId, mode: RevealMode) -> Result<R, VaultError> {
        self.records.get(&self.owner, id, mode).await
    }

    pub async fn update<P: RecordPatch>(&self, id: &RecordId, patch: P) -> Result<(), VaultError> {
        self.records.update(&self.owner, id, patch).await
    }

    pub async fn delete<R: Record>(&self, id: &RecordId) -> Result<(), VaultError> {
        self.records.delete::<R>(&self.owner, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, CardPatch, NewCard};
    use crate::password::{NewPassword, PasswordEntry};
    use razecrypt_core::StaticIdentity;
    use razecrypt_test_utils::{MockStore, owner, test_codec};
    use tracing_test::traced_test;

    fn vault() -> (VaultRecords<MockStore>, MockStore) {
        let store = MockStore::new();
        (
            VaultRecords::new(Arc::new(store.clone()), test_codec()),
            store,
        )
    }

    fn visa() -> NewCard {
        NewCard {
            card_name: "Visa".into(),
            expiry_month: "12".into(),
            expiry_year: "2030".into(),
            card_number: "4111111111111111".into(),
            cvv: "123".into(),
        }
    }

    #[tokio::test]
    async fn stored_document_holds_envelopes_not_plaintext() {
        let (vault, store) = vault();
        let id = vault.create(&owner("alice"), visa()).await.unwrap();

        let doc = store.raw_document(&id).await.unwrap();
        assert_eq!(doc.fields["card_name"], "Visa");
        assert_eq!(doc.fields["expiry_month"], "12");
        assert!(!doc.fields.contains_key("card_number"));
        assert!(!doc.fields.contains_key("cvv"));
        assert_eq!(doc.fields["encrypted_card_number"].split(':').count(), 3);
        assert!(!doc.fields["encrypted_card_number"].contains("4111"));
        assert_eq!(doc.fields["encrypted_cvv"].split(':').count(), 3);
    }

    #[tokio::test]
    async fn create_rejects_blank_fields_without_writing() {
        let (vault, store) = vault();
        let input = NewCard {
            cvv: " ".into(),
            ..visa()
        };
        let result = vault.create(&owner("alice"), input).await;
        assert!(matches!(result, Err(VaultError::Validation(_))));
        assert!(store.raw_documents().await.is_empty());
    }

    #[tokio::test]
    async fn masked_read_redacts_secrets() {
        let (vault, _) = vault();
        let alice = owner("alice");
        let id = vault.create(&alice, visa()).await.unwrap();

        let card: Card = vault.get(&alice, &id, RevealMode::Masked).await.unwrap();
        assert_eq!(card.card_number.expose_secret(), "•••• 1111");
        assert_eq!(card.cvv.expose_secret(), "•••");
        assert_eq!(card.display_number(), "•••• 1111");
        assert_eq!(card.card_name, "Visa");
    }

    #[tokio::test]
    async fn masked_read_still_authenticates() {
        let (vault, store) = vault();
        let alice = owner("alice");
        let id = vault.create(&alice, visa()).await.unwrap();
        store.overwrite_field(&id, "encrypted_cvv", "garbage").await;

        let result = vault.get::<Card>(&alice, &id, RevealMode::Masked).await;
        assert!(matches!(result, Err(VaultError::Format(_))));
    }

    #[tokio::test]
    async fn update_reseals_with_fresh_nonce() {
        let (vault, store) = vault();
        let alice = owner("alice");
        let id = vault.create(&alice, visa()).await.unwrap();
        let before = store.raw_document(&id).await.unwrap();

        vault
            .update(
                &alice,
                &id,
                CardPatch {
                    cvv: Some("123".into()),
                    ..CardPatch::default()
                },
            )
            .await
            .unwrap();

        let after = store.raw_document(&id).await.unwrap();
        let nonce = |s: &str| s.split(':').next().unwrap().to_string();
        assert_ne!(
            nonce(&before.fields["encrypted_cvv"]),
            nonce(&after.fields["encrypted_cvv"])
        );
        assert_eq!(
            before.fields["encrypted_card_number"],
            after.fields["encrypted_card_number"]
        );
        assert_eq!(before.created_at, after.created_at);
    }

    #[tokio::test]
    async fn missing_envelope_is_a_decryption_failure() {
        let (vault, store) = vault();
        let alice = owner("alice");
        let id = vault
            .create(
                &alice,
                NewPassword {
                    website: "example.com".into(),
                    username: "alice".into(),
                    password: "hunter2".into(),
                },
            )
            .await
            .unwrap();
        store.overwrite_field(&id, "encrypted_password", "").await;

        let err = vault
            .get::<PasswordEntry>(&alice, &id, RevealMode::Full)
            .await
            .unwrap_err();
        assert!(err.is_decryption_failure());
    }

    #[tokio::test]
    #[traced_test]
    async fn logs_record_ids_but_never_secrets() {
        let (vault, store) = vault();
        let alice = owner("alice");
        let id = vault.create(&alice, visa()).await.unwrap();
        store.overwrite_field(&id, "encrypted_card_number", "00:00:00").await;

        let result = vault.list::<Card>(&alice, RevealMode::Full).await;
        assert!(result.is_err());
        assert!(logs_contain("record created"));
        assert!(logs_contain(id.as_str()));
        assert!(logs_contain("stored envelope could not be opened"));
        assert!(!logs_contain("4111111111111111"));
        assert!(!logs_contain("cvv=123"));
    }

    #[tokio::test]
    async fn caller_handle_scopes_to_resolved_identity() {
        let (vault, _) = vault();
        let alice = vault
            .for_caller(&StaticIdentity::new("alice"))
            .await
            .unwrap();
        assert_eq!(alice.owner().as_str(), "alice");
        let id = alice.create(visa()).await.unwrap();

        let bob = vault.for_caller(&StaticIdentity::new("bob")).await.unwrap();
        assert!(bob.list::<Card>(RevealMode::Full).await.unwrap().is_empty());
        assert!(matches!(
            bob.delete::<Card>(&id).await,
            Err(VaultError::NotFound)
        ));
        assert_eq!(alice.list::<Card>(RevealMode::Full).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn anonymous_caller_is_unauthenticated() {
        let (vault, _) = vault();
        let result = vault.for_caller(&StaticIdentity::anonymous()).await;
        assert!(matches!(result, Err(VaultError::Unauthenticated)));
    }
}
