// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decrypted records and the traits tying typed records to their schema.

use std::collections::BTreeMap;

use razecrypt_core::{Fields, OwnerId, RecordId, RecordKind, VaultError};
use secrecy::SecretString;

use crate::mask::RevealMode;
use crate::schema::{FieldSet, Schema};

/// A stored record after every secret field has been opened.
///
/// In [`RevealMode::Masked`] the `secrets` map holds redacted forms.
#[derive(Debug)]
pub struct VaultRecord {
    pub id: RecordId,
    pub kind: RecordKind,
    pub owner_id: OwnerId,
    pub metadata: Fields,
    pub secrets: BTreeMap<String, SecretString>,
    pub created_at: String,
    pub updated_at: String,
    pub reveal: RevealMode,
}

impl VaultRecord {
    /// Remove a metadata field, failing if the stored record lacks it.
    pub fn take_metadata(&mut self, name: &str) -> Result<String, VaultError> {
        self.metadata.remove(name).ok_or_else(|| {
            VaultError::Internal(format!("stored {} {} has no {name}", self.kind, self.id))
        })
    }

    /// Remove an opened secret field.
    pub fn take_secret(&mut self, name: &str) -> Result<SecretString, VaultError> {
        self.secrets.remove(name).ok_or_else(|| {
            VaultError::Internal(format!("{} {} has no secret {name}", self.kind, self.id))
        })
    }
}

/// A typed view over one collection.
pub trait Record: TryFrom<VaultRecord, Error = VaultError> + Send {
    const SCHEMA: &'static Schema;
}

/// Creation input for a [`Record`]; every schema field is required.
pub trait NewRecord: Into<FieldSet> + Send {
    type Record: Record;
}

/// Partial update for a [`Record`]; absent fields keep their stored values.
pub trait RecordPatch: Into<FieldSet> + Send {
    type Record: Record;
}
