// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Website login records.

use razecrypt_core::{RecordId, RecordKind, VaultError};
use secrecy::SecretString;

use crate::mask::{RevealMode, mask_password};
use crate::record::{NewRecord, Record, RecordPatch, VaultRecord};
use crate::schema::{FieldSet, FieldSpec, Schema};

pub const WEBSITE: &str = "website";
pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";

pub static PASSWORD_SCHEMA: Schema = Schema {
    kind: RecordKind::Password,
    fields: &[
        FieldSpec::metadata(WEBSITE),
        FieldSpec::metadata(USERNAME),
        FieldSpec::secret(PASSWORD, mask_password),
    ],
};

/// A stored login with its password opened.
#[derive(Debug)]
pub struct PasswordEntry {
    pub id: RecordId,
    pub website: String,
    pub username: String,
    pub password: SecretString,
    pub reveal: RevealMode,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<VaultRecord> for PasswordEntry {
    type Error = VaultError;

    fn try_from(mut record: VaultRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            website: record.take_metadata(WEBSITE)?,
            username: record.take_metadata(USERNAME)?,
            password: record.take_secret(PASSWORD)?,
            reveal: record.reveal,
            id: record.id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl Record for PasswordEntry {
    const SCHEMA: &'static Schema = &PASSWORD_SCHEMA;
}

/// Input for creating a login.
#[derive(Debug, Clone, Default)]
pub struct NewPassword {
    pub website: String,
    pub username: String,
    pub password: String,
}

impl From<NewPassword> for FieldSet {
    fn from(entry: NewPassword) -> Self {
        FieldSet::new()
            .with(WEBSITE, entry.website)
            .with(USERNAME, entry.username)
            .with(PASSWORD, entry.password)
    }
}

impl NewRecord for NewPassword {
    type Record = PasswordEntry;
}

/// Fields to change on an existing login.
#[derive(Debug, Clone, Default)]
pub struct PasswordPatch {
    pub website: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl From<PasswordPatch> for FieldSet {
    fn from(patch: PasswordPatch) -> Self {
        FieldSet::new()
            .with_opt(WEBSITE, patch.website)
            .with_opt(USERNAME, patch.username)
            .with_opt(PASSWORD, patch.password)
    }
}

impl RecordPatch for PasswordPatch {
    type Record = PasswordEntry;
}
