// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-collection field layout: which fields are plaintext metadata and which
//! are sealed into envelopes.

use std::collections::BTreeMap;

use razecrypt_core::{RecordKind, VaultError};
use secrecy::{ExposeSecret, SecretString};

/// Prefix of the stored name of a secret field.
pub const ENCRYPTED_PREFIX: &str = "encrypted_";

/// How a field is stored.
#[derive(Debug, Clone, Copy)]
pub enum FieldRole {
    /// Stored verbatim.
    Metadata,
    /// Sealed into an envelope under `encrypted_<name>`; `mask` renders the
    /// redacted form for [`RevealMode::Masked`](crate::RevealMode::Masked).
    Secret { mask: fn(&str) -> String },
}

/// One field of a record schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub role: FieldRole,
}

impl FieldSpec {
    pub const fn metadata(name: &'static str) -> Self {
        Self {
            name,
            role: FieldRole::Metadata,
        }
    }

    pub const fn secret(name: &'static str, mask: fn(&str) -> String) -> Self {
        Self {
            name,
            role: FieldRole::Secret { mask },
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self.role, FieldRole::Secret { .. })
    }

    /// Field name as persisted by the storage collaborator.
    pub fn stored_name(&self) -> String {
        match self.role {
            FieldRole::Metadata => self.name.to_string(),
            FieldRole::Secret { .. } => format!("{ENCRYPTED_PREFIX}{}", self.name),
        }
    }
}

/// The field layout of one collection.
#[derive(Debug)]
pub struct Schema {
    pub kind: RecordKind,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn secret_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.is_secret())
    }

    /// Every field present and non-blank; nothing outside the schema.
    pub fn validate_complete(&self, input: &FieldSet) -> Result<(), VaultError> {
        self.validate_known(input)?;
        let missing: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| input.get(f.name).is_none())
            .map(|f| f.name)
            .collect();
        if !missing.is_empty() {
            return Err(VaultError::Validation(format!(
                "missing {} field(s): {}",
                self.kind,
                missing.join(", ")
            )));
        }
        Ok(())
    }

    /// At least one field; every supplied field known and non-blank.
    pub fn validate_patch(&self, input: &FieldSet) -> Result<(), VaultError> {
        if input.is_empty() {
            return Err(VaultError::Validation(
                "update must change at least one field".to_string(),
            ));
        }
        self.validate_known(input)
    }

    fn validate_known(&self, input: &FieldSet) -> Result<(), VaultError> {
        for (name, value) in input.iter() {
            if self.field(name).is_none() {
                return Err(VaultError::Validation(format!(
                    "unknown {} field: {name}",
                    self.kind
                )));
            }
            if value.expose_secret().trim().is_empty() {
                return Err(VaultError::Validation(format!("{name} must not be blank")));
            }
        }
        Ok(())
    }
}

/// Plaintext field values supplied by a caller.
///
/// Values are held as [`SecretString`] so secrets are zeroed on drop and
/// never appear in `Debug` output.
#[derive(Default)]
pub struct FieldSet {
    values: BTreeMap<String, SecretString>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous value.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a field only when `value` is present.
    pub fn with_opt(mut self, name: &str, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.insert(name, value);
        }
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.values
            .insert(name.to_string(), SecretString::from(value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&SecretString> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecretString)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl std::fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}
