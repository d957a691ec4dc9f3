// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Razecrypt vault.

use strum::Display;
use thiserror::Error;

/// The primary error type used across the key derivation, envelope codec,
/// record access, and storage layers.
///
/// `Format` and `Authentication` stay distinct so logs and tests can tell a
/// malformed envelope from a failed tag check. Anything that leaves the
/// process should go through [`VaultError::caller_kind`], which folds both
/// into a single outcome.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Missing or unusable operator configuration (operator secret, KDF parameters).
    #[error("configuration error: {0}")]
    Config(String),

    /// The caller identity was absent or blank.
    #[error("caller identity is missing")]
    Unauthenticated,

    /// A create/update request was missing required fields.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A stored envelope could not be parsed (field count, hex, lengths).
    #[error("malformed envelope: {0}")]
    Format(String),

    /// AEAD tag verification failed: tampering, corruption, or a key mismatch.
    #[error("envelope authentication failed")]
    Authentication,

    /// No record matched the `(owner, id)` compound key.
    #[error("record not found")]
    NotFound,

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// The outcome a caller outside the core is allowed to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CallerErrorKind {
    #[strum(to_string = "service is not configured")]
    Configuration,
    #[strum(to_string = "unauthorized")]
    Unauthenticated,
    #[strum(to_string = "missing or invalid fields")]
    InvalidInput,
    #[strum(to_string = "record not found")]
    RecordNotFound,
    #[strum(to_string = "stored secret could not be decrypted")]
    DecryptionFailed,
    #[strum(to_string = "service unavailable")]
    Unavailable,
}

impl VaultError {
    /// Collapse this error into the kind a caller may see.
    ///
    /// Malformed envelopes and failed tag checks become the same
    /// `DecryptionFailed` outcome.
    pub fn caller_kind(&self) -> CallerErrorKind {
        match self {
            VaultError::Config(_) => CallerErrorKind::Configuration,
            VaultError::Unauthenticated => CallerErrorKind::Unauthenticated,
            VaultError::Validation(_) => CallerErrorKind::InvalidInput,
            VaultError::Format(_) | VaultError::Authentication => {
                CallerErrorKind::DecryptionFailed
            }
            VaultError::NotFound => CallerErrorKind::RecordNotFound,
            VaultError::Storage { .. } | VaultError::Internal(_) => CallerErrorKind::Unavailable,
        }
    }

    /// Wrap a backend error as a storage error, keeping it as the source.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        VaultError::Storage {
            source: Box::new(err),
        }
    }

    /// True for errors that originate in the envelope codec on the read path.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, VaultError::Format(_) | VaultError::Authentication)
    }
}
