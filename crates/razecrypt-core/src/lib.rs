// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Razecrypt vault.
//!
//! This crate provides the error taxonomy, the owner/record types, and the
//! collaborator traits (storage and identity) that the encryption-at-rest
//! layers are written against.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{CallerErrorKind, VaultError};
pub use types::{AdapterType, Document, Fields, HealthStatus, OwnerId, RecordId, RecordKind};

pub use traits::{DocumentStore, IdentityResolver, PluginAdapter, StaticIdentity};
