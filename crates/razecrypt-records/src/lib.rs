// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault record access for the Razecrypt vault.
//!
//! Binds the envelope codec to a document store under a strict ownership
//! rule: a record can only be read, changed, or removed by the owner it was
//! created for.
//!
//! # Components
//!
//! - [`VaultRecords`] - create, list, get, update, delete per `(owner, id)`
//! - [`Card`] / [`PasswordEntry`] - typed views of the two collections
//! - [`RevealMode`] - full or masked secrets on read

pub mod access;
pub mod card;
pub mod mask;
pub mod password;
pub mod record;
pub mod schema;

pub use access::{CallerVault, VaultRecords};
pub use card::{Card, CardPatch, NewCard, format_card_number};
pub use mask::RevealMode;
pub use password::{NewPassword, PasswordEntry, PasswordPatch};
pub use record::{NewRecord, Record, RecordPatch, VaultRecord};
pub use schema::{FieldSet, Schema};
