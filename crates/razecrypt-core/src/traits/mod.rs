// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the collaborators the vault core depends on.
//!
//! All adapters use `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod identity;
pub mod storage;

pub use adapter::PluginAdapter;
pub use identity::{IdentityResolver, StaticIdentity};
pub use storage::DocumentStore;
