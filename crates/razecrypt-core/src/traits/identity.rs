// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity resolution for callers of the record access layer.

use async_trait::async_trait;

use crate::error::VaultError;
use crate::types::OwnerId;

/// Resolves the authenticated caller of the current request.
///
/// The vault performs no authentication of its own; it scopes every record
/// operation to whatever identity this collaborator returns.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Returns the caller's identity, or [`VaultError::Unauthenticated`].
    async fn resolve(&self) -> Result<OwnerId, VaultError>;
}

/// A resolver bound to one identity fixed up front (CLI flag, test fixture).
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    owner: Option<String>,
}

impl StaticIdentity {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
        }
    }

    /// A resolver with no caller, for unauthenticated contexts.
    pub fn anonymous() -> Self {
        Self { owner: None }
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentity {
    async fn resolve(&self) -> Result<OwnerId, VaultError> {
        match &self.owner {
            Some(owner) => OwnerId::new(owner.clone()),
            None => Err(VaultError::Unauthenticated),
        }
    }
}
