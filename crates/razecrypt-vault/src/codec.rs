// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide envelope codec.

use razecrypt_config::model::VaultConfig;
use razecrypt_core::VaultError;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::envelope;
use crate::kdf::{self, KdfParams, ProtectionKey};

const SELF_TEST_PLAINTEXT: &str = "razecrypt self-test";

/// Encrypts and decrypts secret fields under one protection key.
///
/// The key is derived once at startup and held for the life of the process.
/// Share the codec behind an `Arc`; it is immutable after construction.
pub struct EnvelopeCodec {
    key: ProtectionKey,
    params: KdfParams,
}

impl EnvelopeCodec {
    /// Derive the protection key from `secret` with the configured KDF.
    ///
    /// This is deliberately slow; call it from a blocking context.
    pub fn from_config(secret: &SecretString, config: &VaultConfig) -> Result<Self, VaultError> {
        let params = KdfParams::from_config(config);
        Self::derive(secret, &config.salt, params)
    }

    /// Derive the protection key with explicit parameters.
    pub fn derive(
        secret: &SecretString,
        salt: &str,
        params: KdfParams,
    ) -> Result<Self, VaultError> {
        let key = kdf::derive_key(secret, salt, &params)?;
        info!(kdf = %params.algorithm(), "protection key derived");
        Ok(Self { key, params })
    }

    /// Build a codec around an existing key.
    pub fn with_key(key: ProtectionKey) -> Self {
        Self {
            key,
            params: KdfParams::default(),
        }
    }

    /// Encrypt one secret value into its envelope string.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        envelope::encrypt(plaintext, &self.key)
    }

    /// Decrypt one envelope string.
    pub fn decrypt(&self, envelope: &str) -> Result<SecretString, VaultError> {
        envelope::decrypt(envelope, &self.key)
    }

    /// Round-trip a fixed value to confirm the key and cipher are usable.
    pub fn self_test(&self) -> Result<(), VaultError> {
        let sealed = self.encrypt(SELF_TEST_PLAINTEXT)?;
        let opened = self.decrypt(&sealed)?;
        if opened.expose_secret() != SELF_TEST_PLAINTEXT {
            return Err(VaultError::Internal(
                "envelope self-test returned a different plaintext".to_string(),
            ));
        }
        debug!("envelope self-test passed");
        Ok(())
    }

    /// The KDF parameters the key was derived with.
    pub fn kdf_params(&self) -> &KdfParams {
        &self.params
    }
}

impl std::fmt::Debug for EnvelopeCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeCodec")
            .field("key", &"[REDACTED]")
            .field("kdf", &self.params.algorithm())
            .finish()
    }
}
