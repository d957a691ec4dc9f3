// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-based derivation of the 256-bit protection key.
//!
//! The operator secret and the fixed application salt go through one
//! computationally hard KDF. scrypt (N = 2^14, r = 8, p = 1) is the default
//! and reproduces the keys of existing deployments; Argon2id and
//! PBKDF2-HMAC-SHA256 are selectable through [`VaultConfig`].

use std::num::NonZeroU32;

use razecrypt_config::model::{KdfAlgorithm, VaultConfig};
use razecrypt_core::VaultError;
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

/// Length of the derived key in bytes.
pub const KEY_LEN: usize = 32;

/// The derived secret-protection key.
///
/// Zeroed on drop; `Debug` never prints the bytes.
pub struct ProtectionKey(Zeroizing<[u8; KEY_LEN]>);

impl ProtectionKey {
    /// Wrap raw key bytes (used by tests and known-answer vectors).
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl PartialEq for ProtectionKey {
    fn eq(&self, other: &Self) -> bool {
        self.0[..] == other.0[..]
    }
}

impl Eq for ProtectionKey {}

impl std::fmt::Debug for ProtectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ProtectionKey([REDACTED])")
    }
}

/// Cost parameters for one KDF primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfParams {
    Scrypt { log_n: u8, r: u32, p: u32 },
    Argon2id {
        memory_cost: u32,
        iterations: u32,
        parallelism: u32,
    },
    Pbkdf2Sha256 { iterations: u32 },
}

impl KdfParams {
    /// Select the parameters for the algorithm named in `config`.
    pub fn from_config(config: &VaultConfig) -> Self {
        match config.kdf {
            KdfAlgorithm::Scrypt => KdfParams::Scrypt {
                log_n: config.scrypt_log_n,
                r: config.scrypt_r,
                p: config.scrypt_p,
            },
            KdfAlgorithm::Argon2id => KdfParams::Argon2id {
                memory_cost: config.argon2_memory_cost,
                iterations: config.argon2_iterations,
                parallelism: config.argon2_parallelism,
            },
            KdfAlgorithm::Pbkdf2Sha256 => KdfParams::Pbkdf2Sha256 {
                iterations: config.pbkdf2_iterations,
            },
        }
    }

    pub fn algorithm(&self) -> KdfAlgorithm {
        match self {
            KdfParams::Scrypt { .. } => KdfAlgorithm::Scrypt,
            KdfParams::Argon2id { .. } => KdfAlgorithm::Argon2id,
            KdfParams::Pbkdf2Sha256 { .. } => KdfAlgorithm::Pbkdf2Sha256,
        }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::from_config(&VaultConfig::default())
    }
}

/// Derive the protection key from the operator secret and application salt.
///
/// Deterministic for a given `(secret, salt, params)`. Fails with
/// [`VaultError::Config`] when the secret is empty or the parameters are
/// rejected by the primitive.
pub fn derive_key(
    secret: &SecretString,
    salt: &str,
    params: &KdfParams,
) -> Result<ProtectionKey, VaultError> {
    let passphrase = secret.expose_secret().as_bytes();
    if passphrase.is_empty() {
        return Err(VaultError::Config(
            "operator secret must not be empty".to_string(),
        ));
    }
    if salt.is_empty() {
        return Err(VaultError::Config("KDF salt must not be empty".to_string()));
    }

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    match *params {
        KdfParams::Scrypt { log_n, r, p } => {
            let params = scrypt::Params::new(log_n, r, p, KEY_LEN)
                .map_err(|e| VaultError::Config(format!("invalid scrypt parameters: {e}")))?;
            scrypt::scrypt(passphrase, salt.as_bytes(), &params, output.as_mut())
                .map_err(|e| VaultError::Config(format!("scrypt key derivation failed: {e}")))?;
        }
        KdfParams::Argon2id {
            memory_cost,
            iterations,
            parallelism,
        } => {
            let params = argon2::Params::new(memory_cost, iterations, parallelism, Some(KEY_LEN))
                .map_err(|e| VaultError::Config(format!("invalid Argon2id parameters: {e}")))?;
            argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
                .hash_password_into(passphrase, salt.as_bytes(), output.as_mut())
                .map_err(|e| VaultError::Config(format!("Argon2id key derivation failed: {e}")))?;
        }
        KdfParams::Pbkdf2Sha256 { iterations } => {
            let iterations = NonZeroU32::new(iterations).ok_or_else(|| {
                VaultError::Config("PBKDF2 iteration count must be non-zero".to_string())
            })?;
            ring::pbkdf2::derive(
                ring::pbkdf2::PBKDF2_HMAC_SHA256,
                iterations,
                salt.as_bytes(),
                passphrase,
                output.as_mut(),
            );
        }
    }

    Ok(ProtectionKey(output))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cheap parameters; the production defaults are exercised by the
    // known-answer tests in tests/compat.rs.
    const FAST_SCRYPT: KdfParams = KdfParams::Scrypt {
        log_n: 10,
        r: 8,
        p: 1,
    };

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn derive_key_is_deterministic() {
        let key1 = derive_key(&secret("operator secret"), "razecrypt_salt", &FAST_SCRYPT).unwrap();
        let key2 = derive_key(&secret("operator secret"), "razecrypt_salt", &FAST_SCRYPT).unwrap();
        assert_eq!(key1, key2);
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn different_secret_produces_different_key() {
        let key1 = derive_key(&secret("secret one"), "razecrypt_salt", &FAST_SCRYPT).unwrap();
        let key2 = derive_key(&secret("secret two"), "razecrypt_salt", &FAST_SCRYPT).unwrap();
        assert_ne!(key1, key2);
    }

    #[test]
    fn different_salt_produces_different_key() {
        let key1 = derive_key(&secret("same"), "razecrypt_salt", &FAST_SCRYPT).unwrap();
        let key2 = derive_key(&secret("same"), "other_app_salt", &FAST_SCRYPT).unwrap();
        assert_ne!(key1, key2);
    }

    #[test]
    fn each_algorithm_yields_a_distinct_key() {
        let s = secret("operator secret");
        let scrypt = derive_key(&s, "razecrypt_salt", &FAST_SCRYPT).unwrap();
        let argon = derive_key(
            &s,
            "razecrypt_salt",
            &KdfParams::Argon2id {
                memory_cost: 32768,
                iterations: 2,
                parallelism: 1,
            },
        )
        .unwrap();
        let pbkdf2 = derive_key(
            &s,
            "razecrypt_salt",
            &KdfParams::Pbkdf2Sha256 { iterations: 1000 },
        )
        .unwrap();

        assert_ne!(scrypt, argon);
        assert_ne!(scrypt, pbkdf2);
        assert_ne!(argon, pbkdf2);
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        let result = derive_key(&secret(""), "razecrypt_salt", &FAST_SCRYPT);
        assert!(matches!(result, Err(VaultError::Config(_))));
    }

    #[test]
    fn empty_salt_is_a_configuration_error() {
        let result = derive_key(&secret("s"), "", &FAST_SCRYPT);
        assert!(matches!(result, Err(VaultError::Config(_))));
    }

    #[test]
    fn invalid_scrypt_params_are_rejected() {
        let params = KdfParams::Scrypt {
            log_n: 10,
            r: 0,
            p: 1,
        };
        let result = derive_key(&secret("s"), "razecrypt_salt", &params);
        assert!(matches!(result, Err(VaultError::Config(_))));
    }

    #[test]
    fn zero_pbkdf2_iterations_are_rejected() {
        let params = KdfParams::Pbkdf2Sha256 { iterations: 0 };
        let result = derive_key(&secret("s"), "razecrypt_salt", &params);
        assert!(matches!(result, Err(VaultError::Config(_))));
    }

    #[test]
    fn params_follow_selected_algorithm() {
        let mut config = VaultConfig::default();
        assert_eq!(
            KdfParams::from_config(&config),
            KdfParams::Scrypt {
                log_n: 14,
                r: 8,
                p: 1
            }
        );

        config.kdf = KdfAlgorithm::Pbkdf2Sha256;
        assert_eq!(
            KdfParams::from_config(&config),
            KdfParams::Pbkdf2Sha256 {
                iterations: 100_000
            }
        );
        assert_eq!(
            KdfParams::from_config(&config).algorithm(),
            KdfAlgorithm::Pbkdf2Sha256
        );
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = ProtectionKey::from_bytes([7u8; KEY_LEN]);
        let rendered = format!("{key:?}");
        assert_eq!(rendered, "ProtectionKey([REDACTED])");
        assert!(!rendered.contains('7'));
    }
}
