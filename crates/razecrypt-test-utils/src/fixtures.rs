// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures: fast key derivation and owner identities.

use std::sync::Arc;

use razecrypt_core::OwnerId;
use razecrypt_vault::{EnvelopeCodec, KdfParams};
use secrecy::SecretString;

/// Operator secret used by test codecs.
pub const TEST_SECRET: &str = "test-operator-secret";

/// Cheap scrypt parameters; production defaults cost ~16 MiB per derivation.
pub const FAST_KDF: KdfParams = KdfParams::Scrypt {
    log_n: 10,
    r: 8,
    p: 1,
};

/// A codec derived from `secret` with [`FAST_KDF`] and the default salt.
pub fn codec_for(secret: &str) -> Arc<EnvelopeCodec> {
    let secret = SecretString::from(secret.to_string());
    match EnvelopeCodec::derive(&secret, razecrypt_config::model::DEFAULT_SALT, FAST_KDF) {
        Ok(codec) => Arc::new(codec),
        Err(e) => panic!("test codec derivation failed: {e}"),
    }
}

/// A codec derived from [`TEST_SECRET`].
pub fn test_codec() -> Arc<EnvelopeCodec> {
    codec_for(TEST_SECRET)
}

/// An owner identity; panics on blank input.
pub fn owner(id: &str) -> OwnerId {
    match OwnerId::new(id) {
        Ok(owner) => owner,
        Err(e) => panic!("invalid test owner {id:?}: {e}"),
    }
}
