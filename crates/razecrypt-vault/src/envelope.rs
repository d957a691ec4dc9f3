// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM envelopes in the `<nonce>:<tag>:<ciphertext>` text form.
//!
//! Each of the three fields is lowercase hex. The nonce is 16 bytes, drawn
//! fresh from the system CSPRNG for every [`encrypt`] call; the tag is the
//! full 16-byte GCM tag. No associated data is bound.
//!
//! Decryption never hands back partial plaintext: the tag is verified before
//! any byte leaves this module.

use std::fmt;
use std::str::FromStr;

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use razecrypt_core::VaultError;
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::SecretString;
use zeroize::Zeroize;

use crate::kdf::ProtectionKey;

/// Nonce length in bytes.
pub const NONCE_LEN: usize = 16;

/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Field separator of the text form.
pub const SEPARATOR: char = ':';

/// AES-256-GCM with a 128-bit nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// A parsed envelope.
///
/// Only structure is checked on parse; authenticity is established by
/// [`decrypt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
    pub ciphertext: Vec<u8>,
}

impl FromStr for Envelope {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        let [nonce_hex, tag_hex, ct_hex] = parts.as_slice() else {
            return Err(VaultError::Format(format!(
                "expected 3 fields, found {}",
                parts.len()
            )));
        };

        let nonce = decode_fixed::<NONCE_LEN>("nonce", nonce_hex)?;
        let tag = decode_fixed::<TAG_LEN>("tag", tag_hex)?;
        let ciphertext = hex::decode(ct_hex)
            .map_err(|e| VaultError::Format(format!("ciphertext is not valid hex: {e}")))?;

        Ok(Self {
            nonce,
            tag,
            ciphertext,
        })
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            hex::encode(self.nonce),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext)
        )
    }
}

fn decode_fixed<const N: usize>(field: &str, input: &str) -> Result<[u8; N], VaultError> {
    let bytes = hex::decode(input)
        .map_err(|e| VaultError::Format(format!("{field} is not valid hex: {e}")))?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        VaultError::Format(format!(
            "{field} must be {N} bytes, found {}",
            bytes.len()
        ))
    })
}

fn tag_bytes(tag: &[u8]) -> [u8; TAG_LEN] {
    let mut out = [0u8; TAG_LEN];
    out.copy_from_slice(tag);
    out
}

fn cipher(key: &ProtectionKey) -> Result<Aes256Gcm16, VaultError> {
    Aes256Gcm16::new_from_slice(key.as_bytes())
        .map_err(|_| VaultError::Internal("failed to create AES-256-GCM key".to_string()))
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
///
/// Two calls with the same input produce different envelopes.
pub fn encrypt(plaintext: &str, key: &ProtectionKey) -> Result<String, VaultError> {
    let rng = SystemRandom::new();
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill(&mut nonce)
        .map_err(|_| VaultError::Internal("failed to generate random nonce".to_string()))?;

    encrypt_with_nonce(plaintext, key, nonce)
}

/// Encrypt with a caller-chosen nonce.
///
/// Reusing a nonce under the same key breaks GCM confidentiality and
/// authenticity. Production paths go through [`encrypt`]; this exists for
/// known-answer checks.
pub fn encrypt_with_nonce(
    plaintext: &str,
    key: &ProtectionKey,
    nonce: [u8; NONCE_LEN],
) -> Result<String, VaultError> {
    let mut buffer = plaintext.as_bytes().to_vec();
    let tag = cipher(key)?
        .encrypt_in_place_detached(GenericArray::from_slice(&nonce), b"", &mut buffer)
        .map_err(|_| VaultError::Internal("AES-256-GCM encryption failed".to_string()))?;

    let envelope = Envelope {
        nonce,
        tag: tag_bytes(&tag),
        ciphertext: buffer,
    };
    Ok(envelope.to_string())
}

/// Parse, authenticate, and decrypt an envelope string.
///
/// Structural problems are [`VaultError::Format`]; a tag mismatch (wrong key,
/// any altered byte) is [`VaultError::Authentication`].
pub fn decrypt(envelope: &str, key: &ProtectionKey) -> Result<SecretString, VaultError> {
    let envelope: Envelope = envelope.parse()?;
    open(envelope, key)
}

/// Authenticate and decrypt an already-parsed envelope.
pub fn open(envelope: Envelope, key: &ProtectionKey) -> Result<SecretString, VaultError> {
    let Envelope {
        nonce,
        tag,
        ciphertext: mut buffer,
    } = envelope;

    if cipher(key)?
        .decrypt_in_place_detached(
            GenericArray::from_slice(&nonce),
            b"",
            &mut buffer,
            GenericArray::from_slice(&tag),
        )
        .is_err()
    {
        buffer.zeroize();
        return Err(VaultError::Authentication);
    }

    match String::from_utf8(buffer) {
        Ok(plaintext) => Ok(SecretString::from(plaintext)),
        Err(e) => {
            e.into_bytes().zeroize();
            Err(VaultError::Format(
                "decrypted payload is not valid UTF-8".to_string(),
            ))
        }
    }
}
