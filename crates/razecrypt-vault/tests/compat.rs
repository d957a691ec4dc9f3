// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Known-answer vectors for envelopes written by earlier deployments, plus
//! property checks over arbitrary plaintexts.

use proptest::prelude::*;
use razecrypt_config::model::{DEFAULT_SALT, VaultConfig};
use razecrypt_core::VaultError;
use razecrypt_vault::envelope::{self, Envelope};
use razecrypt_vault::{EnvelopeCodec, KdfParams, ProtectionKey, derive_key};
use secrecy::{ExposeSecret, SecretString};

const SECRET: &str = "correct horse battery staple";
const SCRYPT_KEY_HEX: &str = "12034f570695bc8299ddf1a724eb9e360c3ce84184a2ff0093f1c5ebe71d5a50";
const PBKDF2_KEY_HEX: &str = "c156a2aa65ca35f6e4688e655cd5496271612b48f6e4e387a81bf88300e20a7a";
const FIXED_NONCE: [u8; 16] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
];

const VECTORS: &[(&str, &str)] = &[
    (
        "4111111111111111",
        "000102030405060708090a0b0c0d0e0f:fa7348177feb827ef3a1eb3e56cce917:360986332178be2cb7b1f4ffac5f285a",
    ),
    (
        "",
        "000102030405060708090a0b0c0d0e0f:5c62c77e4f8e21e1c563adba2289441f:",
    ),
    (
        "pässwörd ✓",
        "000102030405060708090a0b0c0d0e0f:b28dc0bffd38adb5a9e815a55020747e:72fb1371633e4cabf4e4e52c01fd",
    ),
];

fn key_from_hex(hex_key: &str) -> ProtectionKey {
    let bytes: [u8; 32] = hex::decode(hex_key).unwrap().try_into().unwrap();
    ProtectionKey::from_bytes(bytes)
}

fn secret() -> SecretString {
    SecretString::from(SECRET.to_string())
}

#[test]
fn default_scrypt_derivation_matches_existing_deployments() {
    let key = derive_key(&secret(), DEFAULT_SALT, &KdfParams::default()).unwrap();
    assert_eq!(key, key_from_hex(SCRYPT_KEY_HEX));
}

#[test]
fn pbkdf2_derivation_matches_reference_key() {
    let params = KdfParams::Pbkdf2Sha256 {
        iterations: 100_000,
    };
    let key = derive_key(&secret(), DEFAULT_SALT, &params).unwrap();
    assert_eq!(key, key_from_hex(PBKDF2_KEY_HEX));
}

#[test]
fn existing_envelopes_decrypt() {
    let key = key_from_hex(SCRYPT_KEY_HEX);
    for (plaintext, sealed) in VECTORS {
        let opened = envelope::decrypt(sealed, &key).unwrap();
        assert_eq!(opened.expose_secret(), *plaintext);
    }
}

#[test]
fn fixed_nonce_encryption_reproduces_existing_envelopes() {
    let key = key_from_hex(SCRYPT_KEY_HEX);
    for (plaintext, sealed) in VECTORS {
        let produced = envelope::encrypt_with_nonce(plaintext, &key, FIXED_NONCE).unwrap();
        assert_eq!(&produced, sealed);
    }
}

#[test]
fn codec_from_default_config_reads_existing_envelopes() {
    let codec = EnvelopeCodec::from_config(&secret(), &VaultConfig::default()).unwrap();
    let opened = codec.decrypt(VECTORS[0].1).unwrap();
    assert_eq!(opened.expose_secret(), VECTORS[0].0);
}

#[test]
fn existing_envelope_with_other_key_fails_authentication() {
    let key = ProtectionKey::from_bytes([0u8; 32]);
    let result = envelope::decrypt(VECTORS[0].1, &key);
    assert!(matches!(result, Err(VaultError::Authentication)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_plaintext_roundtrips(plaintext in ".*") {
        let key = key_from_hex(SCRYPT_KEY_HEX);
        let sealed = envelope::encrypt(&plaintext, &key).unwrap();
        let opened = envelope::decrypt(&sealed, &key).unwrap();
        prop_assert_eq!(opened.expose_secret(), plaintext.as_str());
    }

    #[test]
    fn any_single_bit_flip_is_rejected(
        plaintext in ".{1,64}",
        byte_index in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let key = key_from_hex(SCRYPT_KEY_HEX);
        let sealed: Envelope = envelope::encrypt(&plaintext, &key).unwrap().parse().unwrap();

        let mut bytes: Vec<u8> = sealed
            .nonce
            .iter()
            .chain(sealed.tag.iter())
            .chain(sealed.ciphertext.iter())
            .copied()
            .collect();
        let i = byte_index.index(bytes.len());
        bytes[i] ^= 1 << bit;

        let tampered = Envelope {
            nonce: bytes[..16].try_into().unwrap(),
            tag: bytes[16..32].try_into().unwrap(),
            ciphertext: bytes[32..].to_vec(),
        };
        let result = envelope::decrypt(&tampered.to_string(), &key);
        prop_assert!(matches!(result, Err(VaultError::Authentication)));
    }
}
