// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encryption at rest for the Razecrypt vault.
//!
//! One operator secret and a fixed application salt yield a single 256-bit
//! protection key. Every secret field is sealed with AES-256-GCM under that
//! key into a self-describing `<nonce>:<tag>:<ciphertext>` hex envelope.

pub mod codec;
pub mod envelope;
pub mod kdf;
pub mod secret;

pub use codec::EnvelopeCodec;
pub use envelope::{Envelope, NONCE_LEN, TAG_LEN};
pub use kdf::{KdfParams, ProtectionKey, derive_key};
pub use secret::{get_operator_secret, secret_from_env};
