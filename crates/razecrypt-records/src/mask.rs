// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read modes and the redacted forms of secret fields.

use serde::{Deserialize, Serialize};

/// Placeholder glyph for hidden characters.
pub const MASK_CHAR: char = '•';

/// How secret fields are returned on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealMode {
    /// Decrypted plaintext.
    #[default]
    Full,
    /// Every envelope is still authenticated, but only a redacted form is
    /// returned.
    Masked,
}

fn dots(n: usize) -> String {
    std::iter::repeat_n(MASK_CHAR, n).collect()
}

/// `•••• 1111`: the last four characters of the number, whitespace ignored.
pub fn mask_card_number(number: &str) -> String {
    let compact: Vec<char> = number.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() <= 4 {
        return dots(4);
    }
    let last4: String = compact[compact.len() - 4..].iter().collect();
    format!("{} {last4}", dots(4))
}

/// Always three dots, independent of the CVV length.
pub fn mask_cvv(_cvv: &str) -> String {
    dots(3)
}

/// Always eight dots, independent of the password length.
pub fn mask_password(_password: &str) -> String {
    dots(8)
}
