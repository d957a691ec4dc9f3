// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment card records.

use razecrypt_core::{RecordId, RecordKind, VaultError};
use secrecy::{ExposeSecret, SecretString};

use crate::mask::{RevealMode, mask_card_number, mask_cvv};
use crate::record::{NewRecord, Record, RecordPatch, VaultRecord};
use crate::schema::{FieldSet, FieldSpec, Schema};

pub const CARD_NAME: &str = "card_name";
pub const EXPIRY_MONTH: &str = "expiry_month";
pub const EXPIRY_YEAR: &str = "expiry_year";
pub const CARD_NUMBER: &str = "card_number";
pub const CVV: &str = "cvv";

pub static CARD_SCHEMA: Schema = Schema {
    kind: RecordKind::Card,
    fields: &[
        FieldSpec::metadata(CARD_NAME),
        FieldSpec::metadata(EXPIRY_MONTH),
        FieldSpec::metadata(EXPIRY_YEAR),
        FieldSpec::secret(CARD_NUMBER, mask_card_number),
        FieldSpec::secret(CVV, mask_cvv),
    ],
};

/// Group digits in fours for display: `"4111111111111111"` becomes
/// `"4111 1111 1111 1111"`. Existing whitespace is discarded first.
pub fn format_card_number(value: &str) -> String {
    let compact: Vec<char> = value.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A stored card with its secrets opened.
#[derive(Debug)]
pub struct Card {
    pub id: RecordId,
    pub card_name: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub card_number: SecretString,
    pub cvv: SecretString,
    pub reveal: RevealMode,
    pub created_at: String,
    pub updated_at: String,
}

impl Card {
    /// The card number grouped for display. Masked values pass through.
    pub fn display_number(&self) -> String {
        match self.reveal {
            RevealMode::Full => format_card_number(self.card_number.expose_secret()),
            RevealMode::Masked => self.card_number.expose_secret().to_string(),
        }
    }
}

impl TryFrom<VaultRecord> for Card {
    type Error = VaultError;

    fn try_from(mut record: VaultRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            card_name: record.take_metadata(CARD_NAME)?,
            expiry_month: record.take_metadata(EXPIRY_MONTH)?,
            expiry_year: record.take_metadata(EXPIRY_YEAR)?,
            card_number: record.take_secret(CARD_NUMBER)?,
            cvv: record.take_secret(CVV)?,
            reveal: record.reveal,
            id: record.id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl Record for Card {
    const SCHEMA: &'static Schema = &CARD_SCHEMA;
}

/// Input for creating a card.
#[derive(Debug, Clone, Default)]
pub struct NewCard {
    pub card_name: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub card_number: String,
    pub cvv: String,
}

impl From<NewCard> for FieldSet {
    fn from(card: NewCard) -> Self {
        FieldSet::new()
            .with(CARD_NAME, card.card_name)
            .with(EXPIRY_MONTH, card.expiry_month)
            .with(EXPIRY_YEAR, card.expiry_year)
            .with(CARD_NUMBER, card.card_number)
            .with(CVV, card.cvv)
    }
}

impl NewRecord for NewCard {
    type Record = Card;
}

/// Fields to change on an existing card.
#[derive(Debug, Clone, Default)]
pub struct CardPatch {
    pub card_name: Option<String>,
    pub expiry_month: Option<String>,
    pub expiry_year: Option<String>,
    pub card_number: Option<String>,
    pub cvv: Option<String>,
}

impl From<CardPatch> for FieldSet {
    fn from(patch: CardPatch) -> Self {
        FieldSet::new()
            .with_opt(CARD_NAME, patch.card_name)
            .with_opt(EXPIRY_MONTH, patch.expiry_month)
            .with_opt(EXPIRY_YEAR, patch.expiry_year)
            .with_opt(CARD_NUMBER, patch.card_number)
            .with_opt(CVV, patch.cvv)
    }
}

impl RecordPatch for CardPatch {
    type Record = Card;
}
