// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `razecrypt card` and `razecrypt password` command implementations.

use std::sync::Arc;

use clap::Subcommand;
use razecrypt_config::model::{RazecryptConfig, VaultConfig};
use razecrypt_core::{
    DocumentStore, IdentityResolver, OwnerId, PluginAdapter, RecordId, StaticIdentity, VaultError,
};
use razecrypt_records::{
    Card, CardPatch, NewCard, NewPassword, PasswordEntry, PasswordPatch, RevealMode, VaultRecords,
};
use razecrypt_storage::SqliteStore;
use razecrypt_vault::EnvelopeCodec;
use secrecy::ExposeSecret;
use tracing::debug;

use crate::OwnerArgs;

#[derive(Subcommand, Debug)]
pub enum CardCommand {
    /// Store a new card. Number and CVV are prompted for when omitted.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        expiry_month: String,
        #[arg(long)]
        expiry_year: String,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        cvv: Option<String>,
    },
    /// List cards, newest first.
    List {
        /// Show only masked card numbers and CVVs.
        #[arg(long)]
        masked: bool,
    },
    /// Change fields of an existing card.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        expiry_month: Option<String>,
        #[arg(long)]
        expiry_year: Option<String>,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        cvv: Option<String>,
    },
    /// Permanently delete a card.
    Rm { id: String },
}

#[derive(Subcommand, Debug)]
pub enum PasswordCommand {
    /// Store a new login. The password is prompted for when omitted.
    Add {
        #[arg(long)]
        website: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// List logins, newest first.
    List {
        /// Show masked passwords only.
        #[arg(long)]
        masked: bool,
    },
    /// Change fields of an existing login.
    Update {
        id: String,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Permanently delete a login.
    Rm { id: String },
}

/// Derive the protection key off the async runtime.
pub async fn open_codec(config: &VaultConfig) -> Result<Arc<EnvelopeCodec>, VaultError> {
    let secret = razecrypt_vault::get_operator_secret()?;
    let config = config.clone();
    let codec = tokio::task::spawn_blocking(move || EnvelopeCodec::from_config(&secret, &config))
        .await
        .map_err(|e| VaultError::Internal(format!("key derivation task failed: {e}")))??;
    Ok(Arc::new(codec))
}

/// Resolve the caller, derive the key, and open the store.
async fn open_vault(
    config: &RazecryptConfig,
    owner: &OwnerArgs,
) -> Result<(OwnerId, VaultRecords<SqliteStore>), VaultError> {
    let identity = match &owner.owner {
        Some(owner) => StaticIdentity::new(owner.clone()),
        None => StaticIdentity::anonymous(),
    };
    // Fail on a missing identity before paying for key derivation.
    let owner = identity.resolve().await?;

    let codec = open_codec(&config.vault).await?;
    let store = Arc::new(SqliteStore::new(config.storage.clone()));
    store.initialize().await?;
    debug!(owner = %owner, "vault opened");

    Ok((owner, VaultRecords::new(store, codec)))
}

fn reveal_mode(masked: bool) -> RevealMode {
    if masked {
        RevealMode::Masked
    } else {
        RevealMode::Full
    }
}

/// Use the flag value or prompt for it without echo.
fn secret_or_prompt(value: Option<String>, prompt: &str) -> Result<String, VaultError> {
    match value {
        Some(value) => Ok(value),
        None => rpassword::prompt_password(prompt)
            .map_err(|e| VaultError::Validation(format!("failed to read {prompt}: {e}"))),
    }
}

pub async fn run_card(
    config: &RazecryptConfig,
    owner: &OwnerArgs,
    action: CardCommand,
) -> Result<(), VaultError> {
    let (owner, vault) = open_vault(config, owner).await?;
    let result = card_action(&vault, &owner, action).await;
    vault_shutdown(&vault).await;
    result
}

async fn card_action(
    vault: &VaultRecords<SqliteStore>,
    owner: &OwnerId,
    action: CardCommand,
) -> Result<(), VaultError> {
    match action {
        CardCommand::Add {
            name,
            expiry_month,
            expiry_year,
            number,
            cvv,
        } => {
            let input = NewCard {
                card_name: name,
                expiry_month,
                expiry_year,
                card_number: secret_or_prompt(number, "Card number: ")?,
                cvv: secret_or_prompt(cvv, "CVV: ")?,
            };
            let id = vault.create(owner, input).await?;
            println!("{id}");
        }
        CardCommand::List { masked } => {
            let cards: Vec<Card> = vault.list(owner, reveal_mode(masked)).await?;
            for card in &cards {
                println!("{}", card_line(card));
            }
        }
        CardCommand::Update {
            id,
            name,
            expiry_month,
            expiry_year,
            number,
            cvv,
        } => {
            let patch = CardPatch {
                card_name: name,
                expiry_month,
                expiry_year,
                card_number: number,
                cvv,
            };
            vault.update(owner, &RecordId(id), patch).await?;
        }
        CardCommand::Rm { id } => {
            vault.delete::<Card>(owner, &RecordId(id)).await?;
        }
    }
    Ok(())
}

pub async fn run_password(
    config: &RazecryptConfig,
    owner: &OwnerArgs,
    action: PasswordCommand,
) -> Result<(), VaultError> {
    let (owner, vault) = open_vault(config, owner).await?;
    let result = password_action(&vault, &owner, action).await;
    vault_shutdown(&vault).await;
    result
}

async fn password_action(
    vault: &VaultRecords<SqliteStore>,
    owner: &OwnerId,
    action: PasswordCommand,
) -> Result<(), VaultError> {
    match action {
        PasswordCommand::Add {
            website,
            username,
            password,
        } => {
            let input = NewPassword {
                website,
                username,
                password: secret_or_prompt(password, "Password: ")?,
            };
            let id = vault.create(owner, input).await?;
            println!("{id}");
        }
        PasswordCommand::List { masked } => {
            let entries: Vec<PasswordEntry> = vault.list(owner, reveal_mode(masked)).await?;
            for entry in &entries {
                println!("{}", password_line(entry));
            }
        }
        PasswordCommand::Update {
            id,
            website,
            username,
            password,
        } => {
            let patch = PasswordPatch {
                website,
                username,
                password,
            };
            vault.update(owner, &RecordId(id), patch).await?;
        }
        PasswordCommand::Rm { id } => {
            vault.delete::<PasswordEntry>(owner, &RecordId(id)).await?;
        }
    }
    Ok(())
}

async fn vault_shutdown(vault: &VaultRecords<SqliteStore>) {
    if let Err(e) = vault.store().shutdown().await {
        debug!(error = %e, "store shutdown failed");
    }
}

fn card_line(card: &Card) -> String {
    format!(
        "{}  {}  {}/{}  {}  cvv {}",
        card.id,
        card.card_name,
        card.expiry_month,
        card.expiry_year,
        card.display_number(),
        card.cvv.expose_secret()
    )
}

fn password_line(entry: &PasswordEntry) -> String {
    format!(
        "{}  {}  {}  {}",
        entry.id,
        entry.website,
        entry.username,
        entry.password.expose_secret()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn masked_card() -> Card {
        Card {
            id: RecordId::from("c1"),
            card_name: "Visa".into(),
            expiry_month: "12".into(),
            expiry_year: "2030".into(),
            card_number: SecretString::from("•••• 1111".to_string()),
            cvv: SecretString::from("•••".to_string()),
            reveal: RevealMode::Masked,
            created_at: "2026-01-01T00:00:00.000Z".into(),
            updated_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    #[test]
    fn card_line_uses_display_number() {
        assert_eq!(card_line(&masked_card()), "c1  Visa  12/2030  •••• 1111  cvv •••");

        let full = Card {
            card_number: SecretString::from("4111111111111111".to_string()),
            cvv: SecretString::from("123".to_string()),
            reveal: RevealMode::Full,
            ..masked_card()
        };
        assert_eq!(
            card_line(&full),
            "c1  Visa  12/2030  4111 1111 1111 1111  cvv 123"
        );
    }

    #[test]
    fn password_line_lists_fields_in_order() {
        let entry = PasswordEntry {
            id: RecordId::from("p1"),
            website: "example.com".into(),
            username: "alice".into(),
            password: SecretString::from("••••••••".to_string()),
            reveal: RevealMode::Masked,
            created_at: "2026-01-01T00:00:00.000Z".into(),
            updated_at: "2026-01-01T00:00:00.000Z".into(),
        };
        assert_eq!(password_line(&entry), "p1  example.com  alice  ••••••••");
    }

    #[test]
    fn flag_value_skips_prompt() {
        assert_eq!(
            secret_or_prompt(Some("4111".into()), "Card number: ").unwrap(),
            "4111"
        );
    }

    #[test]
    fn reveal_mode_follows_flag() {
        assert_eq!(reveal_mode(true), RevealMode::Masked);
        assert_eq!(reveal_mode(false), RevealMode::Full);
    }

    #[tokio::test]
    async fn missing_owner_fails_before_key_derivation() {
        let config = RazecryptConfig::default();
        let result = open_vault(&config, &OwnerArgs { owner: None }).await;
        assert!(matches!(result, Err(VaultError::Unauthenticated)));
    }
}
