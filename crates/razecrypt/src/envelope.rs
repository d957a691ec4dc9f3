// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `razecrypt envelope` command implementation.
//!
//! Seals or opens one value read from stdin with the operator's key, for
//! diagnosing stored data without going through a record.

use std::io::BufRead;

use clap::Subcommand;
use razecrypt_config::model::RazecryptConfig;
use razecrypt_core::VaultError;
use secrecy::ExposeSecret;
use tracing::warn;

use crate::commands::open_codec;

#[derive(Subcommand, Debug)]
pub enum EnvelopeCommand {
    /// Encrypt one line from stdin and print its envelope.
    Seal,
    /// Decrypt one envelope line from stdin and print the plaintext.
    Open,
}

pub async fn run_envelope(
    config: &RazecryptConfig,
    action: EnvelopeCommand,
) -> Result<(), VaultError> {
    let input = read_line(std::io::stdin().lock())?;
    let codec = open_codec(&config.vault).await?;

    match action {
        EnvelopeCommand::Seal => println!("{}", codec.encrypt(&input)?),
        EnvelopeCommand::Open => {
            let plaintext = codec.decrypt(input.trim()).inspect_err(|e| {
                warn!(error = %e, "envelope could not be opened");
            })?;
            println!("{}", plaintext.expose_secret());
        }
    }
    Ok(())
}

/// One line without its terminator.
fn read_line(mut reader: impl BufRead) -> Result<String, VaultError> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| VaultError::Validation(format!("failed to read stdin: {e}")))?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}
