// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Razecrypt - an encrypted personal vault for cards and logins.
//!
//! This is the binary entry point for the Razecrypt operator CLI.

mod commands;
mod doctor;
mod envelope;

use clap::{Args, Parser, Subcommand};
use razecrypt_core::VaultError;
use tracing::error;

/// Razecrypt - an encrypted personal vault for cards and logins.
#[derive(Parser, Debug)]
#[command(name = "razecrypt", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Identity of the vault owner the command acts for.
#[derive(Args, Debug, Clone)]
pub struct OwnerArgs {
    /// Owner identity; every record operation is scoped to it.
    #[arg(long, env = "RAZECRYPT_OWNER")]
    pub owner: Option<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run diagnostic checks against the local environment.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Manage stored payment cards.
    Card {
        #[command(flatten)]
        owner: OwnerArgs,
        #[command(subcommand)]
        action: commands::CardCommand,
    },
    /// Manage stored website logins.
    Password {
        #[command(flatten)]
        owner: OwnerArgs,
        #[command(subcommand)]
        action: commands::PasswordCommand,
    },
    /// Seal or open a single envelope read from stdin.
    Envelope {
        #[command(subcommand)]
        action: envelope::EnvelopeCommand,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match razecrypt_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            razecrypt_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    let result = match cli.command {
        Commands::Doctor { plain } => doctor::run_doctor(&config, plain).await,
        Commands::Card { owner, action } => commands::run_card(&config, &owner, action).await,
        Commands::Password { owner, action } => {
            commands::run_password(&config, &owner, action).await
        }
        Commands::Envelope { action } => envelope::run_envelope(&config, action).await,
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        eprintln!("error: {}", user_message(&e));
        std::process::exit(1);
    }
}

/// The message shown on stderr for a failed command.
///
/// Decryption and lookup failures only reveal their caller-visible kind;
/// configuration and input problems keep their detail so the operator can
/// fix them.
fn user_message(err: &VaultError) -> String {
    match err {
        VaultError::Config(_) | VaultError::Validation(_) => err.to_string(),
        _ => err.caller_kind().to_string(),
    }
}

/// Initialize the tracing subscriber with an EnvFilter.
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("razecrypt={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
