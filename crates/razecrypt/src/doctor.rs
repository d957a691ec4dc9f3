// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `razecrypt doctor` command implementation.
//!
//! Runs diagnostic checks against the Razecrypt environment to identify
//! configuration issues, a missing operator secret, and storage problems.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use razecrypt_config::model::{RazecryptConfig, StorageConfig, VaultConfig};
use razecrypt_core::{DocumentStore, HealthStatus, PluginAdapter, VaultError};
use razecrypt_storage::SqliteStore;
use razecrypt_vault::EnvelopeCodec;
use secrecy::SecretString;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `razecrypt doctor` command.
///
/// With `--plain`, disables colored output. Returns an error when any check
/// fails so the process exits non-zero.
pub async fn run_doctor(config: &RazecryptConfig, plain: bool) -> Result<(), VaultError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let secret = razecrypt_vault::secret_from_env();
    let results = vec![
        check_config().await,
        check_operator_secret(secret.is_some()).await,
        check_key_derivation(secret, &config.vault).await,
        check_database(&config.storage).await,
    ];

    println!();
    println!("  razecrypt doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;

    for result in &results {
        match result.status {
            CheckStatus::Fail => fail_count += 1,
            CheckStatus::Warn => warn_count += 1,
            CheckStatus::Pass => {}
        }
        println!("{}", format_line(result, use_color));
    }

    println!();

    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }

    println!();

    if fail_count > 0 {
        return Err(VaultError::Config(format!(
            "{fail_count} doctor check(s) failed"
        )));
    }
    Ok(())
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!(
            "    {symbol} {:<20} {message} ({duration_ms}ms)",
            result.name
        )
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// Check configuration loads without errors.
async fn check_config() -> CheckResult {
    let start = Instant::now();
    match razecrypt_config::load_and_validate() {
        Ok(_) => CheckResult::new("Configuration", CheckStatus::Pass, "valid", start),
        Err(errors) => CheckResult::new(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

/// Check the operator secret is available without prompting.
async fn check_operator_secret(in_env: bool) -> CheckResult {
    let start = Instant::now();
    if in_env {
        return CheckResult::new("Operator secret", CheckStatus::Pass, "set", start);
    }
    if std::io::stdin().is_terminal() {
        return CheckResult::new(
            "Operator secret",
            CheckStatus::Warn,
            format!(
                "not in environment; will prompt (set {})",
                razecrypt_vault::secret::SECRET_ENV_VAR
            ),
            start,
        );
    }
    CheckResult::new(
        "Operator secret",
        CheckStatus::Fail,
        format!("{} is not set", razecrypt_vault::secret::SECRET_ENV_VAR),
        start,
    )
}

/// Derive the key and round-trip a probe envelope.
async fn check_key_derivation(secret: Option<SecretString>, config: &VaultConfig) -> CheckResult {
    let start = Instant::now();
    let Some(secret) = secret else {
        return CheckResult::new(
            "Key derivation",
            CheckStatus::Warn,
            "skipped (no operator secret)",
            start,
        );
    };

    let config = config.clone();
    let kdf = config.kdf;
    let outcome = tokio::task::spawn_blocking(move || {
        EnvelopeCodec::from_config(&secret, &config)?.self_test()
    })
    .await;

    match outcome {
        Ok(Ok(())) => CheckResult::new(
            "Key derivation",
            CheckStatus::Pass,
            format!("{kdf}, self-test ok"),
            start,
        ),
        Ok(Err(e)) => CheckResult::new("Key derivation", CheckStatus::Fail, e.to_string(), start),
        Err(e) => CheckResult::new(
            "Key derivation",
            CheckStatus::Fail,
            format!("task failed: {e}"),
            start,
        ),
    }
}

/// Check the database opens, migrates, and answers queries.
async fn check_database(config: &StorageConfig) -> CheckResult {
    let start = Instant::now();
    if !std::path::Path::new(&config.database_path).exists() {
        return CheckResult::new(
            "Database",
            CheckStatus::Warn,
            format!(
                "not found: {} (will be created on first use)",
                config.database_path
            ),
            start,
        );
    }

    let store = SqliteStore::new(config.clone());
    if let Err(e) = store.initialize().await {
        return CheckResult::new("Database", CheckStatus::Fail, format!("open failed: {e}"), start);
    }
    let result = match store.health_check().await {
        Ok(HealthStatus::Healthy) => {
            CheckResult::new("Database", CheckStatus::Pass, "connected", start)
        }
        Ok(HealthStatus::Degraded(msg)) => {
            CheckResult::new("Database", CheckStatus::Warn, msg, start)
        }
        Ok(HealthStatus::Unhealthy(msg)) => {
            CheckResult::new("Database", CheckStatus::Fail, msg, start)
        }
        Err(e) => CheckResult::new("Database", CheckStatus::Fail, format!("query failed: {e}"), start),
    };
    let _ = store.shutdown().await;
    result
}
