// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the semantic constraints serde cannot express: non-empty paths,
//! a usable salt, and KDF parameters inside the ranges each primitive accepts.

use crate::diagnostic::ConfigError;
use crate::model::{KdfAlgorithm, RazecryptConfig};

/// Minimum salt length in bytes (Argon2 rejects anything shorter).
pub const MIN_SALT_LEN: usize = 8;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RazecryptConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        invalid(format!(
            "logging.level `{}` must be one of: {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".to_string());
    }

    let vault = &config.vault;
    if vault.salt.len() < MIN_SALT_LEN {
        invalid(format!(
            "vault.salt must be at least {MIN_SALT_LEN} bytes, got {}",
            vault.salt.len()
        ));
    }

    // Only the selected algorithm's parameters are checked; the others are inert.
    match vault.kdf {
        KdfAlgorithm::Scrypt => {
            if !(10..=20).contains(&vault.scrypt_log_n) {
                invalid(format!(
                    "vault.scrypt_log_n must be between 10 and 20, got {}",
                    vault.scrypt_log_n
                ));
            }
            if vault.scrypt_r == 0 {
                invalid("vault.scrypt_r must be at least 1".to_string());
            }
            if vault.scrypt_p == 0 {
                invalid("vault.scrypt_p must be at least 1".to_string());
            }
        }
        KdfAlgorithm::Argon2id => {
            if vault.argon2_memory_cost < 32768 {
                invalid(format!(
                    "vault.argon2_memory_cost must be at least 32768 (32 MiB), got {}",
                    vault.argon2_memory_cost
                ));
            }
            if vault.argon2_iterations < 2 {
                invalid(format!(
                    "vault.argon2_iterations must be at least 2, got {}",
                    vault.argon2_iterations
                ));
            }
            if vault.argon2_parallelism < 1 {
                invalid(format!(
                    "vault.argon2_parallelism must be at least 1, got {}",
                    vault.argon2_parallelism
                ));
            }
        }
        KdfAlgorithm::Pbkdf2Sha256 => {
            if vault.pbkdf2_iterations < 100_000 {
                invalid(format!(
                    "vault.pbkdf2_iterations must be at least 100000, got {}",
                    vault.pbkdf2_iterations
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = RazecryptConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = RazecryptConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }

    #[test]
    fn short_salt_fails_validation() {
        let mut config = RazecryptConfig::default();
        config.vault.salt = "salt".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "vault.salt"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = RazecryptConfig::default();
        config.logging.level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "logging.level"));
    }

    #[test]
    fn scrypt_cost_out_of_range_fails_validation() {
        let mut config = RazecryptConfig::default();
        config.vault.scrypt_log_n = 4;
        config.vault.scrypt_p = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_error(&errors, "scrypt_log_n"));
        assert!(has_error(&errors, "scrypt_p"));
    }

    #[test]
    fn argon2_params_checked_only_when_selected() {
        let mut config = RazecryptConfig::default();
        config.vault.argon2_memory_cost = 1024;
        assert!(validate_config(&config).is_ok());

        config.vault.kdf = KdfAlgorithm::Argon2id;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "argon2_memory_cost"));
    }

    #[test]
    fn weak_pbkdf2_iterations_fail_validation() {
        let mut config = RazecryptConfig::default();
        config.vault.kdf = KdfAlgorithm::Pbkdf2Sha256;
        config.vault.pbkdf2_iterations = 1000;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "pbkdf2_iterations"));
    }
}
