// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator secret acquisition from the environment or a TTY prompt.

use razecrypt_core::VaultError;
use secrecy::SecretString;

/// Primary environment variable holding the operator secret.
pub const SECRET_ENV_VAR: &str = "RAZECRYPT_ENCRYPTION_KEY";

/// Name read by existing deployments; consulted after [`SECRET_ENV_VAR`].
pub const LEGACY_SECRET_ENV_VAR: &str = "ENCRYPTION_KEY";

/// Get the operator secret from the environment or an interactive prompt.
///
/// Priority:
/// 1. `RAZECRYPT_ENCRYPTION_KEY`
/// 2. `ENCRYPTION_KEY`
/// 3. Interactive TTY prompt via `rpassword`
///
/// Empty values are skipped. With no usable source this is a
/// [`VaultError::Config`] and the process must not start.
pub fn get_operator_secret() -> Result<SecretString, VaultError> {
    if let Some(secret) = secret_from_env() {
        return Ok(secret);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("Encryption key: ");
        let secret = rpassword::read_password()
            .map_err(|e| VaultError::Config(format!("failed to read encryption key: {e}")))?;
        if secret.is_empty() {
            return Err(VaultError::Config(
                "empty encryption key not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(secret));
    }

    Err(VaultError::Config(format!(
        "No encryption key provided. Set {SECRET_ENV_VAR} or run interactively."
    )))
}

/// The operator secret from the environment only; never prompts.
pub fn secret_from_env() -> Option<SecretString> {
    [SECRET_ENV_VAR, LEGACY_SECRET_ENV_VAR]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.is_empty())
        .map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    fn clear_env() {
        // SAFETY: test-only env mutation; every test here is #[serial].
        unsafe {
            std::env::remove_var(SECRET_ENV_VAR);
            std::env::remove_var(LEGACY_SECRET_ENV_VAR);
        }
    }

    #[test]
    #[serial]
    fn secret_from_primary_env_var() {
        clear_env();
        unsafe { std::env::set_var(SECRET_ENV_VAR, "primary") };
        let result = get_operator_secret();
        clear_env();

        assert_eq!(result.unwrap().expose_secret(), "primary");
    }

    #[test]
    #[serial]
    fn legacy_env_var_is_a_fallback() {
        clear_env();
        unsafe { std::env::set_var(LEGACY_SECRET_ENV_VAR, "legacy") };
        let result = get_operator_secret();
        clear_env();

        assert_eq!(result.unwrap().expose_secret(), "legacy");
    }

    #[test]
    #[serial]
    fn primary_env_var_wins_over_legacy() {
        clear_env();
        unsafe {
            std::env::set_var(SECRET_ENV_VAR, "primary");
            std::env::set_var(LEGACY_SECRET_ENV_VAR, "legacy");
        }
        let result = get_operator_secret();
        clear_env();

        assert_eq!(result.unwrap().expose_secret(), "primary");
    }

    #[test]
    #[serial]
    fn empty_primary_falls_through_to_legacy() {
        clear_env();
        unsafe {
            std::env::set_var(SECRET_ENV_VAR, "");
            std::env::set_var(LEGACY_SECRET_ENV_VAR, "legacy");
        }
        let result = get_operator_secret();
        clear_env();

        assert_eq!(result.unwrap().expose_secret(), "legacy");
    }

    #[test]
    #[serial]
    fn env_lookup_ignores_empty_values() {
        clear_env();
        unsafe { std::env::set_var(SECRET_ENV_VAR, "") };
        let found = secret_from_env();
        clear_env();

        assert!(found.is_none());
    }
}
