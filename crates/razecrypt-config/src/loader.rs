// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./razecrypt.toml` > `~/.config/razecrypt/razecrypt.toml` >
//! `/etc/razecrypt/razecrypt.toml` with environment variable overrides via `RAZECRYPT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RazecryptConfig;

/// Environment variable prefix for config overrides.
pub const ENV_PREFIX: &str = "RAZECRYPT_";

/// Config sections that may be overridden from the environment.
///
/// Other `RAZECRYPT_*` variables (the operator secret, the CLI owner) are not
/// config keys and must not reach the `deny_unknown_fields` model.
const ENV_SECTIONS: &[&str] = &["logging_", "storage_", "vault_"];

/// System-wide config file path.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/razecrypt/razecrypt.toml";

/// Local config file name, resolved against the working directory.
pub const LOCAL_CONFIG_FILE: &str = "razecrypt.toml";

/// Per-user config file path under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("razecrypt").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/razecrypt/razecrypt.toml` (system-wide)
/// 3. `~/.config/razecrypt/razecrypt.toml` (user XDG config)
/// 4. `./razecrypt.toml` (local directory)
/// 5. `RAZECRYPT_*` environment variables
pub fn load_config() -> Result<RazecryptConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RazecryptConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RazecryptConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RazecryptConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RazecryptConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RazecryptConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` so underscore-containing key names
/// survive: `RAZECRYPT_VAULT_SCRYPT_LOG_N` maps to `vault.scrypt_log_n`.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .filter(|key| {
            let key = key.as_str().to_ascii_lowercase();
            ENV_SECTIONS.iter().any(|section| key.starts_with(section))
        })
        .map(|key| {
            let key_str = key.as_str().to_ascii_lowercase();
            let mapped = key_str
                .replacen("logging_", "logging.", 1)
                .replacen("storage_", "storage.", 1)
                .replacen("vault_", "vault.", 1);
            mapped.into()
        })
}
