// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./hookbox.toml` > `~/.config/hookbox/hookbox.toml` > `/etc/hookbox/hookbox.toml`
//! with environment variable overrides via the `HOOKBOX_` prefix and the
//! conventional bare `WEBHOOK_SECRET`, `DATABASE_URL` and `LOG_LEVEL` variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HookboxConfig;

/// Bare environment variables honoured without the `HOOKBOX_` prefix.
const BARE_ENV_VARS: &[&str] = &["WEBHOOK_SECRET", "DATABASE_URL", "LOG_LEVEL"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hookbox/hookbox.toml` (system-wide)
/// 3. `~/.config/hookbox/hookbox.toml` (user XDG config)
/// 4. `./hookbox.toml` (local directory)
/// 5. `WEBHOOK_SECRET`, `DATABASE_URL`, `LOG_LEVEL`
/// 6. `HOOKBOX_*` environment variables
pub fn load_config() -> Result<HookboxConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<HookboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HookboxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HookboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HookboxConfig::default()))
        .merge(Toml::file(path))
        .merge(bare_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HookboxConfig::default()))
        .merge(Toml::file("/etc/hookbox/hookbox.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("hookbox/hookbox.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("hookbox.toml"))
        .merge(bare_env_provider())
        .merge(env_provider())
}

/// Create the `HOOKBOX_*` provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` so that underscore-containing key
/// names survive: `HOOKBOX_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("HOOKBOX_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("webhook_", "webhook.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}

/// Provider for the bare, unprefixed deployment variables.
fn bare_env_provider() -> Env {
    Env::raw().only(BARE_ENV_VARS).map(|key| {
        let mapped = match key.as_str().to_ascii_lowercase().as_str() {
            "webhook_secret" => "webhook.secret".to_string(),
            "database_url" => "storage.database_path".to_string(),
            "log_level" => "log.level".to_string(),
            other => other.to_string(),
        };
        mapped.into()
    })
}
