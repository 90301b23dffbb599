// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Hookbox webhook inbox.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Prefix accepted on `storage.database_path` for URL-style locations.
const SQLITE_URL_PREFIX: &str = "sqlite:///";

/// Top-level Hookbox configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HookboxConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Webhook authentication settings.
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the listener to.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Webhook authentication configuration.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookConfig {
    /// Shared HMAC-SHA256 secret. `None` keeps the service unready and
    /// rejects every webhook.
    #[serde(default)]
    pub secret: Option<String>,
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file. A `sqlite:///` URL is also accepted.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl StorageConfig {
    /// The filesystem path, with any `sqlite:///` URL prefix removed.
    pub fn resolved_path(&self) -> &str {
        self.database_path
            .strip_prefix(SQLITE_URL_PREFIX)
            .unwrap_or(&self.database_path)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("hookbox").join("hookbox.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("hookbox.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error). Case-insensitive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = HookboxConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert!(config.webhook.secret.is_none());
        assert!(config.storage.wal_mode);
        assert!(config.storage.database_path.ends_with("hookbox.db"));
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Pretty);
    }

    #[test]
    fn resolved_path_strips_sqlite_url() {
        let storage = StorageConfig {
            database_path: "sqlite:////data/app.db".to_string(),
            wal_mode: true,
        };
        assert_eq!(storage.resolved_path(), "/data/app.db");
    }

    #[test]
    fn resolved_path_keeps_plain_paths() {
        let storage = StorageConfig {
            database_path: "/var/lib/hookbox.db".to_string(),
            wal_mode: true,
        };
        assert_eq!(storage.resolved_path(), "/var/lib/hookbox.db");
    }

    #[test]
    fn webhook_debug_redacts_secret() {
        let webhook = WebhookConfig {
            secret: Some("testsecret".to_string()),
        };
        let debug = format!("{webhook:?}");
        assert!(!debug.contains("testsecret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn log_format_parses_lowercase() {
        let config: HookboxConfig = toml::from_str("[log]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.log.format, LogFormat::Json);
    }
}
