// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Frotahub fleet reporting tool.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Shipped default endpoint. Contains a placeholder token; the transport's
/// usability guard refuses to attempt network calls against it.
pub const DEFAULT_ENDPOINT_PLACEHOLDER: &str =
    "https://script.google.com/macros/s/SUA_URL_AQUI/exec";

/// The placeholder token checked by the endpoint usability guard.
pub const ENDPOINT_PLACEHOLDER_TOKEN: &str = "SUA_URL";

/// Top-level Frotahub configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FrotaConfig {
    /// Hub identity and behavior settings.
    #[serde(default)]
    pub hub: HubConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Remote synchronization settings.
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Hub identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    /// Display name of the hub instance.
    #[serde(default = "default_hub_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Client-side manager gate code. This is a convenience gate for the
    /// dashboard, not authentication.
    #[serde(default)]
    pub admin_access_code: Option<String>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            name: default_hub_name(),
            log_level: default_log_level(),
            admin_access_code: None,
        }
    }
}

fn default_hub_name() -> String {
    "frotahub".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
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
        .map(|p| p.join("frotahub").join("frotahub.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("frotahub.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Remote synchronization configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Remote sync endpoint URL. Defaults to the shipped placeholder, which
    /// the usability guard treats as unconfigured.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// Seconds between periodic push cycles.
    #[serde(default = "default_push_interval_secs")]
    pub push_interval_secs: u64,

    /// Opt a deployment into the pull/replace refresh path. Off by default
    /// (push-only mode).
    #[serde(default)]
    pub pull_enabled: bool,

    /// Seconds between periodic pull refreshes (when `pull_enabled`).
    #[serde(default = "default_pull_interval_secs")]
    pub pull_interval_secs: u64,

    /// Delay after a save before the triggered sync attempt, long enough for
    /// the write to settle.
    #[serde(default = "default_post_save_delay_ms")]
    pub post_save_delay_ms: u64,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            push_interval_secs: default_push_interval_secs(),
            pull_enabled: false,
            pull_interval_secs: default_pull_interval_secs(),
            post_save_delay_ms: default_post_save_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_PLACEHOLDER.to_string()
}

fn default_push_interval_secs() -> u64 {
    30
}

fn default_pull_interval_secs() -> u64 {
    300
}

fn default_post_save_delay_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    10
}
