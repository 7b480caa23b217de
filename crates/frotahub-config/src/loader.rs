// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./frotahub.toml` > `~/.config/frotahub/frotahub.toml`
//! > `/etc/frotahub/frotahub.toml` with environment variable overrides via
//! `FROTAHUB_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::FrotaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/frotahub/frotahub.toml` (system-wide)
/// 3. `~/.config/frotahub/frotahub.toml` (user XDG config)
/// 4. `./frotahub.toml` (local directory)
/// 5. `FROTAHUB_*` environment variables
pub fn load_config() -> Result<FrotaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a specific TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<FrotaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FrotaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FrotaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FrotaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(FrotaConfig::default()))
        .merge(Toml::file("/etc/frotahub/frotahub.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("frotahub/frotahub.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("frotahub.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `FROTAHUB_SYNC_ENDPOINT_URL` must map to
/// `sync.endpoint_url`, not `sync.endpoint.url`.
fn env_provider() -> Env {
    Env::prefixed("FROTAHUB_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("hub_", "hub.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("sync_", "sync.", 1);
        mapped.into()
    })
}
