// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths, sane intervals, and well-formed
//! endpoint URLs.

use crate::diagnostic::ConfigError;
use crate::model::FrotaConfig;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &FrotaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if !VALID_LOG_LEVELS.contains(&config.hub.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "hub.log_level must be one of trace, debug, info, warn, error; got `{}`",
                config.hub.log_level
            ),
        });
    }

    // An unconfigured/placeholder URL is a valid state (the guard keeps it off
    // the network); only a URL with a non-http scheme is malformed.
    let url = config.sync.endpoint_url.trim();
    if !url.is_empty() && !url.starts_with("http") {
        errors.push(ConfigError::Validation {
            message: format!("sync.endpoint_url must be an http(s) URL, got `{url}`"),
        });
    }

    if config.sync.push_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "sync.push_interval_secs must be at least 1".to_string(),
        });
    }

    if config.sync.pull_enabled && config.sync.pull_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "sync.pull_interval_secs must be at least 1".to_string(),
        });
    }

    if config.sync.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "sync.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
