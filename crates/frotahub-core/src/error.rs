// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Frotahub fleet reporting tool.

use thiserror::Error;

/// The primary error type used across all Frotahub adapter traits and core operations.
#[derive(Debug, Error)]
pub enum FrotaError {
    /// Configuration errors (invalid TOML, missing required fields, unusable endpoint URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    ///
    /// Storage errors imply data-loss risk for the attempted operation and are
    /// surfaced to the immediate caller, never swallowed into sync-state flags.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport errors (network unreachable, timeout, DNS failure, malformed pull body).
    ///
    /// During a push cycle these are recorded as an observable error flag and
    /// recovered automatically on the next scheduled cycle.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
