// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Frotahub fleet reporting tool.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Frotahub workspace. The storage and
//! transport adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::FrotaError;
pub use types::{
    AdapterType, HealthStatus, PushEnvelope, ServiceCenter, SpotOffers, Submission, SyncStatus,
    Vehicle, VehicleStatus,
};

pub use traits::{PluginAdapter, SubmissionStore, SyncTransport};

/// Settings key for the remote sync endpoint URL.
pub const SETTING_SYNC_URL: &str = "fleet_sync_url";
/// Settings key for the client-side manager gate flag.
pub const SETTING_ADMIN_MODE: &str = "fleet_admin_mode";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frota_error_has_all_variants() {
        let _config = FrotaError::Config("test".into());
        let _storage = FrotaError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _transport = FrotaError::Transport {
            message: "test".into(),
            source: None,
        };
        let _internal = FrotaError::Internal("test".into());
    }

    #[test]
    fn adapter_type_roundtrip() {
        use std::str::FromStr;

        for variant in [AdapterType::Storage, AdapterType::Transport] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn trait_modules_are_exported() {
        // Compile-time check that the adapter traits are accessible through
        // the public API.
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_store<T: SubmissionStore>() {}
        fn _assert_transport<T: SyncTransport>() {}
    }
}
