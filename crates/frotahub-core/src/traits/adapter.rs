// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base plugin trait implemented by every adapter.

use async_trait::async_trait;

use crate::error::FrotaError;
use crate::types::{AdapterType, HealthStatus};

/// Common lifecycle and identity surface for storage and transport adapters.
#[async_trait]
pub trait PluginAdapter: Send + Sync {
    /// Short stable name of the adapter (e.g. "sqlite", "http").
    fn name(&self) -> &str;

    /// Adapter implementation version.
    fn version(&self) -> semver::Version;

    /// Which registry slot this adapter fills.
    fn adapter_type(&self) -> AdapterType;

    /// Probe the adapter's backing resource.
    async fn health_check(&self) -> Result<HealthStatus, FrotaError>;

    /// Flush and release resources before the process exits.
    async fn shutdown(&self) -> Result<(), FrotaError>;
}
