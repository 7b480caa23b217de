// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sync transport trait for the remote endpoint adapter.

use async_trait::async_trait;

use crate::error::FrotaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{PushEnvelope, Submission};

/// Thin wrapper over the remote HTTP sink/source.
///
/// The push side is one-way: the receiver cannot report structured success
/// across the browser-style cross-origin boundary, so the only available
/// success signal is the absence of a local transport error. Callers must
/// not assume stronger guarantees than that.
#[async_trait]
pub trait SyncTransport: PluginAdapter {
    /// Send a tagged payload to the configured endpoint.
    ///
    /// `Ok(())` means the local network call completed without a
    /// transport-level error (DNS, timeout, connection refused). It is NOT
    /// a delivery receipt; the response is not inspected.
    async fn push(&self, envelope: &PushEnvelope) -> Result<(), FrotaError>;

    /// Fetch the authoritative submission list from the endpoint.
    ///
    /// Unlike `push`, this call observes HTTP status and body; a non-success
    /// status or a body that is not a JSON array of submissions is a hard
    /// failure for this call only.
    async fn pull(&self) -> Result<Vec<Submission>, FrotaError>;

    /// Reachability probe: GET with a `ping` query marker. The result is
    /// binary and based solely on the absence of a transport-level error,
    /// never on response content.
    async fn ping(&self) -> bool;

    /// Whether the configured endpoint URL is usable: non-empty, plausibly
    /// long enough to be a real endpoint, and free of the shipped
    /// placeholder token. An unconfigured endpoint must never be attempted.
    fn is_configured(&self) -> bool;

    /// Swap the endpoint URL at runtime (settings change).
    fn set_endpoint(&self, url: &str);
}
