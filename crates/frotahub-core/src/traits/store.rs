// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submission store trait for the local persistence backend.

use async_trait::async_trait;

use crate::error::FrotaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ServiceCenter, Submission};

/// Durable, client-local persistence of submissions and their sync status,
/// independent of network reachability.
///
/// Operations are atomic: a `save` either fully persists the record or the
/// record does not exist afterward. Storage errors propagate to the caller;
/// they are never folded into sync-state flags.
#[async_trait]
pub trait SubmissionStore: PluginAdapter {
    /// Open the backing database and run migrations.
    async fn initialize(&self) -> Result<(), FrotaError>;

    /// Flush pending writes and release the connection.
    async fn close(&self) -> Result<(), FrotaError>;

    /// Persist a new submission with `sync_status = pending`.
    ///
    /// No dedup check is performed; callers are responsible for generating
    /// unique ids.
    async fn save(&self, submission: &Submission) -> Result<(), FrotaError>;

    /// Every stored submission, newest first. Ordering is stable and
    /// deterministic across calls when no writes occur between them.
    async fn get_all(&self) -> Result<Vec<Submission>, FrotaError>;

    /// The pending subset, in insertion order (the sync drain order).
    async fn get_pending(&self) -> Result<Vec<Submission>, FrotaError>;

    /// Transition one submission to `synced`. Idempotent: already-synced or
    /// unknown ids are a no-op, not an error.
    async fn mark_synced(&self, id: &str) -> Result<(), FrotaError>;

    /// Wholesale-replace the stored submission list with a remote snapshot.
    ///
    /// Used by the pull path: replace, not merge. Runs in one transaction so
    /// a failure leaves the prior local data intact.
    async fn replace_all(&self, submissions: &[Submission]) -> Result<(), FrotaError>;

    /// Load the service-center roster, in configured order.
    async fn load_roster(&self) -> Result<Vec<ServiceCenter>, FrotaError>;

    /// Replace the entire roster. The roster is treated as a single
    /// replaceable blob; individual vehicles are never diffed.
    async fn replace_roster(&self, roster: &[ServiceCenter]) -> Result<(), FrotaError>;

    /// Read a settings value (endpoint URL, admin flag) by stable key.
    async fn get_setting(&self, key: &str) -> Result<Option<String>, FrotaError>;

    /// Write a settings value, overwriting any prior value for the key.
    async fn set_setting(&self, key: &str, value: &str) -> Result<(), FrotaError>;
}
