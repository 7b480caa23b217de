// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The sync engine: drains pending submissions to the remote endpoint.
//!
//! One cycle at a time, insertion order, mark-synced per item, stop on the
//! first transport failure. Offline operation is the normal case, not an
//! error: everything queues locally and drains on the next successful cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use frotahub_config::SyncConfig;
use frotahub_core::traits::{SubmissionStore, SyncTransport};
use frotahub_core::types::{PushEnvelope, ServiceCenter};
use frotahub_core::FrotaError;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shared sync flags, readable from any task without locking.
#[derive(Default)]
pub struct SyncState {
    syncing: AtomicBool,
    error: AtomicBool,
}

impl SyncState {
    /// Whether a sync cycle is currently in flight.
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    /// Whether the most recent push cycle ended in a transport failure.
    /// Cleared by the next fully successful cycle.
    pub fn has_error(&self) -> bool {
        self.error.load(Ordering::Acquire)
    }
}

/// What a requested cycle actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Endpoint unconfigured or another cycle already in flight.
    Skipped,
    /// Every pending submission was pushed and marked synced.
    Completed { pushed: usize },
    /// A push failed part-way; `pushed` items were synced before the stop.
    Aborted { pushed: usize },
}

/// Drives push cycles and pull refreshes against a store/transport pair.
pub struct SyncEngine {
    store: Arc<dyn SubmissionStore>,
    transport: Arc<dyn SyncTransport>,
    config: SyncConfig,
    state: Arc<SyncState>,
    cycle_tx: watch::Sender<u64>,
}

impl SyncEngine {
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        transport: Arc<dyn SyncTransport>,
        config: SyncConfig,
    ) -> Self {
        let (cycle_tx, _) = watch::channel(0);
        Self {
            store,
            transport,
            config,
            state: Arc::new(SyncState::default()),
            cycle_tx,
        }
    }

    /// Shared handle to the engine's sync flags.
    pub fn state(&self) -> Arc<SyncState> {
        Arc::clone(&self.state)
    }

    /// Watch the cycle counter. It ticks once after every drain or pull
    /// refresh that actually ran, so callers holding an in-memory view of
    /// the store know when to re-read it. Skipped cycles do not tick.
    pub fn subscribe_cycles(&self) -> watch::Receiver<u64> {
        self.cycle_tx.subscribe()
    }

    /// Run one push cycle.
    ///
    /// Quietly skips when the endpoint is unconfigured or a cycle is already
    /// running; concurrent triggers collapse into the in-flight cycle.
    /// Storage errors propagate; transport errors abort the cycle and set the
    /// error flag instead.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, FrotaError> {
        if !self.transport.is_configured() {
            debug!("sync skipped: endpoint not configured");
            return Ok(CycleOutcome::Skipped);
        }
        if self
            .state
            .syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("sync skipped: cycle already in flight");
            return Ok(CycleOutcome::Skipped);
        }

        let outcome = self.drain_pending().await;
        self.state.syncing.store(false, Ordering::Release);
        self.cycle_tx.send_modify(|n| *n += 1);
        outcome
    }

    async fn drain_pending(&self) -> Result<CycleOutcome, FrotaError> {
        let pending = self.store.get_pending().await?;
        if pending.is_empty() {
            self.state.error.store(false, Ordering::Release);
            return Ok(CycleOutcome::Completed { pushed: 0 });
        }

        debug!(count = pending.len(), "push cycle started");
        let mut pushed = 0;
        for submission in pending {
            let id = submission.id.clone();
            match self.transport.push(&PushEnvelope::Report(submission)).await {
                Ok(()) => {
                    // Mark immediately so a later failure cannot resend this one.
                    self.store.mark_synced(&id).await?;
                    pushed += 1;
                }
                Err(e) => {
                    warn!(id, pushed, error = %e, "push failed, cycle aborted");
                    self.state.error.store(true, Ordering::Release);
                    return Ok(CycleOutcome::Aborted { pushed });
                }
            }
        }

        self.state.error.store(false, Ordering::Release);
        info!(pushed, "push cycle complete");
        Ok(CycleOutcome::Completed { pushed })
    }

    /// Pull the authoritative list from the endpoint and replace the local
    /// store with it. No merge; the remote list wins wholesale.
    ///
    /// Separate from the push error flag: a failed pull leaves local data
    /// and sync flags untouched.
    pub async fn pull_refresh(&self) -> Result<usize, FrotaError> {
        if !self.transport.is_configured() {
            debug!("pull skipped: endpoint not configured");
            return Ok(0);
        }
        let submissions = self.transport.pull().await?;
        let count = submissions.len();
        self.store.replace_all(&submissions).await?;
        self.cycle_tx.send_modify(|n| *n += 1);
        info!(count, "pull refresh complete");
        Ok(count)
    }

    /// Push the full roster as a `config_update` payload.
    pub async fn publish_roster(&self, roster: &[ServiceCenter]) -> Result<(), FrotaError> {
        self.transport
            .push(&PushEnvelope::ConfigUpdate(roster.to_vec()))
            .await?;
        info!(centers = roster.len(), "roster published");
        Ok(())
    }

    /// Schedule a one-shot cycle after the configured post-save delay.
    pub fn trigger_after_save(self: &Arc<Self>) {
        let engine = Arc::clone(self);
        let delay = Duration::from_millis(engine.config.post_save_delay_ms);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = engine.run_cycle().await {
                warn!(error = %e, "post-save sync cycle failed");
            }
        });
    }

    /// Run the periodic push (and, when enabled, pull) loops until cancelled.
    pub fn spawn_timers(self: &Arc<Self>, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            let mut push_tick =
                tokio::time::interval(Duration::from_secs(engine.config.push_interval_secs));
            push_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            let mut pull_tick =
                tokio::time::interval(Duration::from_secs(engine.config.pull_interval_secs));
            pull_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let pull_enabled = engine.config.pull_enabled;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("sync timers stopped");
                        break;
                    }
                    _ = push_tick.tick() => {
                        if let Err(e) = engine.run_cycle().await {
                            warn!(error = %e, "periodic sync cycle failed");
                        }
                    }
                    _ = pull_tick.tick(), if pull_enabled => {
                        if let Err(e) = engine.pull_refresh().await {
                            warn!(error = %e, "periodic pull refresh failed");
                        }
                    }
                }
            }
        })
    }
}
