// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application state controller.
//!
//! Owns the store, transport, and sync engine for one hub instance and
//! exposes the operations the command surface calls. Nothing in here is a
//! process-wide singleton; tests construct as many controllers as they need.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::Utc;
use frotahub_config::FrotaConfig;
use frotahub_core::traits::{SubmissionStore, SyncTransport};
use frotahub_core::types::{
    normalize_day, OperationalProblem, ServiceCenter, SpotOffers, Submission, SyncStatus,
    VehicleStatus,
};
use frotahub_core::{FrotaError, SETTING_ADMIN_MODE, SETTING_SYNC_URL};
use frotahub_storage::SqliteStore;
use frotahub_sync::{HttpTransport, SyncEngine};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// Input for a new daily report; the controller assigns id, timestamp, and
/// sync status.
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub operational_date: String,
    pub service_center_id: String,
    pub fleet_status: Vec<VehicleStatus>,
    pub spot_offers: SpotOffers,
    pub problems: OperationalProblem,
    pub weekly_acceptance: Option<String>,
}

/// Point-in-time view of hub state, cheap to clone and hand out.
#[derive(Debug, Clone)]
pub struct HubSnapshot {
    pub submissions: Vec<Submission>,
    pub roster: Vec<ServiceCenter>,
    pub endpoint_url: String,
    pub endpoint_configured: bool,
    pub admin_unlocked: bool,
    pub syncing: bool,
    pub sync_error: bool,
}

pub struct Controller {
    store: Arc<dyn SubmissionStore>,
    transport: Arc<dyn SyncTransport>,
    engine: Arc<SyncEngine>,
    config: FrotaConfig,
    snapshot: ArcSwap<HubSnapshot>,
}

impl Controller {
    /// Build a controller over explicit adapters. The endpoint persisted in
    /// settings (if any) wins over the configured one.
    pub async fn new(
        store: Arc<dyn SubmissionStore>,
        transport: Arc<dyn SyncTransport>,
        config: FrotaConfig,
    ) -> Result<Self, FrotaError> {
        store.initialize().await?;
        if let Some(saved_url) = store.get_setting(SETTING_SYNC_URL).await? {
            transport.set_endpoint(&saved_url);
        }

        let engine = Arc::new(SyncEngine::new(
            Arc::clone(&store),
            Arc::clone(&transport),
            config.sync.clone(),
        ));

        let controller = Self {
            store,
            transport,
            engine,
            config,
            snapshot: ArcSwap::from_pointee(HubSnapshot {
                submissions: vec![],
                roster: vec![],
                endpoint_url: String::new(),
                endpoint_configured: false,
                admin_unlocked: false,
                syncing: false,
                sync_error: false,
            }),
        };
        controller.reload_snapshot().await?;
        Ok(controller)
    }

    /// Build a controller with the default SQLite store and HTTP transport.
    pub async fn from_config(config: FrotaConfig) -> Result<Self, FrotaError> {
        let store = Arc::new(SqliteStore::new(config.storage.clone()));
        let transport = Arc::new(HttpTransport::new(&config.sync)?);
        Self::new(store, transport, config).await
    }

    /// The sync engine, for timer wiring and manual cycles.
    pub fn engine(&self) -> Arc<SyncEngine> {
        Arc::clone(&self.engine)
    }

    /// Keep the snapshot current while background cycles run.
    ///
    /// Timer-driven and post-save cycles mark submissions synced in the
    /// store without going through a controller operation; this task
    /// re-reads the store after every cycle the engine reports, so the
    /// snapshot never shows stale `pending` states in serve mode.
    pub fn spawn_snapshot_follower(
        self: &Arc<Self>,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let controller = Arc::clone(self);
        let mut cycles = controller.engine.subscribe_cycles();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    changed = cycles.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        if let Err(e) = controller.reload_snapshot().await {
                            warn!(error = %e, "snapshot reload after sync cycle failed");
                        }
                    }
                }
            }
        })
    }

    /// Current state view. Always consistent with the last completed
    /// controller operation.
    pub fn snapshot(&self) -> Arc<HubSnapshot> {
        self.snapshot.load_full()
    }

    /// Persist a new report and schedule a sync attempt after the settle
    /// delay. Saving succeeds regardless of network reachability.
    pub async fn submit_report(&self, draft: ReportDraft) -> Result<Submission, FrotaError> {
        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            operational_date: normalize_day(&draft.operational_date).to_string(),
            service_center_id: draft.service_center_id,
            fleet_status: draft.fleet_status,
            spot_offers: draft.spot_offers,
            problems: draft.problems,
            weekly_acceptance: draft.weekly_acceptance,
            sync_status: SyncStatus::Pending,
        };
        self.store.save(&submission).await?;
        info!(id = submission.id, day = submission.operational_date, "report saved");

        self.reload_snapshot().await?;
        self.engine.trigger_after_save();
        Ok(submission)
    }

    /// Persist a new endpoint URL, apply it to the live transport, and
    /// attempt an immediate sync against it.
    pub async fn update_endpoint_url(&self, url: &str) -> Result<(), FrotaError> {
        let url = url.trim();
        self.store.set_setting(SETTING_SYNC_URL, url).await?;
        self.transport.set_endpoint(url);
        info!(configured = self.transport.is_configured(), "endpoint updated");

        if self.transport.is_configured() {
            self.engine.run_cycle().await?;
            if self.config.sync.pull_enabled
                && let Err(e) = self.engine.pull_refresh().await
            {
                warn!(error = %e, "pull against new endpoint failed");
            }
        }
        self.reload_snapshot().await
    }

    /// Replace the service-center roster locally. Names are uppercased;
    /// entries keep the ids they came in with (a rename keeps its slug), and
    /// new entries without an id get one derived from the name.
    ///
    /// Remote publication is a separate, explicit action
    /// ([`Controller::publish_roster`]).
    pub async fn update_roster(&self, roster: Vec<ServiceCenter>) -> Result<(), FrotaError> {
        let mut normalized = Vec::with_capacity(roster.len());
        for center in roster {
            if center.name.trim().is_empty() {
                return Err(FrotaError::Internal(
                    "service center name must not be empty".to_string(),
                ));
            }
            let name = center.name.trim().to_uppercase();
            let id = if center.id.is_empty() {
                frotahub_core::types::slug_id(&name)
            } else {
                center.id
            };
            normalized.push(ServiceCenter {
                id,
                name,
                vehicles: center.vehicles,
            });
        }

        self.store.replace_roster(&normalized).await?;
        self.reload_snapshot().await
    }

    /// Push the current roster to the endpoint as a `config_update`.
    pub async fn publish_roster(&self) -> Result<(), FrotaError> {
        let roster = self.store.load_roster().await?;
        self.engine.publish_roster(&roster).await
    }

    /// Run one push cycle now and refresh the snapshot.
    pub async fn sync_now(&self) -> Result<frotahub_sync::CycleOutcome, FrotaError> {
        let outcome = self.engine.run_cycle().await?;
        self.reload_snapshot().await?;
        Ok(outcome)
    }

    /// Force a sync cycle and re-read store state. When the pull path is
    /// enabled this also replaces the submission list with the remote one;
    /// a pull failure degrades to a local-only refresh.
    pub async fn refresh(&self) -> Result<(), FrotaError> {
        self.engine.run_cycle().await?;
        if self.config.sync.pull_enabled
            && self.transport.is_configured()
            && let Err(e) = self.engine.pull_refresh().await
        {
            warn!(error = %e, "pull refresh failed, serving local data");
        }
        self.reload_snapshot().await
    }

    /// Check a gate code and persist the unlocked flag across restarts.
    ///
    /// This is a convenience gate for the manager view, not authentication;
    /// with no code configured the gate is open.
    pub async fn unlock_admin(&self, code: &str) -> Result<bool, FrotaError> {
        let ok = match &self.config.hub.admin_access_code {
            Some(expected) => expected == code,
            None => true,
        };
        if ok {
            self.store.set_setting(SETTING_ADMIN_MODE, "true").await?;
            self.reload_snapshot().await?;
        }
        Ok(ok)
    }

    /// Drop back to the reporter view.
    pub async fn lock_admin(&self) -> Result<(), FrotaError> {
        self.store.set_setting(SETTING_ADMIN_MODE, "false").await?;
        self.reload_snapshot().await
    }

    /// Reachability probe against the configured endpoint.
    pub async fn ping_endpoint(&self) -> bool {
        self.transport.ping().await
    }

    /// Flush storage before exit.
    pub async fn shutdown(&self) -> Result<(), FrotaError> {
        self.store.close().await
    }

    async fn reload_snapshot(&self) -> Result<(), FrotaError> {
        let submissions = self.store.get_all().await?;
        let roster = self.store.load_roster().await?;
        let endpoint_url = self
            .store
            .get_setting(SETTING_SYNC_URL)
            .await?
            .unwrap_or_else(|| self.config.sync.endpoint_url.clone());
        let admin_unlocked = self
            .store
            .get_setting(SETTING_ADMIN_MODE)
            .await?
            .as_deref()
            == Some("true");
        let state = self.engine.state();
        self.snapshot.store(Arc::new(HubSnapshot {
            submissions,
            roster,
            endpoint_configured: self.transport.is_configured(),
            endpoint_url,
            admin_unlocked,
            syncing: state.is_syncing(),
            sync_error: state.has_error(),
        }));
        Ok(())
    }
}
