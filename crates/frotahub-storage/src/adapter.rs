// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed implementation of the [`SubmissionStore`] trait.

use async_trait::async_trait;
use frotahub_config::StorageConfig;
use frotahub_core::traits::{PluginAdapter, SubmissionStore};
use frotahub_core::types::{AdapterType, HealthStatus, ServiceCenter, Submission};
use frotahub_core::FrotaError;
use tokio::sync::OnceCell;
use tracing::info;

use crate::database::Database;
use crate::queries;

/// Submission store over a single SQLite database file.
///
/// The connection opens lazily on [`SubmissionStore::initialize`] (or the
/// first operation) and stays open for the adapter's lifetime.
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    async fn db(&self) -> Result<&Database, FrotaError> {
        self.db
            .get_or_try_init(|| async {
                let db =
                    Database::open_with_wal(&self.config.database_path, self.config.wal_mode)
                        .await?;
                info!(path = %self.config.database_path, "sqlite store ready");
                Ok(db)
            })
            .await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, FrotaError> {
        let db = self.db().await?;
        let probe = db
            .connection()
            .call(|conn| {
                let probe: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
                Ok::<_, rusqlite::Error>(probe)
            })
            .await;
        match probe {
            Ok(1) => Ok(HealthStatus::Healthy),
            Ok(n) => Ok(HealthStatus::Degraded(format!("probe returned {n}"))),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), FrotaError> {
        self.close().await
    }
}

#[async_trait]
impl SubmissionStore for SqliteStore {
    async fn initialize(&self) -> Result<(), FrotaError> {
        self.db().await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), FrotaError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
        }
        Ok(())
    }

    async fn save(&self, submission: &Submission) -> Result<(), FrotaError> {
        queries::submissions::save(self.db().await?, submission).await
    }

    async fn get_all(&self) -> Result<Vec<Submission>, FrotaError> {
        queries::submissions::get_all(self.db().await?).await
    }

    async fn get_pending(&self) -> Result<Vec<Submission>, FrotaError> {
        queries::submissions::get_pending(self.db().await?).await
    }

    async fn mark_synced(&self, id: &str) -> Result<(), FrotaError> {
        queries::submissions::mark_synced(self.db().await?, id).await
    }

    async fn replace_all(&self, submissions: &[Submission]) -> Result<(), FrotaError> {
        queries::submissions::replace_all(self.db().await?, submissions).await
    }

    async fn load_roster(&self) -> Result<Vec<ServiceCenter>, FrotaError> {
        queries::roster::load_roster(self.db().await?).await
    }

    async fn replace_roster(&self, roster: &[ServiceCenter]) -> Result<(), FrotaError> {
        queries::roster::replace_roster(self.db().await?, roster).await
    }

    async fn get_setting(&self, key: &str) -> Result<Option<String>, FrotaError> {
        queries::settings::get_setting(self.db().await?, key).await
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<(), FrotaError> {
        queries::settings::set_setting(self.db().await?, key, value).await
    }
}
