// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `frotahub serve` command implementation.
//!
//! Runs the hub in the foreground: periodic push cycles (and pull refreshes
//! when enabled) until Ctrl-C.

use std::sync::Arc;

use frotahub_config::FrotaConfig;
use frotahub_core::FrotaError;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::controller::Controller;

/// Run the hub until interrupted.
pub async fn run_serve(config: &FrotaConfig) -> Result<(), FrotaError> {
    let controller = Arc::new(Controller::from_config(config.clone()).await?);
    controller.refresh().await?;

    let snapshot = controller.snapshot();
    info!(
        reports = snapshot.submissions.len(),
        centers = snapshot.roster.len(),
        endpoint_configured = snapshot.endpoint_configured,
        "hub started"
    );
    if !snapshot.endpoint_configured {
        info!("no sync endpoint configured; reports will queue locally");
    }

    let cancel = CancellationToken::new();
    let timers = controller.engine().spawn_timers(cancel.clone());
    let follower = controller.spawn_snapshot_follower(cancel.clone());

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| FrotaError::Internal(format!("failed to listen for shutdown: {e}")))?;
    info!("shutting down");

    cancel.cancel();
    timers
        .await
        .map_err(|e| FrotaError::Internal(format!("sync timer task panicked: {e}")))?;
    follower
        .await
        .map_err(|e| FrotaError::Internal(format!("snapshot follower task panicked: {e}")))?;
    controller.shutdown().await?;
    Ok(())
}
