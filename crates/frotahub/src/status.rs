// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `frotahub status` command implementation.
//!
//! Shows the local queue state, roster size, and endpoint reachability.
//! Works fully offline; the ping is skipped when no endpoint is configured.

use std::io::IsTerminal;

use frotahub_config::FrotaConfig;
use frotahub_core::types::SyncStatus;
use frotahub_core::FrotaError;
use serde::Serialize;

use crate::controller::Controller;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub database_path: String,
    pub submissions_total: usize,
    pub submissions_pending: usize,
    pub service_centers: usize,
    pub endpoint_configured: bool,
    pub endpoint_reachable: Option<bool>,
    pub sync_error: bool,
}

/// Run the `frotahub status` command.
///
/// If `--json` is passed, outputs structured JSON for scripting.
/// If `--plain` is passed or stdout is not a TTY, disables colors.
pub async fn run_status(config: &FrotaConfig, json: bool, plain: bool) -> Result<(), FrotaError> {
    let database_path = config.storage.database_path.clone();
    let controller = Controller::from_config(config.clone()).await?;
    let snapshot = controller.snapshot();

    let pending = snapshot
        .submissions
        .iter()
        .filter(|s| s.sync_status == SyncStatus::Pending)
        .count();
    let reachable = if snapshot.endpoint_configured {
        Some(controller.ping_endpoint().await)
    } else {
        None
    };

    let status = StatusResponse {
        database_path,
        submissions_total: snapshot.submissions.len(),
        submissions_pending: pending,
        service_centers: snapshot.roster.len(),
        endpoint_configured: snapshot.endpoint_configured,
        endpoint_reachable: reachable,
        sync_error: snapshot.sync_error,
    };
    controller.shutdown().await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&status).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_status(&status, use_color);
    }
    Ok(())
}

fn print_status(status: &StatusResponse, use_color: bool) {
    println!();
    println!("  frotahub status");
    println!("  {}", "-".repeat(35));
    println!("    Database: {}", status.database_path);
    println!(
        "    Reports:  {} total, {} pending",
        status.submissions_total, status.submissions_pending
    );
    println!("    Centers:  {}", status.service_centers);

    match (status.endpoint_configured, status.endpoint_reachable) {
        (false, _) => println!("    Endpoint: not configured (reports queue locally)"),
        (true, Some(true)) => {
            if use_color {
                use colored::Colorize;
                println!("    Endpoint: {} {}", "✓".green(), "reachable".green());
            } else {
                println!("    Endpoint: [OK] reachable");
            }
        }
        (true, _) => {
            if use_color {
                use colored::Colorize;
                println!("    Endpoint: {} {}", "✗".red(), "unreachable".red());
            } else {
                println!("    Endpoint: [FAIL] unreachable");
            }
        }
    }

    if status.sync_error {
        println!("    Sync:     last cycle failed, will retry");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_response_serializes() {
        let status = StatusResponse {
            database_path: "/tmp/hub.db".to_string(),
            submissions_total: 4,
            submissions_pending: 1,
            service_centers: 2,
            endpoint_configured: true,
            endpoint_reachable: Some(true),
            sync_error: false,
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"submissions_pending\":1"));
        assert!(json.contains("\"endpoint_reachable\":true"));
    }

    #[test]
    fn unconfigured_endpoint_omits_reachability() {
        let status = StatusResponse {
            database_path: "/tmp/hub.db".to_string(),
            submissions_total: 0,
            submissions_pending: 0,
            service_centers: 0,
            endpoint_configured: false,
            endpoint_reachable: None,
            sync_error: false,
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"endpoint_reachable\":null"));
    }
}
