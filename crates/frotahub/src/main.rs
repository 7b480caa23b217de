// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frotahub - local-first fleet operations reporting.
//!
//! Binary entry point: daily reports queue in a local SQLite store and sync
//! to a configured remote endpoint whenever it is reachable.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use frotahub_config::FrotaConfig;
use frotahub_core::types::{OperationalProblem, ServiceCenter, SpotOffers, Vehicle, VehicleStatus};
use frotahub_core::FrotaError;
use serde::Deserialize;

use crate::controller::{Controller, ReportDraft};

mod controller;
mod serve;
mod status;

/// Frotahub - local-first fleet operations reporting.
#[derive(Parser, Debug)]
#[command(name = "frotahub", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the hub in the foreground with periodic sync.
    Serve,
    /// Show queue, roster, and endpoint state.
    Status {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Run one push cycle now.
    Sync,
    /// Submit a daily report from a JSON draft file.
    Submit {
        /// Path to the report draft (JSON).
        #[arg(long)]
        file: PathBuf,
    },
    /// Inspect or replace the service-center roster.
    Roster {
        #[command(subcommand)]
        action: RosterAction,
    },
    /// Inspect or change the sync endpoint URL.
    Endpoint {
        #[command(subcommand)]
        action: EndpointAction,
    },
    /// Toggle the manager view gate.
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand, Debug)]
enum RosterAction {
    /// Print the roster.
    Show,
    /// Replace the local roster from a JSON file.
    Set {
        /// Path to a JSON array of service centers.
        #[arg(long)]
        file: PathBuf,
    },
    /// Re-push the current roster to the endpoint.
    Publish,
}

#[derive(Subcommand, Debug)]
enum AdminAction {
    /// Unlock the manager view with the configured access code.
    Unlock {
        #[arg(default_value = "")]
        code: String,
    },
    /// Return to the reporter view.
    Lock,
}

#[derive(Subcommand, Debug)]
enum EndpointAction {
    /// Print the configured endpoint URL and whether it is usable.
    Show,
    /// Set and persist a new endpoint URL.
    Set { url: String },
}

/// On-disk shape of a `submit --file` draft. Field names match the wire
/// format of a submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DraftFile {
    operational_date: String,
    service_center_id: String,
    #[serde(default)]
    fleet_status: Vec<VehicleStatus>,
    #[serde(default)]
    spot_offers: SpotOffers,
    #[serde(default)]
    problems: OperationalProblem,
    #[serde(default)]
    weekly_acceptance: Option<String>,
}

/// On-disk shape of a `roster set --file` entry. Entries without an id get
/// one derived from the name.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RosterEntryFile {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    vehicles: Vec<Vehicle>,
}

fn init_tracing(config: &FrotaConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.hub.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T, FrotaError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| FrotaError::Internal(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| FrotaError::Internal(format!("invalid JSON in {}: {e}", path.display())))
}

async fn run_command(command: Commands, config: FrotaConfig) -> Result<(), FrotaError> {
    match command {
        Commands::Serve => serve::run_serve(&config).await,
        Commands::Status { json, plain } => status::run_status(&config, json, plain).await,
        Commands::Sync => {
            let controller = Controller::from_config(config).await?;
            let outcome = controller.sync_now().await?;
            println!("sync: {outcome:?}");
            controller.shutdown().await
        }
        Commands::Submit { file } => {
            let draft: DraftFile = read_json_file(&file)?;
            let settle_ms = config.sync.post_save_delay_ms;
            let controller = Controller::from_config(config).await?;
            let saved = controller
                .submit_report(ReportDraft {
                    operational_date: draft.operational_date,
                    service_center_id: draft.service_center_id,
                    fleet_status: draft.fleet_status,
                    spot_offers: draft.spot_offers,
                    problems: draft.problems,
                    weekly_acceptance: draft.weekly_acceptance,
                })
                .await?;
            println!("saved report {} for {}", saved.id, saved.operational_date);
            // Give the post-save sync attempt a chance before exiting.
            tokio::time::sleep(std::time::Duration::from_millis(2 * settle_ms)).await;
            controller.shutdown().await
        }
        Commands::Roster { action } => run_roster(action, config).await,
        Commands::Endpoint { action } => run_endpoint(action, config).await,
        Commands::Admin { action } => {
            let controller = Controller::from_config(config).await?;
            match action {
                AdminAction::Unlock { code } => {
                    if controller.unlock_admin(&code).await? {
                        println!("manager view unlocked");
                    } else {
                        eprintln!("wrong access code");
                    }
                }
                AdminAction::Lock => {
                    controller.lock_admin().await?;
                    println!("manager view locked");
                }
            }
            controller.shutdown().await
        }
    }
}

async fn run_roster(action: RosterAction, config: FrotaConfig) -> Result<(), FrotaError> {
    let controller = Controller::from_config(config).await?;
    match action {
        RosterAction::Show => {
            for center in controller.snapshot().roster.iter() {
                println!("{}  {}  ({} vehicles)", center.id, center.name, center.vehicles.len());
            }
        }
        RosterAction::Set { file } => {
            let entries: Vec<RosterEntryFile> = read_json_file(&file)?;
            let roster: Vec<ServiceCenter> = entries
                .into_iter()
                .map(|e| ServiceCenter {
                    id: e.id.unwrap_or_default(),
                    name: e.name,
                    vehicles: e.vehicles,
                })
                .collect();
            controller.update_roster(roster).await?;
            println!("roster updated ({} centers)", controller.snapshot().roster.len());
        }
        RosterAction::Publish => {
            controller.publish_roster().await?;
            println!(
                "roster published ({} centers)",
                controller.snapshot().roster.len()
            );
        }
    }
    controller.shutdown().await
}

async fn run_endpoint(action: EndpointAction, config: FrotaConfig) -> Result<(), FrotaError> {
    let controller = Controller::from_config(config).await?;
    match action {
        EndpointAction::Show => {
            let snapshot = controller.snapshot();
            let state = if snapshot.endpoint_configured {
                "usable"
            } else {
                "not configured"
            };
            println!("{}  ({state})", snapshot.endpoint_url);
        }
        EndpointAction::Set { url } => {
            controller.update_endpoint_url(&url).await?;
            let configured = controller.snapshot().endpoint_configured;
            if configured {
                println!("endpoint set");
            } else {
                println!("endpoint saved, but it does not look usable; sync stays off");
            }
        }
    }
    controller.shutdown().await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match frotahub_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            frotahub_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    let command = cli.command.unwrap_or(Commands::Status {
        json: false,
        plain: false,
    });
    if let Err(e) = run_command(command, config).await {
        eprintln!("frotahub: {e}");
        std::process::exit(1);
    }
}
