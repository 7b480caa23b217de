// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the store, sync engine, and controller.
//!
//! Field names serialize as camelCase because the wire contract with the
//! spreadsheet-script receiver is fixed; do not rename serialized fields.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Local bookkeeping flag for a submission's sync lifecycle.
///
/// `Synced` means a push attempt completed without a local transport error.
/// The receiver is a one-way no-cors sink, so this is NOT a delivery receipt.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
}

/// Per-vehicle status line in a daily report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStatus {
    pub plate: String,
    pub category: String,
    pub running: bool,
    /// Free-text justification, required by convention when `running` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

/// Spot-capacity offer counts, keyed by a closed set of vehicle classes.
///
/// The key set is fixed by the receiver's sheet columns; counts are
/// non-negative by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpotOffers {
    pub bulk_van: u32,
    pub bulk_vuc: u32,
    pub utilitarios: u32,
    pub van: u32,
    pub veiculo_passeio: u32,
    pub vuc: u32,
}

impl SpotOffers {
    /// Total offered vehicles across all classes.
    pub fn total(&self) -> u32 {
        self.bulk_van
            + self.bulk_vuc
            + self.utilitarios
            + self.van
            + self.veiculo_passeio
            + self.vuc
    }
}

/// Free-text incident description plus opaque media handles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalProblem {
    pub description: String,
    #[serde(default)]
    pub media: Vec<String>,
}

/// One reported status for one service center on one operational day.
///
/// Business fields are immutable after creation; only `sync_status`
/// transitions (pending -> synced) over the record's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Opaque unique identifier assigned at creation.
    pub id: String,
    /// Creation instant on the submitting device's clock (RFC 3339).
    pub timestamp: String,
    /// Calendar day the report describes. May arrive as a bare `YYYY-MM-DD`
    /// or a full date-time string; compare via [`Submission::operational_day`].
    pub operational_date: String,
    /// Foreign key into the service-center roster. Not validated against the
    /// roster at write time; roster and submissions are independently mutable.
    pub service_center_id: String,
    pub fleet_status: Vec<VehicleStatus>,
    pub spot_offers: SpotOffers,
    pub problems: OperationalProblem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_acceptance: Option<String>,
    #[serde(default)]
    pub sync_status: SyncStatus,
}

impl Submission {
    /// The operational date truncated to its day portion.
    ///
    /// All date-based filtering and grouping must use this form, never the
    /// raw string, so `"2024-05-01T10:00:00Z"` and `"2024-05-01"` land in
    /// the same day bucket.
    pub fn operational_day(&self) -> &str {
        normalize_day(&self.operational_date)
    }
}

/// Truncate a date or date-time string to its bare `YYYY-MM-DD` portion.
pub fn normalize_day(raw: &str) -> &str {
    raw.split_once('T').map_or(raw, |(day, _)| day)
}

/// A rostered vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub plate: String,
    pub category: String,
}

/// Roster entry for one service center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCenter {
    /// Stable identifier, derived from the name at creation time. A rename
    /// does not change the id unless the record is recreated.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

impl ServiceCenter {
    /// Create a roster entry, deriving a stable id from the display name.
    pub fn new(name: &str, vehicles: Vec<Vehicle>) -> Self {
        Self {
            id: slug_id(name),
            name: name.to_uppercase(),
            vehicles,
        }
    }
}

/// Derive an id slug from a display name (lowercase, non-alphanumerics folded to `-`).
pub fn slug_id(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Tagged payload for the remote push endpoint.
///
/// Serializes as `{"type":"report","data":...}` or
/// `{"type":"config_update","data":...}` -- the exact shape the
/// spreadsheet-script receiver dispatches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PushEnvelope {
    Report(Submission),
    ConfigUpdate(Vec<ServiceCenter>),
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterType {
    Storage,
    Transport,
}
