// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service-center roster persistence.
//!
//! The roster is small and always replaced as a whole; `position` preserves
//! the administrator's ordering across reloads.

use frotahub_core::types::ServiceCenter;
use frotahub_core::FrotaError;
use rusqlite::params;

use crate::database::Database;

fn from_sql_row(row: &rusqlite::Row<'_>) -> Result<ServiceCenter, rusqlite::Error> {
    let vehicles_raw: String = row.get(2)?;
    Ok(ServiceCenter {
        id: row.get(0)?,
        name: row.get(1)?,
        vehicles: serde_json::from_str(&vehicles_raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?,
    })
}

/// The full roster in stored (administrator-defined) order.
pub async fn load_roster(db: &Database) -> Result<Vec<ServiceCenter>, FrotaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, vehicles FROM service_centers ORDER BY position ASC",
            )?;
            let rows = stmt.query_map([], from_sql_row)?;
            let mut centers = Vec::new();
            for row in rows {
                centers.push(row?);
            }
            Ok(centers)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Replace the entire roster in one transaction.
pub async fn replace_roster(db: &Database, roster: &[ServiceCenter]) -> Result<(), FrotaError> {
    let rows: Vec<(String, String, String)> = roster
        .iter()
        .map(|c| {
            let vehicles = serde_json::to_string(&c.vehicles).map_err(|e| FrotaError::Storage {
                source: Box::new(e),
            })?;
            Ok((c.id.clone(), c.name.clone(), vehicles))
        })
        .collect::<Result<_, FrotaError>>()?;
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM service_centers", [])?;
            for (position, (id, name, vehicles)) in rows.iter().enumerate() {
                tx.execute(
                    "INSERT INTO service_centers (id, name, vehicles, position) \
                     VALUES (?1, ?2, ?3, ?4)",
                    params![id, name, vehicles, position as i64],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
