// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submission persistence operations.
//!
//! Submissions are stored with their structured fields (fleet status, spot
//! offers, problems) as JSON columns; rowid order is the insertion order the
//! sync engine drains in.

use frotahub_core::types::{Submission, SyncStatus};
use frotahub_core::FrotaError;
use rusqlite::params;

use crate::database::Database;

/// A submission flattened to SQL-ready column values.
///
/// JSON serialization happens before entering the connection's call closure
/// so serialization failures surface as storage errors, not panics on the
/// writer thread.
struct SubmissionRow {
    id: String,
    created_at: String,
    operational_date: String,
    service_center_id: String,
    fleet_status: String,
    spot_offers: String,
    problems: String,
    weekly_acceptance: Option<String>,
    sync_status: String,
}

fn to_row(sub: &Submission) -> Result<SubmissionRow, FrotaError> {
    let json_err = |e: serde_json::Error| FrotaError::Storage {
        source: Box::new(e),
    };
    Ok(SubmissionRow {
        id: sub.id.clone(),
        created_at: sub.timestamp.clone(),
        operational_date: sub.operational_date.clone(),
        service_center_id: sub.service_center_id.clone(),
        fleet_status: serde_json::to_string(&sub.fleet_status).map_err(json_err)?,
        spot_offers: serde_json::to_string(&sub.spot_offers).map_err(json_err)?,
        problems: serde_json::to_string(&sub.problems).map_err(json_err)?,
        weekly_acceptance: sub.weekly_acceptance.clone(),
        sync_status: sub.sync_status.to_string(),
    })
}

fn parse_json_col<T: serde::de::DeserializeOwned>(
    idx: usize,
    raw: &str,
) -> Result<T, rusqlite::Error> {
    serde_json::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Map a SELECTed row (fixed column order, see `SELECT_COLUMNS`) back into a domain value.
fn from_sql_row(row: &rusqlite::Row<'_>) -> Result<Submission, rusqlite::Error> {
    use std::str::FromStr;

    let fleet_raw: String = row.get(4)?;
    let offers_raw: String = row.get(5)?;
    let problems_raw: String = row.get(6)?;
    let status_raw: String = row.get(8)?;

    Ok(Submission {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        operational_date: row.get(2)?,
        service_center_id: row.get(3)?,
        fleet_status: parse_json_col(4, &fleet_raw)?,
        spot_offers: parse_json_col(5, &offers_raw)?,
        problems: parse_json_col(6, &problems_raw)?,
        weekly_acceptance: row.get(7)?,
        sync_status: SyncStatus::from_str(&status_raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?,
    })
}

const SELECT_COLUMNS: &str = "id, created_at, operational_date, service_center_id, \
     fleet_status, spot_offers, problems, weekly_acceptance, sync_status";

const INSERT_SQL: &str = "INSERT INTO submissions \
     (id, created_at, operational_date, service_center_id, fleet_status, \
      spot_offers, problems, weekly_acceptance, sync_status) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

fn insert_row(conn: &rusqlite::Connection, row: &SubmissionRow) -> Result<(), rusqlite::Error> {
    conn.execute(
        INSERT_SQL,
        params![
            row.id,
            row.created_at,
            row.operational_date,
            row.service_center_id,
            row.fleet_status,
            row.spot_offers,
            row.problems,
            row.weekly_acceptance,
            row.sync_status,
        ],
    )?;
    Ok(())
}

/// Persist a new submission. The record lands exactly as passed in; callers
/// set `sync_status` (new reports arrive as `pending`).
pub async fn save(db: &Database, submission: &Submission) -> Result<(), FrotaError> {
    let row = to_row(submission)?;
    db.connection()
        .call(move |conn| {
            insert_row(conn, &row)?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Every stored submission, newest first (descending insertion order).
pub async fn get_all(db: &Database) -> Result<Vec<Submission>, FrotaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM submissions ORDER BY rowid DESC"
            ))?;
            let rows = stmt.query_map([], from_sql_row)?;
            let mut submissions = Vec::new();
            for row in rows {
                submissions.push(row?);
            }
            Ok(submissions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Pending submissions in insertion order -- the order the sync engine
/// drains them in.
pub async fn get_pending(db: &Database) -> Result<Vec<Submission>, FrotaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM submissions \
                 WHERE sync_status = 'pending' ORDER BY rowid ASC"
            ))?;
            let rows = stmt.query_map([], from_sql_row)?;
            let mut submissions = Vec::new();
            for row in rows {
                submissions.push(row?);
            }
            Ok(submissions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Transition one submission to `synced`.
///
/// Idempotent: marking an already-synced or unknown id updates zero rows and
/// is not an error.
pub async fn mark_synced(db: &Database, id: &str) -> Result<(), FrotaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE submissions SET sync_status = 'synced' WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Wholesale-replace the stored list with a remote snapshot, in one
/// transaction. On any failure the prior local data is left intact.
pub async fn replace_all(db: &Database, submissions: &[Submission]) -> Result<(), FrotaError> {
    let rows: Vec<SubmissionRow> = submissions
        .iter()
        .map(to_row)
        .collect::<Result<_, FrotaError>>()?;
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM submissions", [])?;
            for row in &rows {
                insert_row(&tx, row)?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use frotahub_core::types::{OperationalProblem, SpotOffers};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_submission(id: &str, day: &str) -> Submission {
        Submission {
            id: id.to_string(),
            timestamp: format!("{day}T18:30:00Z"),
            operational_date: day.to_string(),
            service_center_id: "centro-norte".to_string(),
            fleet_status: vec![],
            spot_offers: SpotOffers {
                vuc: 3,
                ..SpotOffers::default()
            },
            problems: OperationalProblem {
                description: "sem ocorrencias".to_string(),
                media: vec![],
            },
            weekly_acceptance: None,
            sync_status: SyncStatus::Pending,
        }
    }

    #[tokio::test]
    async fn save_is_durable_and_pending() {
        let (db, _dir) = setup_db().await;
        let sub = make_submission("s1", "2024-05-01");

        save(&db, &sub).await.unwrap();

        let all = get_all(&db).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "s1");
        assert_eq!(all[0].sync_status, SyncStatus::Pending);
        assert_eq!(all[0].spot_offers.vuc, 3);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_all_is_newest_first() {
        let (db, _dir) = setup_db().await;
        for (i, day) in ["2024-05-01", "2024-05-02", "2024-05-03"].iter().enumerate() {
            save(&db, &make_submission(&format!("s{i}"), day)).await.unwrap();
        }

        let all = get_all(&db).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, "s2");
        assert_eq!(all[2].id, "s0");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_pending_is_insertion_order() {
        let (db, _dir) = setup_db().await;
        for i in 0..3 {
            save(&db, &make_submission(&format!("s{i}"), "2024-05-01"))
                .await
                .unwrap();
        }
        mark_synced(&db, "s1").await.unwrap();

        let pending = get_pending(&db).await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, "s0");
        assert_eq!(pending[1].id, "s2");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mark_synced_is_idempotent() {
        let (db, _dir) = setup_db().await;
        save(&db, &make_submission("s1", "2024-05-01")).await.unwrap();

        mark_synced(&db, "s1").await.unwrap();
        mark_synced(&db, "s1").await.unwrap();

        let all = get_all(&db).await.unwrap();
        assert_eq!(all.len(), 1, "no duplication from double mark");
        assert_eq!(all[0].sync_status, SyncStatus::Synced);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mark_synced_unknown_id_is_a_noop() {
        let (db, _dir) = setup_db().await;
        mark_synced(&db, "no-such-id").await.unwrap();
        assert!(get_all(&db).await.unwrap().is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn replace_all_swaps_not_merges() {
        let (db, _dir) = setup_db().await;
        save(&db, &make_submission("local-1", "2024-05-01"))
            .await
            .unwrap();
        save(&db, &make_submission("local-2", "2024-05-01"))
            .await
            .unwrap();

        let mut remote = make_submission("remote-1", "2024-05-02");
        remote.sync_status = SyncStatus::Synced;
        replace_all(&db, &[remote]).await.unwrap();

        let all = get_all(&db).await.unwrap();
        assert_eq!(all.len(), 1, "mirror equals the remote list exactly");
        assert_eq!(all[0].id, "remote-1");
        assert_eq!(all[0].sync_status, SyncStatus::Synced);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn replace_all_with_empty_list_clears_store() {
        let (db, _dir) = setup_db().await;
        save(&db, &make_submission("s1", "2024-05-01")).await.unwrap();
        replace_all(&db, &[]).await.unwrap();
        assert!(get_all(&db).await.unwrap().is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn structured_fields_roundtrip_through_json_columns() {
        use frotahub_core::types::VehicleStatus;

        let (db, _dir) = setup_db().await;
        let mut sub = make_submission("s1", "2024-05-01");
        sub.fleet_status = vec![VehicleStatus {
            plate: "ABC1D23".to_string(),
            category: "Van".to_string(),
            running: false,
            justification: Some("pneu furado".to_string()),
        }];
        sub.problems.media = vec!["data:image/jpeg;base64,xxxx".to_string()];
        sub.weekly_acceptance = Some("data:image/png;base64,yyyy".to_string());

        save(&db, &sub).await.unwrap();
        let all = get_all(&db).await.unwrap();
        assert_eq!(all[0], sub);

        db.close().await.unwrap();
    }
}
