// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value settings persistence (sync endpoint URL, admin flag, ...).

use frotahub_core::FrotaError;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;

/// Fetch a setting; `None` when the key was never written.
pub async fn get_setting(db: &Database, key: &str) -> Result<Option<String>, FrotaError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM settings WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Create or overwrite a setting.
pub async fn set_setting(db: &Database, key: &str, value: &str) -> Result<(), FrotaError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn settings_get_set_overwrite() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("settings.db").to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(get_setting(&db, "fleet_sync_url").await.unwrap(), None);

        set_setting(&db, "fleet_sync_url", "https://example.com/exec")
            .await
            .unwrap();
        assert_eq!(
            get_setting(&db, "fleet_sync_url").await.unwrap().as_deref(),
            Some("https://example.com/exec")
        );

        set_setting(&db, "fleet_sync_url", "https://other.example/exec")
            .await
            .unwrap();
        assert_eq!(
            get_setting(&db, "fleet_sync_url").await.unwrap().as_deref(),
            Some("https://other.example/exec")
        );

        db.close().await.unwrap();
    }
}
