use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use super::SqliteInitError;

/// Applies pending schema versions inside one transaction each.
pub(super) fn run_migrations(conn: &mut Connection) -> Result<(), SqliteInitError> {
    fn is_applied(conn: &Connection, version: i64) -> Result<bool, rusqlite::Error> {
        let row: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM schema_migrations WHERE version = ?1",
                params![version],
                |row| row.get(0),
            )
            .optional()?;
        Ok(row.is_some())
    }

    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );
        ",
    )?;

    // Version 1: key/value blobs.
    if !is_applied(conn, 1)? {
        let tx = conn.transaction()?;
        tx.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![1_i64, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
        tracing::debug!(version = 1, "applied sqlite migration");
    }

    Ok(())
}
