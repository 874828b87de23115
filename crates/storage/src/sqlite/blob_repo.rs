use chrono::Utc;
use rusqlite::{ErrorCode, OptionalExtension, params};

use crate::repository::{BlobStore, StorageError};

use super::SqliteBlobStore;

fn map_err(err: rusqlite::Error) -> StorageError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::DiskFull => {
            StorageError::Unavailable("database is full".into())
        }
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ReadOnly => {
            StorageError::Unavailable("database is read-only".into())
        }
        rusqlite::Error::FromSqlConversionFailure(..) | rusqlite::Error::InvalidColumnType(..) => {
            StorageError::Serialization(err.to_string())
        }
        _ => StorageError::Connection(err.to_string()),
    }
}

impl BlobStore for SqliteBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(map_err)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        conn.execute(
            r"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
            params![key, value, Utc::now().to_rfc3339()],
        )
        .map_err(map_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(map_err)?;
        Ok(())
    }
}
