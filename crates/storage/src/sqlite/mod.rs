use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use thiserror::Error;

use crate::repository::{BlobStore, Storage};

mod blob_repo;
mod migrate;

/// Blob store backed by a single `SQLite` database file.
#[derive(Clone)]
pub struct SqliteBlobStore {
    conn: Arc<Mutex<Connection>>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("connection lock poisoned")]
    Poisoned,
}

impl SqliteBlobStore {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the file cannot be opened or the pragmas fail.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteInitError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if `SQLite` cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, SqliteInitError> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration statements fail.
    pub fn migrate(&self) -> Result<(), SqliteInitError> {
        let mut conn = self.conn.lock().map_err(|_| SqliteInitError::Poisoned)?;
        migrate::run_migrations(&mut conn)
    }
}

impl Storage {
    /// Build a `Storage` backed by `SQLite` at `path`, migrated and ready.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if opening or migrating fails.
    pub fn sqlite(path: impl AsRef<Path>) -> Result<Self, SqliteInitError> {
        let repo = SqliteBlobStore::open(path)?;
        repo.migrate()?;
        let blobs: Arc<dyn BlobStore> = Arc::new(repo);
        Ok(Self { blobs })
    }
}
