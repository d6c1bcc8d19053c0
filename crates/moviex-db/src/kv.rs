//! Key-value persistence on the `kv_store` table.

use anyhow::{Context, Result};
use moviex_core::{KeyValueStore, PersistenceError};
use rusqlite::{Connection, OptionalExtension};

use crate::layout::StorageLayout;
use crate::migrations::run_migrations;

/// Durable [`KeyValueStore`] backed by `SQLite`.
///
/// Each `set`/`remove` is a single autocommitted statement, so it is durable
/// when the call returns.
#[derive(Debug)]
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Wraps an already migrated connection.
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) the database in the layout's data directory and
    /// brings its schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created, or the
    /// database cannot be opened or migrated.
    pub fn open(layout: &StorageLayout) -> Result<Self> {
        let data_dir = layout.data_dir();
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let db_path = layout.database_file();
        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open favorites database {}", db_path.display()))?;
        run_migrations(&conn).context("database migration failed")?;

        tracing::debug!(path = %db_path.display(), "Opened key-value store");
        Ok(Self::new(conn))
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| PersistenceError::Read {
                key: String::from(key),
                message: e.to_string(),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                rusqlite::params![key, value],
            )
            .map_err(|e| PersistenceError::Write {
                key: String::from(key),
                message: e.to_string(),
            })?;

        tracing::debug!(key, "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", rusqlite::params![key])
            .map_err(|e| PersistenceError::Write {
                key: String::from(key),
                message: e.to_string(),
            })?;
        Ok(())
    }
}
