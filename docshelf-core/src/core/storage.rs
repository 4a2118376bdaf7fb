//! SQLite-backed key-value storage.

use crate::{DocshelfError, Result, StorageBackend};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// A [`StorageBackend`] that keeps every key in one row of a `kv_store` table.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Creates (or reuses) a database at `path` and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`DocshelfError::Database`] if the file cannot be opened or the
    /// schema cannot be applied.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Opens an existing database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DocshelfError::InvalidStorage`] if the file has no `kv_store`
    /// table, or [`DocshelfError::Database`] for any SQLite failure.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = 'kv_store'",
            [],
            |row| row.get(0),
        )?;

        if table_count != 1 {
            return Err(DocshelfError::InvalidStorage(
                "Not a valid Docshelf database".to_string(),
            ));
        }

        Ok(Self { conn })
    }

    /// An in-memory database, discarded on drop.
    ///
    /// # Errors
    ///
    /// Returns [`DocshelfError::Database`] if SQLite cannot allocate it.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl StorageBackend for SqliteBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(())
    }
}
