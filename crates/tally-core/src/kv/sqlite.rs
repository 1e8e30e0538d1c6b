//! SQLite-backed key-value store.

use std::path::Path;

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension};

use super::KeyValueStore;
use crate::error::{DatabaseResultExt, Result};

/// Key-value store persisted in a single SQLite table.
pub struct SqliteKv {
    connection: Connection,
}

impl SqliteKv {
    /// Opens (or creates) the database file and initializes the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        Self::from_connection(connection)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        let schema_sql = include_str!("../../assets/schema.sql");
        connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;
        Ok(Self { connection })
    }

    fn upsert(connection: &Connection, key: &str, value: &str) -> Result<()> {
        connection
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, Timestamp::now().to_string()],
            )
            .db_context("Failed to write key")?;
        Ok(())
    }
}

impl KeyValueStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.connection
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .db_context("Failed to read key")
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        Self::upsert(&self.connection, key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.connection
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .db_context("Failed to remove key")?;
        Ok(())
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to start transaction")?;
        for (key, value) in entries {
            Self::upsert(&tx, key, value)?;
        }
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }
}
