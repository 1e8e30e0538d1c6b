//! Key-value persistence backends.
//!
//! The store serializes its whole state into a handful of JSON documents and
//! hands them to a [`KeyValueStore`]. Two backends ship with the crate:
//!
//! - [`MemoryKv`]: a `HashMap`, for tests and embedding
//! - [`SqliteKv`]: a single-table SQLite database, used by the CLI

use crate::error::Result;

mod memory;
mod sqlite;

pub use memory::MemoryKv;
pub use sqlite::SqliteKv;

/// String-keyed storage of UTF-8 text values.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Stores several entries. Backends with transactions write them
    /// atomically.
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}
