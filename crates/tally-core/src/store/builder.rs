//! Builder for creating and configuring SQLite-backed stores.

use std::path::{Path, PathBuf};

use super::Store;
use crate::{
    error::{Result, TallyError},
    kv::SqliteKv,
};

/// Builder for creating and configuring [`Store`] instances on disk.
#[derive(Debug, Clone)]
pub struct StoreBuilder {
    database_path: Option<PathBuf>,
}

impl StoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/tally/tally.db` or `~/.local/share/tally/tally.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Opens the database and loads the persisted state.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::FileSystem` if the parent directory cannot be created
    /// Returns `TallyError::XdgDirectory` if no default path can be determined
    /// Returns `TallyError::Database` if the database cannot be opened
    pub fn build(self) -> Result<Store<SqliteKv>> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TallyError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        log::debug!("Opening store at {}", db_path.display());
        let kv = SqliteKv::open(&db_path)?;
        Ok(Store::open(kv))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("tally")
            .place_data_file("tally.db")
            .map_err(|e| TallyError::XdgDirectory(e.to_string()))
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
