//! Error types for the tally library.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading, editing or saving items.
#[derive(Error, Debug)]
pub enum TallyError {
    /// The SQLite backend failed
    #[error("Storage error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Item not found for the given ID
    #[error("Item with ID {id} not found")]
    ItemNotFound { id: String },
    /// Subtask not found on the given task
    #[error("Subtask {subtask_id} not found on task {task_id}")]
    SubtaskNotFound { task_id: String, subtask_id: String },
    /// An ID prefix matched more than one item
    #[error("ID prefix '{prefix}' is ambiguous ({matches} matches)")]
    AmbiguousId { prefix: String, matches: usize },
    /// A move that would break the ordering invariants
    #[error("Invalid move: {reason}")]
    InvalidMove { reason: String },
    /// The database directory could not be created
    #[error("Cannot prepare '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// No default data directory could be determined
    #[error("No data directory: {0}")]
    XdgDirectory(String),
    /// Rejected user input: empty labels, unknown days, wrong item kind
    #[error("Invalid value for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    #[error("Could not encode state: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Pairs a context message with a `rusqlite` error.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Finishes the error with the underlying failure.
    pub fn with_source(self, source: rusqlite::Error) -> TallyError {
        TallyError::Database {
            message: self.message,
            source,
        }
    }
}

/// Names the offending field; [`with_reason`](Self::with_reason) finishes it.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn with_reason(self, reason: impl Into<String>) -> TallyError {
        TallyError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl TallyError {
    /// Starts a [`TallyError::Database`].
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Starts a [`TallyError::InvalidInput`] for `field`.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Shorthand for [`TallyError::ItemNotFound`].
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::ItemNotFound { id: id.into() }
    }

    /// Shorthand for [`TallyError::InvalidMove`].
    pub fn invalid_move(reason: impl Into<String>) -> Self {
        Self::InvalidMove {
            reason: reason.into(),
        }
    }
}

/// Adds a context message to raw `rusqlite` results.
pub trait DatabaseResultExt<T> {
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| TallyError::database(message).with_source(e))
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TallyError>;
