#![allow(dead_code)]

use tally_core::{SqliteKv, Store, StoreBuilder};
use tempfile::TempDir;

/// Helper function to create a store backed by a temporary database
pub fn create_test_store() -> (TempDir, Store<SqliteKv>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let store = StoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .expect("Failed to create store");
    (temp_dir, store)
}

/// Reopens the database in `temp_dir` created by [`create_test_store`]
pub fn reopen_store(temp_dir: &TempDir) -> Store<SqliteKv> {
    StoreBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .build()
        .expect("Failed to reopen store")
}

pub fn labels(store: &Store<SqliteKv>) -> Vec<String> {
    store
        .items()
        .iter()
        .map(|item| item.label().to_string())
        .collect()
}
