//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cannot downgrade database from version {found} to {supported}")]
    Downgrade { found: i32, supported: i32 },
}
