//! NoRootFw Storage Layer
//!
//! SQLite persistence for the filtering policy database.
//! The schema is created once at first open and pinned at version 1.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;
pub use migrations::SCHEMA_VERSION;

pub type Result<T> = std::result::Result<T, StorageError>;
