//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] norootfw_storage::StorageError),

    #[error("Policy error: {0}")]
    Policy(#[from] norootfw_policy::PolicyError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown filtering mode: {0}")]
    InvalidFilteringMode(String),
}
