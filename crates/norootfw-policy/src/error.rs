//! Policy store error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    /// The reference does not address a table this store owns.
    #[error("Unsupported URI: {0}")]
    UnsupportedUri(String),

    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("Invalid resource reference: {0}")]
    InvalidReference(#[from] url::ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] norootfw_storage::StorageError),
}
