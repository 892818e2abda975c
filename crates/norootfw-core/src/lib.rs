//! NoRootFw Core
//!
//! Wires configuration, logging and the policy database together.

mod backend;
mod config;
mod error;

pub use backend::PolicyBackend;
pub use config::Config;
pub use error::CoreError;

pub use norootfw_policy::{
    columns, filtering_mode, tables, uris, ConnectionDirection, PolicyError, PreferenceSource,
    ResourceRef, Route, Rule, RuleStore, RuleValues, Selection, StoredPreferences,
};
pub use norootfw_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
