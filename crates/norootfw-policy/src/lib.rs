//! NoRootFw Policy Store
//!
//! A single table of IP/port filtering rules addressed through
//! `content://<authority>/ip_port_table[/<id>]` references.
//! - Rules are inserted, queried and deleted; never updated in place
//! - Each inserted rule is stamped with the current filtering mode
//! - (ip_address, port, connection_direction) is unique across the table

pub mod contract;
mod error;
mod preferences;
mod reference;
mod rule;
mod selection;
mod store;

pub use contract::{columns, filtering_mode, tables, uris, AUTHORITY, SCHEME};
pub use error::PolicyError;
pub use preferences::{PreferenceSource, StoredPreferences};
pub use reference::{ResourceRef, Route};
pub use rule::{ConnectionDirection, Rule, RuleValues};
pub use selection::Selection;
pub use store::RuleStore;

pub type Result<T> = std::result::Result<T, PolicyError>;
