//! Public contract of the policy store: authority, table and column names.

use crate::reference::ResourceRef;

pub const AUTHORITY: &str = "com.norootfw.db.PolicyDataProvider";
pub const SCHEME: &str = "content";

pub mod tables {
    pub const IP_PORT_TABLE: &str = "ip_port_table";
}

pub mod columns {
    pub const ID: &str = "_id";
    /// Black or white list. Set by the store on insert, never by callers.
    pub const FILTERING_MODE: &str = "filtering_mode";
    pub const IP_ADDRESS: &str = "ip_address";
    pub const PORT: &str = "port";
    pub const CONNECTION_DIRECTION: &str = "connection_direction";
}

pub mod filtering_mode {
    pub const BLACKLIST: &str = "blacklist";
    pub const WHITELIST: &str = "whitelist";
}

pub mod uris {
    use super::*;

    /// `content://com.norootfw.db.PolicyDataProvider/ip_port_table`
    pub fn ip_port_table() -> ResourceRef {
        ResourceRef::new(SCHEME, AUTHORITY, [tables::IP_PORT_TABLE])
    }
}
