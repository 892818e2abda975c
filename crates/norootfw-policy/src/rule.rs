//! Filtering rule records

use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::contract::columns;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionDirection {
    Inbound,
    Outbound,
}

impl ConnectionDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionDirection::Inbound => "inbound",
            ConnectionDirection::Outbound => "outbound",
        }
    }
}

impl std::fmt::Display for ConnectionDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConnectionDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inbound" => Ok(ConnectionDirection::Inbound),
            "outbound" => Ok(ConnectionDirection::Outbound),
            _ => Err(format!("Unknown connection direction: {}", s)),
        }
    }
}

impl From<ConnectionDirection> for String {
    fn from(direction: ConnectionDirection) -> Self {
        direction.as_str().to_string()
    }
}

/// A persisted rule. Rows are never updated; change a rule by deleting and
/// inserting it again.
///
/// Fields mirror the column types, so rows written by other clients of the
/// database (any integer port, any direction text) still read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: i64,
    /// Mode in effect when the rule was inserted
    pub filtering_mode: String,
    pub ip_address: Option<String>,
    pub port: Option<i64>,
    pub connection_direction: String,
}

impl Rule {
    pub(crate) const COLUMNS: [&'static str; 5] = [
        columns::ID,
        columns::FILTERING_MODE,
        columns::IP_ADDRESS,
        columns::PORT,
        columns::CONNECTION_DIRECTION,
    ];

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(columns::ID)?,
            filtering_mode: row.get(columns::FILTERING_MODE)?,
            ip_address: row.get(columns::IP_ADDRESS)?,
            port: row.get(columns::PORT)?,
            connection_direction: row.get(columns::CONNECTION_DIRECTION)?,
        })
    }

    /// The direction, if it is one this crate knows.
    pub fn direction(&self) -> Option<ConnectionDirection> {
        self.connection_direction.parse().ok()
    }
}

/// Insert candidate. The filtering mode is not part of it: the store stamps
/// it from the current preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleValues {
    pub ip_address: Option<String>,
    pub port: Option<i64>,
    pub connection_direction: String,
}

impl RuleValues {
    pub fn new(connection_direction: impl Into<String>) -> Self {
        Self {
            ip_address: None,
            port: None,
            connection_direction: connection_direction.into(),
        }
    }

    pub fn ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(i64::from(port));
        self
    }
}

/// Drops `id` and `filtering_mode`; both are assigned on insert.
impl From<Rule> for RuleValues {
    fn from(rule: Rule) -> Self {
        Self {
            ip_address: rule.ip_address,
            port: rule.port,
            connection_direction: rule.connection_direction,
        }
    }
}
