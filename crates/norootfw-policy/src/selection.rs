//! Row predicates: a SQL `WHERE` fragment with `?` placeholders and the
//! values bound to them.

use rusqlite::types::Value;

use crate::contract::columns;
use crate::rule::ConnectionDirection;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    clause: Option<String>,
    args: Vec<Value>,
}

impl Selection {
    /// Matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<I, V>(clause: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            clause: Some(clause.into()),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn by_id(id: i64) -> Self {
        Self::new(format!("{} = ?", columns::ID), [id])
    }

    pub fn by_direction(direction: ConnectionDirection) -> Self {
        Self::new(
            format!("{} = ?", columns::CONNECTION_DIRECTION),
            [direction.as_str().to_string()],
        )
    }

    /// Matches the unique (ip_address, port, connection_direction) triple.
    /// `None` fields match NULL.
    pub fn by_triple(
        ip_address: Option<&str>,
        port: Option<u16>,
        direction: ConnectionDirection,
    ) -> Self {
        let ip: Value = ip_address.map(str::to_string).into();
        let port: Value = port.map(i64::from).into();
        Self::new(
            format!(
                "{} IS ? AND {} IS ? AND {} = ?",
                columns::IP_ADDRESS,
                columns::PORT,
                columns::CONNECTION_DIRECTION
            ),
            [ip, port, Value::from(direction.as_str().to_string())],
        )
    }

    pub fn clause(&self) -> Option<&str> {
        self.clause.as_deref()
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// AND this selection with `_id = <id>`, as used by row references.
    pub(crate) fn and_id(self, id: i64) -> Self {
        let mut args = vec![Value::Integer(id)];
        let clause = match self.clause {
            Some(clause) if !clause.trim().is_empty() => {
                args.extend(self.args);
                format!("{} = ? AND ({})", columns::ID, clause)
            }
            _ => format!("{} = ?", columns::ID),
        };

        Self {
            clause: Some(clause),
            args,
        }
    }

    /// Render as ` WHERE ...`, or an empty string for "all rows".
    pub(crate) fn where_sql(&self) -> String {
        match self.clause.as_deref() {
            Some(clause) if !clause.trim().is_empty() => format!(" WHERE {}", clause),
            _ => String::new(),
        }
    }
}
