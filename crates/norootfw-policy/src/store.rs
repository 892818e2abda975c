//! Rule Store
//!
//! Query, insert and delete over `ip_port_table`. Every call is routed
//! through the reference first; an unknown reference is a caller bug and
//! fails before the database is touched.

use std::path::Path;

use rusqlite::params_from_iter;

use norootfw_storage::Database;

use crate::contract::{columns, tables, uris};
use crate::error::PolicyError;
use crate::preferences::PreferenceSource;
use crate::reference::{ResourceRef, Route};
use crate::rule::{Rule, RuleValues};
use crate::selection::Selection;
use crate::Result;

#[derive(Clone)]
pub struct RuleStore<P> {
    /// Shared handle, created once at startup
    db: Database,
    /// Supplies the filtering mode for each insert
    prefs: P,
}

impl<P: PreferenceSource> RuleStore<P> {
    /// Build a ready store over an opened database. Opening the database
    /// creates the rule table on first use.
    pub fn on_create(db: Database, prefs: P) -> Self {
        Self { db, prefs }
    }

    pub fn open<T: AsRef<Path>>(path: T, prefs: P) -> Result<Self> {
        Ok(Self::on_create(Database::open(path)?, prefs))
    }

    pub fn open_in_memory(prefs: P) -> Result<Self> {
        Ok(Self::on_create(Database::open_in_memory()?, prefs))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn preferences(&self) -> &P {
        &self.prefs
    }

    /// Rules matching `selection`, ordered by `sort_order` (an `ORDER BY`
    /// fragment) when given.
    pub fn query(
        &self,
        reference: &ResourceRef,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> Result<Vec<Rule>> {
        let selection = scope(reference, selection.clone())?;

        let mut sql = format!(
            "SELECT {} FROM {}{}",
            Rule::COLUMNS.join(", "),
            tables::IP_PORT_TABLE,
            selection.where_sql()
        );
        if let Some(order) = sort_order.filter(|o| !o.trim().is_empty()) {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        Ok(self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rules = stmt
                .query_map(params_from_iter(selection.args()), Rule::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rules)
        })?)
    }

    /// Resolve a row reference, such as one returned by [`RuleStore::insert`].
    pub fn get(&self, reference: &ResourceRef) -> Result<Option<Rule>> {
        match reference.require_route()? {
            Route::Row(_) => Ok(self
                .query(reference, &Selection::all(), None)?
                .into_iter()
                .next()),
            Route::Table => Err(PolicyError::UnsupportedUri(reference.to_string())),
        }
    }

    /// Insert a rule stamped with the current filtering mode.
    ///
    /// Returns the new row's reference, or `None` if the write failed, most
    /// often because the (ip_address, port, connection_direction) triple
    /// already exists.
    pub fn insert(
        &self,
        reference: &ResourceRef,
        values: RuleValues,
    ) -> Result<Option<ResourceRef>> {
        if reference.require_route()? != Route::Table {
            return Err(PolicyError::UnsupportedUri(reference.to_string()));
        }

        let filtering_mode = self.prefs.filtering_mode();
        let sql = format!(
            "INSERT INTO {} ({}, {}, {}, {}) VALUES (?1, ?2, ?3, ?4)",
            tables::IP_PORT_TABLE,
            columns::FILTERING_MODE,
            columns::IP_ADDRESS,
            columns::PORT,
            columns::CONNECTION_DIRECTION
        );

        let inserted = self.db.with_connection(|conn| {
            conn.execute(
                &sql,
                rusqlite::params![
                    filtering_mode,
                    values.ip_address,
                    values.port,
                    values.connection_direction,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        });

        match inserted {
            Ok(id) => {
                tracing::debug!(
                    rule_id = id,
                    filtering_mode = %filtering_mode,
                    direction = %values.connection_direction,
                    "Inserted rule"
                );
                Ok(Some(uris::ip_port_table().with_appended_id(id)))
            }
            Err(e) => {
                tracing::warn!("Failed to insert a new item: {}", e);
                Ok(None)
            }
        }
    }

    /// Delete matching rules and return how many went. Zero is not an error.
    pub fn delete(&self, reference: &ResourceRef, selection: &Selection) -> Result<usize> {
        let selection = scope(reference, selection.clone())?;
        let sql = format!(
            "DELETE FROM {}{}",
            tables::IP_PORT_TABLE,
            selection.where_sql()
        );

        let deleted = self.db.with_connection(|conn| {
            Ok(conn.execute(&sql, params_from_iter(selection.args()))?)
        })?;

        if deleted == 0 {
            tracing::warn!("No items deleted");
        }
        Ok(deleted)
    }

    /// Rules are immutable; delete and insert again instead.
    pub fn update(
        &self,
        _reference: &ResourceRef,
        _values: RuleValues,
        _selection: &Selection,
    ) -> Result<usize> {
        Err(PolicyError::Unsupported("update"))
    }

    pub fn get_type(&self, _reference: &ResourceRef) -> Result<String> {
        Err(PolicyError::Unsupported("get_type"))
    }
}

/// Route `reference` and narrow `selection` to a single row if it names one.
fn scope(reference: &ResourceRef, selection: Selection) -> Result<Selection> {
    Ok(match reference.require_route()? {
        Route::Table => selection,
        Route::Row(id) => selection.and_id(id),
    })
}
