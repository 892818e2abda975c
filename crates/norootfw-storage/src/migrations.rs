//! Schema creation and versioning
//!
//! The policy database is created at version 1 and never migrated. Opening a
//! database written by a newer build is refused.

use crate::error::StorageError;
use crate::Result;
use rusqlite::{Connection, OptionalExtension};

pub const SCHEMA_VERSION: i32 = 1;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(StorageError::Downgrade {
            found: current_version,
            supported: SCHEMA_VERSION,
        });
    }

    if current_version == SCHEMA_VERSION {
        return Ok(());
    }

    if current_version == 0 {
        on_create(conn)?;
    } else {
        on_upgrade(conn, current_version, SCHEMA_VERSION)?;
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !has_table {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
            [],
        )?;
        conn.execute("INSERT INTO schema_version (version) VALUES (0)", [])?;
        return Ok(0);
    }

    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

fn on_create(conn: &Connection) -> Result<()> {
    tracing::info!(version = SCHEMA_VERSION, "Creating policy schema");

    // One row per filtering rule; filtering_mode is stamped by the rule store
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS ip_port_table (
            _id INTEGER PRIMARY KEY,
            filtering_mode TEXT NOT NULL,
            ip_address TEXT,
            port INTEGER,
            connection_direction TEXT NOT NULL,
            UNIQUE(ip_address, port, connection_direction)
        );
    "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
    )?;

    Ok(())
}

/// Upgrade hook. No migration exists past version 1, so this only records
/// that it was reached.
fn on_upgrade(_conn: &Connection, old_version: i32, new_version: i32) -> Result<()> {
    tracing::debug!(old_version, new_version, "No schema upgrade defined");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i32>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn test_fresh_database_gets_schema() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert!(table_exists(&conn, "ip_port_table"));
        assert!(table_exists(&conn, "settings"));
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO ip_port_table (filtering_mode, ip_address, port, connection_direction)
             VALUES ('blacklist', '10.0.0.1', 80, 'outbound')",
            [],
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let count: i32 = conn
            .query_row("SELECT COUNT(*) FROM ip_port_table", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_unique_triple_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let insert = "INSERT INTO ip_port_table (filtering_mode, ip_address, port, connection_direction)
                      VALUES (?1, '10.0.0.1', 80, 'outbound')";
        conn.execute(insert, ["blacklist"]).unwrap();
        assert!(conn.execute(insert, ["whitelist"]).is_err());
    }

    #[test]
    fn test_newer_version_is_refused() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        set_schema_version(&conn, SCHEMA_VERSION + 1).unwrap();

        match run_migrations(&conn) {
            Err(StorageError::Downgrade { found, supported }) => {
                assert_eq!(found, SCHEMA_VERSION + 1);
                assert_eq!(supported, SCHEMA_VERSION);
            }
            other => panic!("expected downgrade error, got {:?}", other),
        }
    }

    #[test]
    fn test_upgrade_hook_leaves_schema_untouched() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute("DROP TABLE settings", []).unwrap();

        on_upgrade(&conn, SCHEMA_VERSION, SCHEMA_VERSION + 1).unwrap();

        assert!(!table_exists(&conn, "settings"));
        assert!(table_exists(&conn, "ip_port_table"));
    }

    #[test]
    fn test_broken_version_table_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE schema_version (v INTEGER NOT NULL)", [])
            .unwrap();

        assert!(matches!(
            run_migrations(&conn),
            Err(StorageError::Sqlite(_))
        ));
        assert!(!table_exists(&conn, "ip_port_table"));
    }

    #[test]
    fn test_empty_version_table_means_fresh() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE schema_version (version INTEGER NOT NULL)", [])
            .unwrap();

        run_migrations(&conn).unwrap();

        assert!(table_exists(&conn, "ip_port_table"));
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
