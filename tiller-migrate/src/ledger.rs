//! Applied-unit bookkeeping.
//!
//! Each runner keeps its own ledger table: `migrations` for schema changes
//! and `seeders` for reference data. A row means "this unit's forward change
//! succeeded and has not been reverted". The ledger is authoritative; the
//! actual schema is never inspected.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use tracing::trace;

use crate::error::{MigrateResult, MigrationError};
use crate::naming::is_sql_identifier;

/// Name of the ledger table and its timestamp column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerTable {
    table: String,
    timestamp_column: String,
}

impl LedgerTable {
    /// A ledger table with custom names.
    ///
    /// Both names must be plain SQL identifiers.
    pub fn new(table: impl Into<String>, timestamp_column: impl Into<String>) -> MigrateResult<Self> {
        let table = table.into();
        let timestamp_column = timestamp_column.into();

        for name in [&table, &timestamp_column] {
            if !is_sql_identifier(name) {
                return Err(MigrationError::configuration(format!(
                    "'{}' is not a valid ledger identifier",
                    name
                )));
            }
        }
        if timestamp_column == "id" || timestamp_column == "file_path" {
            return Err(MigrationError::configuration(format!(
                "ledger timestamp column cannot be named '{}'",
                timestamp_column
            )));
        }

        Ok(Self {
            table,
            timestamp_column,
        })
    }

    /// The schema migration ledger: `migrations(id, file_path, migration_date)`.
    pub fn migrations() -> Self {
        Self {
            table: "migrations".to_string(),
            timestamp_column: "migration_date".to_string(),
        }
    }

    /// The seed data ledger: `seeders(id, file_path, seed_date)`.
    pub fn seeders() -> Self {
        Self {
            table: "seeders".to_string(),
            timestamp_column: "seed_date".to_string(),
        }
    }

    /// The table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The timestamp column name.
    pub fn timestamp_column(&self) -> &str {
        &self.timestamp_column
    }
}

/// One persisted ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Surrogate key.
    pub id: i64,
    /// The unit path recorded when the unit was applied.
    pub unit_path: String,
    /// Unix timestamp of the application.
    pub applied_at: i64,
}

impl LedgerEntry {
    /// The application time as a UTC datetime.
    pub fn applied_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.applied_at, 0)
    }
}

/// Ledger operations over one connection.
///
/// `is_applied` followed by `mark_applied` is only safe against concurrent
/// runners when both happen inside the same write transaction; the runner
/// takes care of that.
pub struct LedgerStore<'c> {
    conn: &'c Connection,
    table: &'c LedgerTable,
}

impl<'c> LedgerStore<'c> {
    /// Bind a ledger table to a connection.
    pub fn new(conn: &'c Connection, table: &'c LedgerTable) -> Self {
        Self { conn, table }
    }

    /// Create the ledger table if it does not exist.
    pub fn ensure_table_exists(&self) -> MigrateResult<()> {
        let sql = format!(
            r#"CREATE TABLE IF NOT EXISTS "{}" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_path TEXT NOT NULL,
    "{}" INTEGER NOT NULL
)"#,
            self.table.table, self.table.timestamp_column
        );
        self.conn.execute_batch(&sql)?;
        Ok(())
    }

    /// Check whether `unit_path` has a ledger row.
    pub fn is_applied(&self, unit_path: &str) -> MigrateResult<bool> {
        let sql = format!(
            r#"SELECT COUNT(*) FROM "{}" WHERE file_path = ?1"#,
            self.table.table
        );
        let count: i64 = self
            .conn
            .query_row(&sql, params![unit_path], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Record `unit_path` as applied now.
    ///
    /// Does not check for an existing row.
    pub fn mark_applied(&self, unit_path: &str) -> MigrateResult<()> {
        let sql = format!(
            r#"INSERT INTO "{}" (file_path, "{}") VALUES (?1, ?2)"#,
            self.table.table, self.table.timestamp_column
        );
        let now = Utc::now().timestamp();
        self.conn.execute(&sql, params![unit_path, now])?;
        trace!(table = %self.table.table, unit_path, "Marked applied");
        Ok(())
    }

    /// Delete every row for `unit_path`, returning how many were removed.
    pub fn mark_reverted(&self, unit_path: &str) -> MigrateResult<usize> {
        let sql = format!(r#"DELETE FROM "{}" WHERE file_path = ?1"#, self.table.table);
        let removed = self.conn.execute(&sql, params![unit_path])?;
        trace!(table = %self.table.table, unit_path, removed, "Marked reverted");
        Ok(removed)
    }

    /// All ledger rows in application order.
    pub fn entries(&self) -> MigrateResult<Vec<LedgerEntry>> {
        let sql = format!(
            r#"SELECT id, file_path, "{}" FROM "{}" ORDER BY id"#,
            self.table.timestamp_column, self.table.table
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(LedgerEntry {
                id: row.get(0)?,
                unit_path: row.get(1)?,
                applied_at: row.get(2)?,
            })
        })?;

        let entries: Result<Vec<_>, _> = rows.collect();
        Ok(entries?)
    }
}
