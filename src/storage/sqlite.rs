//! SQLite storage implementation

use std::path::Path;
use rusqlite::types::Value;
use rusqlite::{Connection, ErrorCode, OpenFlags, params_from_iter};
use serde::Serialize;
use crate::{Error, Result};
use crate::schema::{Entity, SchemaRegistry, TableSchema};
use super::schema;

/// A coerced row ready for insertion, in declared column order
#[derive(Debug, Clone, PartialEq)]
pub struct RowValues {
    /// Source line, for error reports
    pub line: u64,
    pub values: Vec<Value>,
}

/// SQLite-backed relational store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open an existing database file for reporting; never writes
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(schema::CONNECTION_PRAGMAS)?;
        Ok(Self { conn })
    }

    // ========== Schema Operations ==========

    /// Drop every registered table (children first) and recreate them
    /// (parents first). Runs as one transaction.
    pub fn rebuild(&mut self, registry: &SchemaRegistry) -> Result<()> {
        let tx = self.conn.transaction()?;

        for entity in registry.drop_order() {
            tx.execute_batch(&format!("DROP TABLE IF EXISTS {}", entity.table_name()))?;
            tracing::debug!("Dropped {}", entity.table_name());
        }

        for table in registry.ordered_tables() {
            let ddl = registry.create_table_sql(table)?;
            tx.execute_batch(&ddl)?;
            tracing::debug!("Created {}", table.name());
        }

        tx.commit()?;
        Ok(())
    }

    /// Check whether a table exists
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ========== Row Operations ==========

    /// Insert all rows for a table in a single transaction.
    ///
    /// Either every row commits or none does; a failing row rolls back the
    /// whole batch and is reported with its source line.
    pub fn insert_batch(&mut self, table: &TableSchema, rows: &[RowValues]) -> Result<usize> {
        let sql = schema::insert_statement(table.name(), &table.field_names());
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows {
                stmt.execute(params_from_iter(row.values.iter()))
                    .map_err(|e| classify_insert_error(table.entity, row.line, e))?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// Count rows in a table
    pub fn count_rows(&self, table: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Row counts for every registered table, in load order
    pub fn table_counts(&self, registry: &SchemaRegistry) -> Result<Vec<(Entity, usize)>> {
        registry
            .load_order()
            .iter()
            .map(|entity| Ok((*entity, self.count_rows(entity.table_name())?)))
            .collect()
    }

    /// Number of rows whose foreign keys point at missing parents
    pub fn foreign_key_violations(&self) -> Result<usize> {
        let mut stmt = self.conn.prepare("PRAGMA foreign_key_check")?;
        let mut rows = stmt.query([])?;
        let mut count = 0;
        while rows.next()?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    // ========== Query Operations ==========

    /// Run a read-only statement inside its own transaction and collect
    /// column names plus every row.
    pub fn query_rows(&self, sql: &str) -> rusqlite::Result<(Vec<String>, Vec<Vec<Value>>)> {
        let tx = self.conn.unchecked_transaction()?;
        let result = {
            let mut stmt = tx.prepare(sql)?;
            let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
            let width = columns.len();
            let rows = stmt
                .query_map([], |row| {
                    (0..width).map(|i| row.get::<_, Value>(i)).collect::<rusqlite::Result<Vec<_>>>()
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            (columns, rows)
        };
        // Nothing to keep; the transaction only pins the snapshot.
        tx.rollback()?;
        Ok(result)
    }

    // ========== Consistency Checks ==========

    /// Orders whose total_amount differs from the sum of their subtotals
    pub fn order_total_mismatches(&self, tolerance: f64) -> Result<Vec<TotalMismatch>> {
        self.mismatches(schema::ORDER_TOTAL_MISMATCHES, tolerance)
    }

    /// Items whose subtotal differs from quantity * unit_price
    pub fn line_subtotal_mismatches(&self, tolerance: f64) -> Result<Vec<TotalMismatch>> {
        self.mismatches(schema::LINE_SUBTOTAL_MISMATCHES, tolerance)
    }

    fn mismatches(&self, sql: &str, tolerance: f64) -> Result<Vec<TotalMismatch>> {
        let mut stmt = self.conn.prepare(sql)?;
        let found = stmt
            .query_map([tolerance], |row| {
                Ok(TotalMismatch {
                    id: row.get(0)?,
                    recorded: row.get(1)?,
                    computed: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(found)
    }

    /// Get database statistics
    pub fn stats(&self, registry: &SchemaRegistry) -> Result<DbStats> {
        let mut tables = Vec::new();
        for entity in registry.load_order() {
            let name = entity.table_name();
            let rows = if self.table_exists(name)? {
                Some(self.count_rows(name)?)
            } else {
                None
            };
            tables.push(TableStat { table: name.to_string(), rows });
        }
        Ok(DbStats { tables })
    }
}

/// Map an insert failure onto the error taxonomy. Constraint failures
/// (PK, FK, NOT NULL, CHECK) stay contained in the entity batch.
fn classify_insert_error(entity: Entity, line: u64, err: rusqlite::Error) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(code, message) if code.code == ErrorCode::ConstraintViolation => {
            Error::ConstraintViolation {
                entity,
                line,
                message: message.clone().unwrap_or_else(|| err.to_string()),
            }
        }
        _ => Error::Storage(err),
    }
}

/// A recorded amount that disagrees with the amount computed from its parts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalMismatch {
    pub id: i64,
    pub recorded: Option<f64>,
    pub computed: Option<f64>,
}

/// Row count for one table; `None` when the table does not exist
#[derive(Debug, Clone, Serialize)]
pub struct TableStat {
    pub table: String,
    pub rows: Option<usize>,
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub tables: Vec<TableStat>,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Table Statistics:")?;
        for stat in &self.tables {
            match stat.rows {
                Some(rows) => writeln!(f, "  {}: {} records", stat.table, rows)?,
                None => writeln!(f, "  {}: (missing)", stat.table)?,
            }
        }
        Ok(())
    }
}
