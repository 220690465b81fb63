//! DuckDB connection implementation

use crate::error::{DbError, DbResult};
use crate::traits::{split_qualified, Connection, ReflectedColumn, SqlValue};
use duckdb::types::Value;
use std::path::Path;

/// A [`Connection`] backed by a DuckDB database.
///
/// Single-threaded: the migration engine drives one connection sequentially,
/// so no `Mutex` is needed.
pub struct DuckDbConnection {
    conn: duckdb::Connection,
}

impl DuckDbConnection {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        Self::in_memory_with(duckdb::Config::default())
    }

    /// Create an in-memory connection with explicit settings
    pub fn in_memory_with(config: duckdb::Config) -> DbResult<Self> {
        let conn = duckdb::Connection::open_in_memory_with_flags(config)
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open (or create) a DuckDB database file
    pub fn from_path(path: &Path) -> DbResult<Self> {
        Self::from_path_with(path, duckdb::Config::default())
    }

    /// Open (or create) a DuckDB database file with explicit settings
    pub fn from_path_with(path: &Path, config: duckdb::Config) -> DbResult<Self> {
        let conn = duckdb::Connection::open_with_flags(path, config)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Borrow the underlying DuckDB connection.
    pub fn raw(&self) -> &duckdb::Connection {
        &self.conn
    }

    fn primary_key_columns(&self, schema: &str, table: &str) -> DbResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT UNNEST(constraint_column_names) FROM duckdb_constraints() \
             WHERE schema_name = ? AND table_name = ? AND constraint_type = 'PRIMARY KEY'",
        )?;
        let rows = stmt.query_map(duckdb::params![schema, table], |row| {
            row.get::<_, String>(0)
        })?;
        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }
}

fn to_duck(value: &SqlValue) -> Value {
    match value {
        SqlValue::Int(i) => Value::BigInt(*i),
        SqlValue::Text(s) => Value::Text(s.clone()),
    }
}

impl Connection for DuckDbConnection {
    fn dialect(&self) -> &str {
        "duckdb"
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        log::debug!("execute: {sql}");
        self.conn
            .execute(sql, duckdb::params_from_iter(params.iter().map(to_duck)))
            .map_err(|e| DbError::ExecutionError(format!("{e}: {sql}")))
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        log::debug!("execute_batch: {sql}");
        self.conn.execute_batch(sql).map_err(DbError::from)
    }

    fn query_i64(&self, sql: &str, params: &[SqlValue]) -> DbResult<Option<i64>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(duckdb::params_from_iter(params.iter().map(to_duck)))?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get::<_, i64>(0)?)),
            None => Ok(None),
        }
    }

    fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = split_qualified(name, "main");
        let count = self.query_i64(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
            &[schema.into(), table.into()],
        )?;
        Ok(count.unwrap_or(0) > 0)
    }

    fn table_columns(&self, name: &str) -> DbResult<Vec<ReflectedColumn>> {
        let (schema, table) = split_qualified(name, "main");
        let primary_key = self.primary_key_columns(schema, table)?;

        let mut stmt = self.conn.prepare(
            "SELECT column_name, data_type, is_nullable, column_default \
             FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? \
             ORDER BY ordinal_position",
        )?;
        let rows = stmt.query_map(duckdb::params![schema, table], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut columns = Vec::new();
        for row in rows {
            let (col_name, data_type, is_nullable, default) = row?;
            let primary_key = primary_key.contains(&col_name);
            columns.push(ReflectedColumn {
                name: col_name,
                data_type,
                nullable: is_nullable.eq_ignore_ascii_case("YES"),
                default,
                primary_key,
            });
        }
        if columns.is_empty() {
            return Err(DbError::TableNotFound(name.to_string()));
        }
        Ok(columns)
    }

    fn begin(&self) -> DbResult<()> {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))
    }

    fn commit(&self) -> DbResult<()> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
    }

    fn rollback(&self) -> DbResult<()> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
