//! Connection trait definition

use crate::error::DbResult;

/// A bound parameter value for bookkeeping queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// 64-bit integer
    Int(i64),
    /// Text
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

/// A column as reported by the database catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedColumn {
    /// Column name
    pub name: String,
    /// Engine-reported type name (e.g. `VARCHAR`, `DECIMAL(10,2)`)
    pub data_type: String,
    /// Whether NULL values are allowed
    pub nullable: bool,
    /// Engine-reported default expression, verbatim
    pub default: Option<String>,
    /// Whether the column is part of the primary key
    pub primary_key: bool,
}

/// A live, synchronous database connection.
///
/// The migration engine only ever borrows a connection; opening and closing
/// it is the caller's business.
pub trait Connection {
    /// Dialect tag of the engine behind this connection (e.g. `"duckdb"`)
    fn dialect(&self) -> &str;

    /// Execute one statement with bound parameters, returning affected rows
    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize>;

    /// Execute SQL text without parameters (DDL, verbatim script statements)
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Return the first column of the first row as an integer, if any row
    fn query_i64(&self, sql: &str, params: &[SqlValue]) -> DbResult<Option<i64>>;

    /// Check if a table or view exists
    fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Reflect the columns of a table, in ordinal order
    fn table_columns(&self, table: &str) -> DbResult<Vec<ReflectedColumn>>;

    /// Start a transaction
    fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    fn rollback(&self) -> DbResult<()>;
}

/// Split an optionally schema-qualified name into `(schema, table)`.
pub(crate) fn split_qualified<'a>(name: &'a str, default_schema: &'a str) -> (&'a str, &'a str) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => (default_schema, name),
    }
}
