//! Per-engine DDL capabilities.
//!
//! Each supported engine implements [`DialectCapabilities`] once. The
//! declarative operation layer asks yes/no questions ("can this engine
//! rename an index?") before rendering anything, and uses the SQL helpers
//! for the few statements whose syntax differs between engines.

use crate::error::{ChangesetError, ChangesetResult};
use crate::schema::ColumnType;

/// What an engine can express, and how it spells the parts that differ.
pub trait DialectCapabilities: Send + Sync {
    /// Dialect tag this implementation answers for
    fn name(&self) -> &'static str;

    /// `ALTER TABLE .. RENAME COLUMN .. TO ..` in one statement
    fn supports_rename_column(&self) -> bool {
        true
    }

    fn supports_rename_index(&self) -> bool {
        true
    }

    /// `CONSTRAINT name CHECK (..)`
    fn supports_named_check_constraints(&self) -> bool {
        true
    }

    fn supports_alter_column_type(&self) -> bool {
        true
    }

    fn supports_alter_nullability(&self) -> bool {
        true
    }

    fn supports_alter_server_default(&self) -> bool {
        true
    }

    /// Adding or removing a column from the primary key of an existing table
    fn supports_alter_primary_key(&self) -> bool {
        true
    }

    /// `ALTER TABLE .. ADD CONSTRAINT` / `DROP CONSTRAINT`
    fn supports_alter_constraints(&self) -> bool {
        true
    }

    fn supports_drop_column(&self) -> bool {
        true
    }

    /// `ADD COLUMN` accepting `NOT NULL` inline
    fn supports_inline_add_column_constraints(&self) -> bool {
        true
    }

    /// Quote an identifier.
    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    /// Render a column type.
    fn render_type(&self, ty: &ColumnType) -> String {
        ty.to_string()
    }

    /// Statement renaming an index of `table`.
    fn rename_index_sql(&self, _table: &str, from: &str, to: &str) -> String {
        format!(
            "ALTER INDEX {} RENAME TO {}",
            self.quote_ident(from),
            self.quote_ident(to)
        )
    }

    /// Statement removing the primary key of `table`.
    fn drop_primary_key_sql(&self, table: &str) -> String {
        format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            self.quote_ident(table),
            self.quote_ident(&format!("{table}_pkey"))
        )
    }

    /// Statement changing the type of `column` in `table`.
    fn alter_type_sql(&self, table: &str, column: &str, ty: &ColumnType) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
            self.quote_ident(table),
            self.quote_ident(column),
            self.render_type(ty)
        )
    }
}

/// Generic ANSI-ish engine: every capability available.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCapabilities;

impl DialectCapabilities for DefaultCapabilities {
    fn name(&self) -> &'static str {
        "default"
    }
}

/// DuckDB
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbCapabilities;

impl DialectCapabilities for DuckDbCapabilities {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn supports_rename_index(&self) -> bool {
        false
    }

    fn supports_alter_primary_key(&self) -> bool {
        false
    }

    fn supports_alter_constraints(&self) -> bool {
        false
    }

    fn supports_inline_add_column_constraints(&self) -> bool {
        false
    }
}

/// PostgreSQL
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresCapabilities;

impl DialectCapabilities for PostgresCapabilities {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn render_type(&self, ty: &ColumnType) -> String {
        match ty {
            ColumnType::Binary => "BYTEA".to_string(),
            ColumnType::Double => "DOUBLE PRECISION".to_string(),
            other => other.to_string(),
        }
    }
}

/// SQLite: most changes to an existing column need a table rebuild, which
/// declarative scripts do not attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteCapabilities;

impl DialectCapabilities for SqliteCapabilities {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn supports_rename_index(&self) -> bool {
        false
    }

    fn supports_alter_column_type(&self) -> bool {
        false
    }

    fn supports_alter_nullability(&self) -> bool {
        false
    }

    fn supports_alter_server_default(&self) -> bool {
        false
    }

    fn supports_alter_primary_key(&self) -> bool {
        false
    }

    fn supports_alter_constraints(&self) -> bool {
        false
    }
}

/// MySQL
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlCapabilities;

impl DialectCapabilities for MySqlCapabilities {
    fn name(&self) -> &'static str {
        "mysql"
    }

    // MODIFY restates the whole column; nullability travels with the type.
    fn supports_alter_nullability(&self) -> bool {
        false
    }

    fn supports_named_check_constraints(&self) -> bool {
        false
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn rename_index_sql(&self, table: &str, from: &str, to: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME INDEX {} TO {}",
            self.quote_ident(table),
            self.quote_ident(from),
            self.quote_ident(to)
        )
    }

    fn drop_primary_key_sql(&self, table: &str) -> String {
        format!("ALTER TABLE {} DROP PRIMARY KEY", self.quote_ident(table))
    }

    fn alter_type_sql(&self, table: &str, column: &str, ty: &ColumnType) -> String {
        format!(
            "ALTER TABLE {} MODIFY {} {}",
            self.quote_ident(table),
            self.quote_ident(column),
            self.render_type(ty)
        )
    }
}

/// Select the capability implementation for a dialect tag.
pub fn capabilities_for(dialect: &str) -> ChangesetResult<Box<dyn DialectCapabilities>> {
    match dialect {
        "default" => Ok(Box::new(DefaultCapabilities)),
        "duckdb" => Ok(Box::new(DuckDbCapabilities)),
        "postgres" | "postgresql" => Ok(Box::new(PostgresCapabilities)),
        "sqlite" => Ok(Box::new(SqliteCapabilities)),
        "mysql" => Ok(Box::new(MySqlCapabilities)),
        other => Err(ChangesetError::UnknownDialect(other.to_string())),
    }
}

#[cfg(test)]
#[path = "capabilities_test.rs"]
mod tests;
