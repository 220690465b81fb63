//! Declarative schema operations and their DDL rendering.
//!
//! Operations are plain data (deserialized from declarative script files).
//! Each one is rendered to its complete list of statements through the
//! connection's [`DialectCapabilities`] before anything is executed, so an
//! unsupported change never leaves a half-applied operation behind.

use crate::capabilities::{capabilities_for, DialectCapabilities};
use crate::delta::{ColumnChanges, ColumnDelta};
use crate::error::{ChangesetError, ChangesetResult};
use crate::schema::{ColumnDef, Constraint, ConstraintKind, TableDef};
use ld_db::Connection;
use serde::{Deserialize, Serialize};

/// One structural change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Operation {
    CreateTable {
        name: String,
        columns: Vec<ColumnDef>,
        #[serde(default)]
        constraints: Vec<Constraint>,
    },
    DropTable {
        name: String,
    },
    RenameTable {
        from: String,
        to: String,
    },
    AddColumn {
        table: String,
        column: ColumnDef,
    },
    DropColumn {
        table: String,
        column: String,
    },
    /// Change attributes of an existing column. Only attributes that differ
    /// from the live table produce statements.
    AlterColumn {
        table: String,
        column: String,
        changes: ColumnChanges,
    },
    AddConstraint {
        table: String,
        constraint: Constraint,
    },
    DropConstraint {
        table: String,
        name: String,
    },
    CreateIndex {
        name: String,
        table: String,
        columns: Vec<String>,
        #[serde(default)]
        unique: bool,
    },
    DropIndex {
        name: String,
    },
    RenameIndex {
        table: String,
        from: String,
        to: String,
    },
}

impl Operation {
    /// Operation kind as written in script files
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::CreateTable { .. } => "create_table",
            Operation::DropTable { .. } => "drop_table",
            Operation::RenameTable { .. } => "rename_table",
            Operation::AddColumn { .. } => "add_column",
            Operation::DropColumn { .. } => "drop_column",
            Operation::AlterColumn { .. } => "alter_column",
            Operation::AddConstraint { .. } => "add_constraint",
            Operation::DropConstraint { .. } => "drop_constraint",
            Operation::CreateIndex { .. } => "create_index",
            Operation::DropIndex { .. } => "drop_index",
            Operation::RenameIndex { .. } => "rename_index",
        }
    }

    /// Render this operation against the live schema behind `conn`.
    ///
    /// Only `alter_column` reads from the database (to reflect the table).
    pub fn render(
        &self,
        caps: &dyn DialectCapabilities,
        conn: &dyn Connection,
    ) -> ChangesetResult<Vec<String>> {
        match self {
            Operation::AlterColumn {
                table,
                column,
                changes,
            } => {
                let current = TableDef::reflect(conn, table)?;
                let delta = ColumnDelta::builder()
                    .table(&current)
                    .column_name(column.as_str())
                    .changes(changes.clone())
                    .build()?;
                alter_column_sql(caps, table, &delta)
            }
            other => other.render_static(caps),
        }
    }

    /// Render an operation that needs no knowledge of the live schema.
    ///
    /// `alter_column` is rejected here; use [`Operation::render`].
    pub fn render_static(&self, caps: &dyn DialectCapabilities) -> ChangesetResult<Vec<String>> {
        let q = |ident: &str| caps.quote_ident(ident);
        let sql = match self {
            Operation::CreateTable {
                name,
                columns,
                constraints,
            } => {
                if columns.is_empty() {
                    return Err(ChangesetError::InvalidParameters(format!(
                        "table '{name}' needs at least one column"
                    )));
                }
                let mut parts = columns
                    .iter()
                    .map(|c| column_sql(caps, c, true))
                    .collect::<Vec<_>>();
                let pk = columns
                    .iter()
                    .filter(|c| c.primary_key)
                    .map(|c| q(&c.name))
                    .collect::<Vec<_>>();
                if !pk.is_empty() {
                    parts.push(format!("PRIMARY KEY ({})", pk.join(", ")));
                }
                for constraint in constraints {
                    parts.push(constraint_sql(caps, constraint)?);
                }
                vec![format!("CREATE TABLE {} ({})", q(name), parts.join(", "))]
            }
            Operation::DropTable { name } => vec![format!("DROP TABLE {}", q(name))],
            Operation::RenameTable { from, to } => {
                vec![format!("ALTER TABLE {} RENAME TO {}", q(from), q(to))]
            }
            Operation::AddColumn { table, column } => add_column_sql(caps, table, column)?,
            Operation::DropColumn { table, column } => {
                require(caps, caps.supports_drop_column(), "drop_column")?;
                vec![format!(
                    "ALTER TABLE {} DROP COLUMN {}",
                    q(table),
                    q(column)
                )]
            }
            Operation::AlterColumn { .. } => {
                return Err(ChangesetError::InvalidParameters(
                    "alter_column needs the live table to render".to_string(),
                ))
            }
            Operation::AddConstraint { table, constraint } => {
                require(caps, caps.supports_alter_constraints(), "add_constraint")?;
                vec![format!(
                    "ALTER TABLE {} ADD {}",
                    q(table),
                    constraint_sql(caps, constraint)?
                )]
            }
            Operation::DropConstraint { table, name } => {
                require(caps, caps.supports_alter_constraints(), "drop_constraint")?;
                vec![format!(
                    "ALTER TABLE {} DROP CONSTRAINT {}",
                    q(table),
                    q(name)
                )]
            }
            Operation::CreateIndex {
                name,
                table,
                columns,
                unique,
            } => {
                if columns.is_empty() {
                    return Err(ChangesetError::InvalidParameters(format!(
                        "index '{name}' needs at least one column"
                    )));
                }
                let cols = columns.iter().map(|c| q(c)).collect::<Vec<_>>();
                vec![format!(
                    "CREATE {}INDEX {} ON {} ({})",
                    if *unique { "UNIQUE " } else { "" },
                    q(name),
                    q(table),
                    cols.join(", ")
                )]
            }
            Operation::DropIndex { name } => vec![format!("DROP INDEX {}", q(name))],
            Operation::RenameIndex { table, from, to } => {
                require(caps, caps.supports_rename_index(), "rename_index")?;
                vec![caps.rename_index_sql(table, from, to)]
            }
        };
        Ok(sql)
    }
}

fn require(caps: &dyn DialectCapabilities, supported: bool, operation: &str) -> ChangesetResult<()> {
    if supported {
        Ok(())
    } else {
        Err(ChangesetError::NotSupported {
            dialect: caps.name().to_string(),
            operation: operation.to_string(),
        })
    }
}

/// `"name" TYPE [NOT NULL] [DEFAULT ..]`; primary keys are declared at
/// table level.
fn column_sql(caps: &dyn DialectCapabilities, col: &ColumnDef, inline_not_null: bool) -> String {
    let mut sql = format!(
        "{} {}",
        caps.quote_ident(&col.name),
        caps.render_type(&col.column_type)
    );
    if inline_not_null && !col.nullable {
        sql.push_str(" NOT NULL");
    }
    if let Some(default) = &col.server_default {
        sql.push_str(" DEFAULT ");
        sql.push_str(&default.literal());
    }
    sql
}

fn add_column_sql(
    caps: &dyn DialectCapabilities,
    table: &str,
    col: &ColumnDef,
) -> ChangesetResult<Vec<String>> {
    let q = |ident: &str| caps.quote_ident(ident);
    if col.primary_key {
        require(caps, caps.supports_alter_primary_key(), "add_column primary_key")?;
    }
    // NOT NULL becomes a follow-up statement where the engine cannot take
    // constraints on a new column.
    let inline = caps.supports_inline_add_column_constraints();
    if !inline && !col.nullable {
        require(caps, caps.supports_alter_nullability(), "add_column nullable")?;
    }

    let mut out = vec![format!(
        "ALTER TABLE {} ADD COLUMN {}",
        q(table),
        column_sql(caps, col, inline)
    )];
    if !inline && !col.nullable {
        out.push(format!(
            "ALTER TABLE {} ALTER COLUMN {} SET NOT NULL",
            q(table),
            q(&col.name)
        ));
    }
    if col.primary_key {
        out.push(format!(
            "ALTER TABLE {} ADD PRIMARY KEY ({})",
            q(table),
            q(&col.name)
        ));
    }
    Ok(out)
}

fn constraint_sql(caps: &dyn DialectCapabilities, constraint: &Constraint) -> ChangesetResult<String> {
    let q = |ident: &str| caps.quote_ident(ident);
    let list = |cols: &[String]| cols.iter().map(|c| q(c)).collect::<Vec<_>>().join(", ");

    let body = match &constraint.kind {
        ConstraintKind::PrimaryKey { columns } => format!("PRIMARY KEY ({})", list(columns)),
        ConstraintKind::Unique { columns } => format!("UNIQUE ({})", list(columns)),
        ConstraintKind::Check { expression } => {
            if constraint.name.is_some() {
                require(caps, caps.supports_named_check_constraints(), "named check constraint")?;
            }
            format!("CHECK ({expression})")
        }
        ConstraintKind::ForeignKey {
            columns,
            references_table,
            references_columns,
        } => {
            if columns.len() != references_columns.len() {
                return Err(ChangesetError::InvalidParameters(format!(
                    "foreign key on ({}) references {} column(s) of '{}'",
                    columns.join(", "),
                    references_columns.len(),
                    references_table
                )));
            }
            format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                list(columns),
                q(references_table),
                list(references_columns)
            )
        }
    };
    Ok(match &constraint.name {
        Some(name) => format!("CONSTRAINT {} {}", q(name), body),
        None => body,
    })
}

/// Statements for a column delta, in the order: type, nullability,
/// default, primary key, rename.
///
/// Every changed attribute is checked against `caps` before any statement
/// is produced.
pub fn alter_column_sql(
    caps: &dyn DialectCapabilities,
    table: &str,
    delta: &ColumnDelta,
) -> ChangesetResult<Vec<String>> {
    let q = |ident: &str| caps.quote_ident(ident);
    let current = delta.current();
    let changes = delta.changes();

    // The forced NOT NULL of a primary key may already hold.
    let nullable = changes.nullable.filter(|n| *n != current.nullable);
    let primary_key = changes.primary_key.filter(|p| *p != current.primary_key);

    if changes.column_type.is_some() {
        require(caps, caps.supports_alter_column_type(), "alter_column type")?;
    }
    if nullable.is_some() {
        require(caps, caps.supports_alter_nullability(), "alter_column nullable")?;
    }
    if changes.server_default.is_some() {
        require(caps, caps.supports_alter_server_default(), "alter_column server_default")?;
    }
    if primary_key.is_some() {
        require(caps, caps.supports_alter_primary_key(), "alter_column primary_key")?;
    }
    if changes.name.is_some() {
        require(caps, caps.supports_rename_column(), "alter_column name")?;
    }

    let name = current.name.as_str();
    let mut out = Vec::new();
    if let Some(ty) = &changes.column_type {
        out.push(caps.alter_type_sql(table, name, ty));
    }
    if let Some(nullable) = nullable {
        out.push(format!(
            "ALTER TABLE {} ALTER COLUMN {} {} NOT NULL",
            q(table),
            q(name),
            if nullable { "DROP" } else { "SET" }
        ));
    }
    if let Some(default) = &changes.server_default {
        out.push(match default {
            Some(d) => format!(
                "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {}",
                q(table),
                q(name),
                d.literal()
            ),
            None => format!("ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT", q(table), q(name)),
        });
    }
    if let Some(pk) = primary_key {
        out.push(if pk {
            format!("ALTER TABLE {} ADD PRIMARY KEY ({})", q(table), q(name))
        } else {
            caps.drop_primary_key_sql(table)
        });
    }
    if let Some(new_name) = &changes.name {
        out.push(format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            q(table),
            q(name),
            q(new_name)
        ));
    }
    Ok(out)
}

/// Render and execute `ops` in order on `conn`.
///
/// Runs inside whatever transaction the caller holds. Each operation is
/// rendered completely before its first statement executes.
pub fn run_operations(conn: &dyn Connection, ops: &[Operation]) -> ChangesetResult<()> {
    let caps = capabilities_for(conn.dialect())?;
    for op in ops {
        let statements = op.render(caps.as_ref(), conn)?;
        log::debug!("{}: {} statement(s)", op.kind(), statements.len());
        for sql in &statements {
            conn.execute_batch(sql)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "operations_test.rs"]
mod tests;
