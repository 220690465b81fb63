//! Table, column and constraint definitions.

use crate::error::{ChangesetError, ChangesetResult};
use ld_db::ReflectedColumn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A column's SQL type.
///
/// Parameterized types compare by their parameters too, so `VARCHAR(24)`
/// and `VARCHAR(42)` are different types, as are `VARCHAR` and `TEXT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnType {
    SmallInt,
    Integer,
    BigInt,
    Boolean,
    Float,
    Double,
    /// Fixed-point number with optional precision and scale
    Decimal {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    /// Variable-length string with optional maximum length
    String(Option<u32>),
    /// Fixed-length string
    Char(Option<u32>),
    Text,
    Date,
    Time,
    Timestamp,
    Binary,
    /// Any type not modelled above, kept verbatim (upper-cased)
    Other(String),
}

impl ColumnType {
    /// Parse a type as written in a script or reported by a catalog.
    pub fn parse(text: &str) -> ChangesetResult<Self> {
        let upper = text.trim().to_ascii_uppercase();
        if upper.is_empty() {
            return Err(ChangesetError::InvalidType(text.to_string()));
        }
        let (base, params) = match upper.find('(') {
            Some(open) => {
                let Some(inner) = upper[open + 1..].strip_suffix(')') else {
                    return Err(ChangesetError::InvalidType(text.to_string()));
                };
                let params = inner
                    .split(',')
                    .map(|p| p.trim().parse::<u32>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| ChangesetError::InvalidType(text.to_string()))?;
                (upper[..open].trim().to_string(), params)
            }
            None => (upper.clone(), Vec::new()),
        };

        let first = params.first().copied();
        let ty = match base.as_str() {
            "SMALLINT" | "INT2" => ColumnType::SmallInt,
            "INTEGER" | "INT" | "INT4" => ColumnType::Integer,
            "BIGINT" | "INT8" => ColumnType::BigInt,
            "BOOLEAN" | "BOOL" => ColumnType::Boolean,
            "REAL" | "FLOAT" | "FLOAT4" => ColumnType::Float,
            "DOUBLE" | "DOUBLE PRECISION" | "FLOAT8" => ColumnType::Double,
            "DECIMAL" | "NUMERIC" => ColumnType::Decimal {
                precision: first,
                scale: params.get(1).copied(),
            },
            "VARCHAR" | "STRING" | "CHARACTER VARYING" => ColumnType::String(first),
            "CHAR" | "CHARACTER" => ColumnType::Char(first),
            "TEXT" => ColumnType::Text,
            "DATE" => ColumnType::Date,
            "TIME" => ColumnType::Time,
            "TIMESTAMP" | "DATETIME" => ColumnType::Timestamp,
            "BLOB" | "BYTEA" | "BINARY" | "VARBINARY" => ColumnType::Binary,
            _ => ColumnType::Other(upper),
        };
        Ok(ty)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::SmallInt => f.write_str("SMALLINT"),
            ColumnType::Integer => f.write_str("INTEGER"),
            ColumnType::BigInt => f.write_str("BIGINT"),
            ColumnType::Boolean => f.write_str("BOOLEAN"),
            ColumnType::Float => f.write_str("REAL"),
            ColumnType::Double => f.write_str("DOUBLE"),
            ColumnType::Decimal {
                precision: Some(p),
                scale: Some(s),
            } => write!(f, "DECIMAL({p},{s})"),
            ColumnType::Decimal {
                precision: Some(p),
                scale: None,
            } => write!(f, "DECIMAL({p})"),
            ColumnType::Decimal { .. } => f.write_str("DECIMAL"),
            ColumnType::String(Some(n)) => write!(f, "VARCHAR({n})"),
            ColumnType::String(None) => f.write_str("VARCHAR"),
            ColumnType::Char(Some(n)) => write!(f, "CHAR({n})"),
            ColumnType::Char(None) => f.write_str("CHAR"),
            ColumnType::Text => f.write_str("TEXT"),
            ColumnType::Date => f.write_str("DATE"),
            ColumnType::Time => f.write_str("TIME"),
            ColumnType::Timestamp => f.write_str("TIMESTAMP"),
            ColumnType::Binary => f.write_str("BLOB"),
            ColumnType::Other(raw) => f.write_str(raw),
        }
    }
}

impl FromStr for ColumnType {
    type Err = ChangesetError;
    fn from_str(s: &str) -> ChangesetResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ColumnType {
    type Error = ChangesetError;
    fn try_from(s: String) -> ChangesetResult<Self> {
        Self::parse(&s)
    }
}

impl From<ColumnType> for String {
    fn from(ty: ColumnType) -> Self {
        ty.to_string()
    }
}

/// A server-side column default.
///
/// Two defaults are equal only when their rendered literal text is equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ServerDefaultRepr", into = "ServerDefaultRepr")]
pub enum ServerDefault {
    /// String literal, rendered single-quoted
    Text(String),
    /// Numeric literal, rendered verbatim
    Number(String),
    Boolean(bool),
    /// SQL expression rendered verbatim (`now()`, reflected defaults)
    Expression(String),
}

impl ServerDefault {
    /// String literal default
    pub fn text(value: impl Into<String>) -> Self {
        ServerDefault::Text(value.into())
    }

    /// Verbatim SQL expression default
    pub fn expression(expr: impl Into<String>) -> Self {
        ServerDefault::Expression(expr.into())
    }

    /// The SQL text of this default.
    pub fn literal(&self) -> String {
        match self {
            ServerDefault::Text(s) => format!("'{}'", s.replace('\'', "''")),
            ServerDefault::Number(n) => n.clone(),
            ServerDefault::Boolean(true) => "TRUE".to_string(),
            ServerDefault::Boolean(false) => "FALSE".to_string(),
            ServerDefault::Expression(e) => e.clone(),
        }
    }
}

impl PartialEq for ServerDefault {
    fn eq(&self, other: &Self) -> bool {
        self.literal() == other.literal()
    }
}

impl Eq for ServerDefault {}

/// YAML shape of a default: a bare scalar or `{ expression: ... }`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ServerDefaultRepr {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Expression { expression: String },
}

impl From<ServerDefaultRepr> for ServerDefault {
    fn from(repr: ServerDefaultRepr) -> Self {
        match repr {
            ServerDefaultRepr::Boolean(b) => ServerDefault::Boolean(b),
            ServerDefaultRepr::Integer(i) => ServerDefault::Number(i.to_string()),
            // Debug keeps the decimal point, so `1.0` stays a float literal.
            ServerDefaultRepr::Float(x) => ServerDefault::Number(format!("{x:?}")),
            ServerDefaultRepr::Text(s) => ServerDefault::Text(s),
            ServerDefaultRepr::Expression { expression } => ServerDefault::Expression(expression),
        }
    }
}

impl From<ServerDefault> for ServerDefaultRepr {
    fn from(d: ServerDefault) -> Self {
        match d {
            ServerDefault::Boolean(b) => ServerDefaultRepr::Boolean(b),
            ServerDefault::Text(s) => ServerDefaultRepr::Text(s),
            ServerDefault::Number(n) | ServerDefault::Expression(n) => {
                ServerDefaultRepr::Expression { expression: n }
            }
        }
    }
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ColumnDefRepr")]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub server_default: Option<ServerDefault>,
}

impl ColumnDef {
    /// A nullable, non-key column without a default.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            primary_key: false,
            server_default: None,
        }
    }

    /// Mark as primary key. A primary key column is never nullable.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Set nullability.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the server-side default.
    pub fn server_default(mut self, default: ServerDefault) -> Self {
        self.server_default = Some(default);
        self
    }

    /// Build from a catalog row.
    pub fn from_reflected(col: &ReflectedColumn) -> ChangesetResult<Self> {
        Ok(Self {
            name: col.name.clone(),
            column_type: ColumnType::parse(&col.data_type)?,
            nullable: col.nullable && !col.primary_key,
            primary_key: col.primary_key,
            server_default: col.default.clone().map(ServerDefault::Expression),
        })
    }
}

/// YAML shape of a column: `nullable` defaults to `true` unless the column
/// is a primary key.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ColumnDefRepr {
    name: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
    #[serde(default)]
    nullable: Option<bool>,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    server_default: Option<ServerDefault>,
}

impl From<ColumnDefRepr> for ColumnDef {
    fn from(r: ColumnDefRepr) -> Self {
        Self {
            nullable: r.nullable.unwrap_or(!r.primary_key),
            name: r.name,
            column_type: r.column_type,
            primary_key: r.primary_key,
            server_default: r.server_default,
        }
    }
}

/// A table definition: a name and its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of the primary key columns, in column order.
    pub fn primary_key(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Build from catalog rows.
    pub fn from_reflected(name: &str, columns: &[ReflectedColumn]) -> ChangesetResult<Self> {
        let columns = columns
            .iter()
            .map(ColumnDef::from_reflected)
            .collect::<ChangesetResult<Vec<_>>>()?;
        Ok(Self::new(name, columns))
    }

    /// Reflect a live table.
    pub fn reflect(conn: &dyn ld_db::Connection, name: &str) -> ChangesetResult<Self> {
        let columns = conn.table_columns(name)?;
        Self::from_reflected(name, &columns)
    }

    /// A copy of this table with column `name` replaced by `column`.
    pub fn with_column_replaced(&self, name: &str, column: ColumnDef) -> ChangesetResult<Self> {
        let mut table = self.clone();
        let slot = table
            .columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| ChangesetError::ColumnNotFound {
                table: self.name.clone(),
                column: name.to_string(),
            })?;
        *slot = column;
        Ok(table)
    }
}

/// What a table constraint enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintKind {
    PrimaryKey {
        columns: Vec<String>,
    },
    Unique {
        columns: Vec<String>,
    },
    Check {
        expression: String,
    },
    ForeignKey {
        columns: Vec<String>,
        references_table: String,
        references_columns: Vec<String>,
    },
}

/// A table constraint, optionally named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: ConstraintKind,
}

impl Constraint {
    pub fn new(name: Option<&str>, kind: ConstraintKind) -> Self {
        Self {
            name: name.map(str::to_string),
            kind,
        }
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
