//! Column delta computation.
//!
//! A [`ColumnDelta`] is the minimal set of attribute changes that turns a
//! column's current definition into a requested one. Computing a delta is
//! pure: the inputs are borrowed and never modified. Applying it to a table
//! definition is a separate, explicit call ([`ColumnDelta::apply_to`]) that
//! returns a new table snapshot.

use crate::error::{ChangesetError, ChangesetResult};
use crate::schema::{ColumnDef, ColumnType, ServerDefault, TableDef};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A tracked column attribute.
///
/// Variants are declared in key-name order so sorted attribute lists read
/// alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Name,
    Nullable,
    PrimaryKey,
    ServerDefault,
    Type,
}

impl Attribute {
    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Name => "name",
            Attribute::Nullable => "nullable",
            Attribute::PrimaryKey => "primary_key",
            Attribute::ServerDefault => "server_default",
            Attribute::Type => "type",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deserialize a present-but-null field as `Some(None)`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A partial column definition: attribute name to new value.
///
/// Used both for requested overrides and for the computed delta. A field
/// that is `None` is unspecified. `server_default: Some(None)` means "drop
/// the default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub column_type: Option<ColumnType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<bool>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub server_default: Option<Option<ServerDefault>>,
}

impl ColumnChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn column_type(mut self, ty: ColumnType) -> Self {
        self.column_type = Some(ty);
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = Some(primary_key);
        self
    }

    /// Request a new default, or `None` to drop it.
    pub fn server_default(mut self, default: Option<ServerDefault>) -> Self {
        self.server_default = Some(default);
        self
    }

    /// Every attribute of `col`, all marked as specified.
    pub fn from_column(col: &ColumnDef) -> Self {
        Self {
            name: Some(col.name.clone()),
            column_type: Some(col.column_type.clone()),
            nullable: Some(col.nullable),
            primary_key: Some(col.primary_key),
            server_default: Some(col.server_default.clone()),
        }
    }

    /// `self` with every attribute specified in `other` taking precedence.
    pub fn overlay(mut self, other: ColumnChanges) -> Self {
        if other.name.is_some() {
            self.name = other.name;
        }
        if other.column_type.is_some() {
            self.column_type = other.column_type;
        }
        if other.nullable.is_some() {
            self.nullable = other.nullable;
        }
        if other.primary_key.is_some() {
            self.primary_key = other.primary_key;
        }
        if other.server_default.is_some() {
            self.server_default = other.server_default;
        }
        self
    }

    /// Specified attributes, sorted.
    pub fn keys(&self) -> Vec<Attribute> {
        let mut keys = Vec::new();
        if self.name.is_some() {
            keys.push(Attribute::Name);
        }
        if self.nullable.is_some() {
            keys.push(Attribute::Nullable);
        }
        if self.primary_key.is_some() {
            keys.push(Attribute::PrimaryKey);
        }
        if self.server_default.is_some() {
            keys.push(Attribute::ServerDefault);
        }
        if self.column_type.is_some() {
            keys.push(Attribute::Type);
        }
        keys
    }

    pub fn contains(&self, attr: Attribute) -> bool {
        self.keys().contains(&attr)
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// `col` with every specified attribute applied.
    pub fn apply(&self, col: &ColumnDef) -> ColumnDef {
        let mut out = col.clone();
        if let Some(name) = &self.name {
            out.name = name.clone();
        }
        if let Some(ty) = &self.column_type {
            out.column_type = ty.clone();
        }
        if let Some(nullable) = self.nullable {
            out.nullable = nullable;
        }
        if let Some(pk) = self.primary_key {
            out.primary_key = pk;
        }
        if let Some(default) = &self.server_default {
            out.server_default = default.clone();
        }
        out
    }
}

/// The computed changes for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDelta {
    table_name: Option<String>,
    current: ColumnDef,
    changes: ColumnChanges,
}

impl ColumnDelta {
    /// Start describing a delta.
    pub fn builder<'a>() -> ColumnDeltaBuilder<'a> {
        ColumnDeltaBuilder::default()
    }

    /// Delta between two full column definitions.
    pub fn between(current: &ColumnDef, requested: &ColumnDef) -> Self {
        let requested = ColumnChanges::from_column(requested);
        Self::compute(None, current.clone(), requested)
    }

    fn compute(table_name: Option<String>, current: ColumnDef, requested: ColumnChanges) -> Self {
        let mut changes = ColumnChanges::default();

        if let Some(name) = requested.name.filter(|n| *n != current.name) {
            changes.name = Some(name);
        }
        if let Some(ty) = requested.column_type.filter(|t| *t != current.column_type) {
            changes.column_type = Some(ty);
        }
        if let Some(nullable) = requested.nullable.filter(|n| *n != current.nullable) {
            changes.nullable = Some(nullable);
        }
        if let Some(pk) = requested.primary_key.filter(|p| *p != current.primary_key) {
            changes.primary_key = Some(pk);
        }
        if let Some(default) = requested
            .server_default
            .filter(|d| *d != current.server_default)
        {
            changes.server_default = Some(default);
        }

        // A primary key is never nullable: asking for membership without
        // saying anything about nullability reports both.
        if requested.primary_key == Some(true) && requested.nullable.is_none() {
            changes.primary_key = Some(true);
            changes.nullable = Some(false);
        }

        Self {
            table_name,
            current,
            changes,
        }
    }

    /// Name of the column before the change.
    pub fn current_name(&self) -> &str {
        &self.current.name
    }

    /// Definition of the column before the change.
    pub fn current(&self) -> &ColumnDef {
        &self.current
    }

    /// Owning table, when the delta was resolved through a table.
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// The changed attributes and their new values.
    pub fn changes(&self) -> &ColumnChanges {
        &self.changes
    }

    /// Changed attribute names, sorted.
    pub fn keys(&self) -> Vec<Attribute> {
        self.changes.keys()
    }

    pub fn contains(&self, attr: Attribute) -> bool {
        self.changes.contains(attr)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The column as it will be after the change.
    pub fn result_column(&self) -> ColumnDef {
        self.changes.apply(&self.current)
    }

    /// A new snapshot of `table` with this delta applied to the column.
    ///
    /// `table` itself is not modified.
    pub fn apply_to(&self, table: &TableDef) -> ChangesetResult<TableDef> {
        table.with_column_replaced(&self.current.name, self.result_column())
    }
}

/// Builder for [`ColumnDelta`].
///
/// The current column is resolved from exactly one of: a column definition
/// ([`column`](Self::column)), or a table plus column name
/// ([`table`](Self::table) and [`column_name`](Self::column_name)). The
/// requested state is a whole replacement column, discrete overrides, or
/// both (overrides win).
#[derive(Debug, Default)]
pub struct ColumnDeltaBuilder<'a> {
    column: Option<&'a ColumnDef>,
    table: Option<&'a TableDef>,
    column_name: Option<String>,
    replacement: Option<ColumnDef>,
    overrides: ColumnChanges,
}

impl<'a> ColumnDeltaBuilder<'a> {
    pub fn column(mut self, column: &'a ColumnDef) -> Self {
        self.column = Some(column);
        self
    }

    pub fn table(mut self, table: &'a TableDef) -> Self {
        self.table = Some(table);
        self
    }

    pub fn column_name(mut self, name: impl Into<String>) -> Self {
        self.column_name = Some(name.into());
        self
    }

    /// Request a full redefinition: every attribute counts as specified.
    pub fn replacement(mut self, column: ColumnDef) -> Self {
        self.replacement = Some(column);
        self
    }

    /// Request discrete attribute changes.
    pub fn changes(mut self, changes: ColumnChanges) -> Self {
        self.overrides = self.overrides.overlay(changes);
        self
    }

    pub fn build(self) -> ChangesetResult<ColumnDelta> {
        let (table_name, current) = match (self.column, self.table, self.column_name) {
            (Some(col), None, None) => (None, col.clone()),
            (None, Some(table), Some(name)) => {
                let col = table
                    .column(&name)
                    .ok_or_else(|| ChangesetError::ColumnNotFound {
                        table: table.name.clone(),
                        column: name.clone(),
                    })?;
                (Some(table.name.clone()), col.clone())
            }
            (None, None, None) => {
                return Err(ChangesetError::InvalidParameters(
                    "a column or a table and column name is required".to_string(),
                ))
            }
            (None, Some(table), None) => {
                return Err(ChangesetError::InvalidParameters(format!(
                    "column name required to resolve a column of table '{}'",
                    table.name
                )))
            }
            (None, None, Some(name)) => {
                return Err(ChangesetError::InvalidParameters(format!(
                    "table required to resolve column '{name}'"
                )))
            }
            (Some(col), _, _) => {
                return Err(ChangesetError::InvalidParameters(format!(
                    "column '{}' given together with a table reference",
                    col.name
                )))
            }
        };

        let requested = self
            .replacement
            .as_ref()
            .map(ColumnChanges::from_column)
            .unwrap_or_default()
            .overlay(self.overrides);

        Ok(ColumnDelta::compute(table_name, current, requested))
    }
}

#[cfg(test)]
#[path = "delta_test.rs"]
mod tests;
