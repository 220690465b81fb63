//! ld-changeset - Declarative schema changes for Ladder
//!
//! Declarative migration scripts describe structural changes as data
//! ([`Operation`]). This crate models tables and columns, computes the
//! minimal [`ColumnDelta`] between a column's current and requested
//! definitions, and renders operations to DDL through a per-engine
//! [`DialectCapabilities`] implementation selected by dialect tag.

pub mod capabilities;
pub mod delta;
pub mod error;
pub mod operations;
pub mod schema;

pub use capabilities::{capabilities_for, DialectCapabilities};
pub use delta::{Attribute, ColumnChanges, ColumnDelta, ColumnDeltaBuilder};
pub use error::{ChangesetError, ChangesetResult};
pub use operations::{run_operations, Operation};
pub use schema::{ColumnDef, ColumnType, Constraint, ConstraintKind, ServerDefault, TableDef};
