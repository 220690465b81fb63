//! ld-db - Database layer for Ladder
//!
//! This crate provides the synchronous [`Connection`] trait the migration
//! engine borrows for every operation, a DuckDB implementation, a
//! scope-guarded [`Transaction`], and [`construct_connection`] which turns a
//! URL plus options into a ready connection.

pub mod duckdb;
pub mod error;
pub mod factory;
pub mod traits;
pub mod transaction;

pub use duckdb::DuckDbConnection;
pub use error::{DbError, DbResult};
pub use factory::{construct_connection, ConnectionOptions, ConnectionSource};
pub use traits::{Connection, ReflectedColumn, SqlValue};
pub use transaction::{with_transaction, Transaction};
