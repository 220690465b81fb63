//! Error types for ld-sql

use thiserror::Error;

/// SQL tokenizing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlError {
    /// SQL tokenize error (S001)
    #[error("[S001] SQL tokenize error at line {line}, column {column}: {message}")]
    TokenizeError {
        message: String,
        line: u64,
        column: u64,
    },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
