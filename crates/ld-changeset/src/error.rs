//! Error types for ld-changeset

use ld_db::DbError;
use thiserror::Error;

/// Schema change errors
#[derive(Error, Debug)]
pub enum ChangesetError {
    /// Ambiguous or missing parameters (C001)
    #[error("[C001] Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Column not present in the table definition (C002)
    #[error("[C002] Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// The dialect cannot express the requested change (C003)
    #[error("[C003] {operation} is not supported by dialect '{dialect}'")]
    NotSupported { dialect: String, operation: String },

    /// No capability implementation for a dialect tag (C004)
    #[error("[C004] Unknown dialect '{0}'")]
    UnknownDialect(String),

    /// Column type text could not be understood (C005)
    #[error("[C005] Invalid column type '{0}'")]
    InvalidType(String),

    /// Database error while reflecting or executing (C006)
    #[error("[C006] Database error: {0}")]
    Db(#[from] DbError),
}

/// Result type alias for ChangesetError
pub type ChangesetResult<T> = Result<T, ChangesetError>;
