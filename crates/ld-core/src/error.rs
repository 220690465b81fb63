//! Error types for ld-core

use thiserror::Error;

/// Core error type for Ladder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// V001: Value cannot be used as a version number
    #[error("[V001] Invalid version number '{value}': {reason}")]
    InvalidVersionNumber { value: String, reason: String },

    /// V002: Subtraction would produce a negative version number
    #[error("[V002] Version number underflow: {minuend} - {subtrahend} is negative")]
    VersionUnderflow { minuend: u64, subtrahend: u64 },

    /// V003: Unknown migration direction
    #[error("[V003] Invalid direction '{0}': expected 'upgrade' or 'downgrade'")]
    InvalidDirection(String),

    /// V004: Dialect tag is empty or malformed
    #[error("[V004] Invalid dialect tag '{0}': must be non-empty lowercase ASCII letters, digits or '_'")]
    InvalidDialectTag(String),

    /// V005: Addition would exceed the largest representable version number
    #[error("[V005] Version number overflow: {augend} + {addend} is too large")]
    VersionOverflow { augend: u64, addend: u64 },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
