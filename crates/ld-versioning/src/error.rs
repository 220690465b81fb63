//! Error types for ld-versioning

use ld_core::CoreError;
use ld_db::DbError;
use thiserror::Error;

/// Repository and controlled-schema errors
#[derive(Error, Debug)]
pub enum VersioningError {
    /// M001: Required path does not exist
    #[error("[M001] Path not found: {path}")]
    PathNotFound { path: String },

    /// M002: Path that would be created already exists
    #[error("[M002] Path already exists: {path}")]
    PathFound { path: String },

    /// M003: Repository layout is malformed
    #[error("[M003] Invalid repository at {path}: {reason}")]
    InvalidRepository { path: String, reason: String },

    /// M004: Version outside the range present in the repository
    #[error("[M004] Version {version} not found (latest is {latest})")]
    VersionNotFound { version: String, latest: u64 },

    /// M005: No script matches a dialect and direction
    #[error("[M005] No {direction} script for dialect '{dialect}' in version {version}")]
    ScriptNotFound {
        version: u64,
        dialect: String,
        direction: String,
    },

    /// M006: Script filename or content is malformed
    #[error("[M006] Script error in {path}: {reason}")]
    ScriptError { path: String, reason: String },

    /// M007: Script file named correctly but missing on disk
    #[error("[M007] Script file does not exist: {path}")]
    InvalidScript { path: String },

    /// M008: A script failed while running against the database
    #[error("[M008] Script {path} failed: {message}")]
    ExecutionError {
        path: String,
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// M009: Bookkeeping table already present
    #[error("[M009] Database is already under version control (table '{table}' exists)")]
    AlreadyControlled { table: String },

    /// M010: Bookkeeping table or row missing
    #[error("[M010] Database is not under version control for repository '{repository}' (table '{table}')")]
    NotControlled { table: String, repository: String },

    /// M011: Requested version transition is not allowed
    #[error("[M011] Invalid version {version}: {reason}")]
    InvalidVersion { version: String, reason: String },

    /// M012: Repository config could not be read or is invalid
    #[error("[M012] Invalid repository config {path}: {message}")]
    Config { path: String, message: String },

    /// M013: Template failed to load or render
    #[error("[M013] Template error: {0}")]
    Template(String),

    /// M014: IO error with path context
    #[error("[M014] IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// M015: Value type error
    #[error("[M015] {0}")]
    Core(#[from] CoreError),

    /// M016: Database error outside script execution
    #[error("[M016] Database error: {0}")]
    Db(#[from] DbError),
}

/// Result type alias for VersioningError
pub type VersioningResult<T> = Result<T, VersioningError>;

impl VersioningError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        VersioningError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn script(path: &std::path::Path, reason: impl Into<String>) -> Self {
        VersioningError::ScriptError {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn execution<E>(path: &std::path::Path, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        VersioningError::ExecutionError {
            path: path.display().to_string(),
            message: source.to_string(),
            source: Box::new(source),
        }
    }
}

impl From<minijinja::Error> for VersioningError {
    fn from(err: minijinja::Error) -> Self {
        VersioningError::Template(err.to_string())
    }
}
