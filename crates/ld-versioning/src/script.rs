//! Migration scripts.
//!
//! Two kinds of script move a schema between versions:
//!
//! - [`StatementScript`]: verbatim SQL, split and executed one statement at
//!   a time
//! - [`DeclarativeScript`]: a YAML document listing structural operations
//!   for each direction
//!
//! Both implement [`MigrationScript`]; [`Script`] holds either.

pub mod declarative;
pub mod statement;

pub use declarative::DeclarativeScript;
pub use statement::StatementScript;

use crate::error::{VersioningError, VersioningResult};
use crate::template::Templates;
use ld_core::Direction;
use ld_db::{with_transaction, Connection};
use std::path::{Path, PathBuf};

/// Options for creating new script files.
#[derive(Debug, Clone, Default)]
pub struct ScriptOptions {
    /// Directory with template overrides
    pub templates_path: Option<PathBuf>,
    /// Version number rendered into the template
    pub version: u64,
    /// Direction rendered into statement script templates
    pub direction: Option<Direction>,
    /// Free-text description rendered into the template
    pub description: String,
}

impl ScriptOptions {
    pub(crate) fn templates(&self) -> Templates {
        Templates::new(self.templates_path.as_deref())
    }
}

/// Contract shared by every kind of migration script.
pub trait MigrationScript: Sized {
    /// Write a new script at `path` from its template.
    ///
    /// Fails with `PathFound` if `path` already exists.
    fn create(path: &Path, options: &ScriptOptions) -> VersioningResult<Self>;

    /// Check that the file at `path` is a well-formed script of this kind.
    fn verify(path: &Path) -> VersioningResult<()>;

    /// Path of the script file
    fn path(&self) -> &Path;

    /// Apply the script on `conn` inside the caller's transaction.
    fn apply(&self, conn: &dyn Connection, direction: Direction) -> VersioningResult<()>;

    /// Apply the script in a transaction of its own.
    fn run(&self, conn: &dyn Connection, direction: Direction) -> VersioningResult<()> {
        with_transaction(conn, |tx| self.apply(tx, direction))
    }

    /// Raw file content.
    fn source(&self) -> VersioningResult<String> {
        std::fs::read_to_string(self.path()).map_err(|e| VersioningError::io(self.path(), e))
    }
}

/// Any migration script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    Statement(StatementScript),
    Declarative(DeclarativeScript),
}

impl Script {
    pub fn path(&self) -> &Path {
        match self {
            Script::Statement(s) => s.path(),
            Script::Declarative(s) => s.path(),
        }
    }

    /// Apply inside the caller's transaction.
    pub fn apply(&self, conn: &dyn Connection, direction: Direction) -> VersioningResult<()> {
        match self {
            Script::Statement(s) => s.apply(conn, direction),
            Script::Declarative(s) => s.apply(conn, direction),
        }
    }

    /// Apply in a transaction of its own.
    pub fn run(&self, conn: &dyn Connection, direction: Direction) -> VersioningResult<()> {
        match self {
            Script::Statement(s) => s.run(conn, direction),
            Script::Declarative(s) => s.run(conn, direction),
        }
    }

    pub fn source(&self) -> VersioningResult<String> {
        match self {
            Script::Statement(s) => s.source(),
            Script::Declarative(s) => s.source(),
        }
    }
}

impl From<StatementScript> for Script {
    fn from(s: StatementScript) -> Self {
        Script::Statement(s)
    }
}

impl From<DeclarativeScript> for Script {
    fn from(s: DeclarativeScript) -> Self {
        Script::Declarative(s)
    }
}

/// Fail with `PathFound` if `path` exists.
pub(crate) fn require_not_found(path: &Path) -> VersioningResult<()> {
    if path.exists() {
        return Err(VersioningError::PathFound {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// Fail with `InvalidScript` if `path` is not an existing file.
pub(crate) fn require_file(path: &Path) -> VersioningResult<()> {
    if !path.is_file() {
        return Err(VersioningError::InvalidScript {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

pub(crate) fn write_new(path: &Path, content: &str) -> VersioningResult<()> {
    let mut content = content.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }
    std::fs::write(path, content).map_err(|e| VersioningError::io(path, e))
}
