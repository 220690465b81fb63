//! Statement scripts: verbatim SQL files.

use super::{require_file, require_not_found, write_new, MigrationScript, ScriptOptions};
use crate::error::{VersioningError, VersioningResult};
use crate::template::TemplateKind;
use ld_core::Direction;
use ld_db::Connection;
use ld_sql::{is_ignorable, split_statements};
use minijinja::context;
use std::path::{Path, PathBuf};

/// A file of SQL statements for one dialect and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementScript {
    path: PathBuf,
}

impl StatementScript {
    /// Open an existing script.
    pub fn new(path: impl Into<PathBuf>) -> VersioningResult<Self> {
        let path = path.into();
        require_file(&path)?;
        Self::verify(&path)?;
        Ok(Self { path })
    }

    /// Statements to execute, split for `dialect`.
    ///
    /// Comment-only segments are dropped; ignorable statements are kept.
    pub fn statements(&self, dialect: &str) -> VersioningResult<Vec<String>> {
        let text = self.source()?;
        split_statements(&text, dialect)
            .map_err(|e| VersioningError::script(&self.path, e.to_string()))
    }
}

impl MigrationScript for StatementScript {
    fn create(path: &Path, options: &ScriptOptions) -> VersioningResult<Self> {
        require_not_found(path)?;
        let text = options.templates().render(
            TemplateKind::StatementScript,
            context! {
                version => options.version,
                direction => options.direction.map(Direction::as_str).unwrap_or_default(),
                description => &options.description,
            },
        )?;
        write_new(path, &text)?;
        Self::new(path)
    }

    /// Statement scripts must be UTF-8 text.
    fn verify(path: &Path) -> VersioningResult<()> {
        match std::fs::read_to_string(path) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                Err(VersioningError::script(path, "not valid UTF-8 text"))
            }
            Err(e) => Err(VersioningError::io(path, e)),
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// Execute every statement in order. Bare `COMMIT` statements are
    /// skipped: the caller owns the transaction.
    fn apply(&self, conn: &dyn Connection, _direction: Direction) -> VersioningResult<()> {
        let statements = self.statements(conn.dialect())?;
        for statement in &statements {
            if is_ignorable(statement) {
                log::warn!(
                    "\"{}\" found in SQL script {}; ignoring",
                    statement,
                    self.path.display()
                );
                continue;
            }
            if let Err(e) = conn.execute_batch(statement) {
                log::error!("SQL script {} failed: {}", self.path.display(), e);
                return Err(VersioningError::execution(&self.path, e));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "statement_test.rs"]
mod tests;
