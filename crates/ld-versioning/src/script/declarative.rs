//! Declarative scripts: YAML lists of schema operations.
//!
//! ```yaml
//! upgrade:
//!   - add_column:
//!       table: users
//!       column: { name: email, type: VARCHAR(120) }
//! downgrade:
//!   - drop_column: { table: users, column: email }
//! ```

use super::{require_file, require_not_found, write_new, MigrationScript, ScriptOptions};
use crate::error::{VersioningError, VersioningResult};
use crate::template::TemplateKind;
use ld_changeset::{run_operations, Operation};
use ld_core::Direction;
use ld_db::Connection;
use minijinja::context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Parsed content of a declarative script. Both keys are required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarativeDocument {
    pub upgrade: Vec<Operation>,
    pub downgrade: Vec<Operation>,
}

impl DeclarativeDocument {
    pub fn operations(&self, direction: Direction) -> &[Operation] {
        match direction {
            Direction::Upgrade => &self.upgrade,
            Direction::Downgrade => &self.downgrade,
        }
    }
}

/// A declarative script. Applies to every dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarativeScript {
    path: PathBuf,
}

impl DeclarativeScript {
    /// Open and verify an existing script.
    pub fn new(path: impl Into<PathBuf>) -> VersioningResult<Self> {
        let path = path.into();
        require_file(&path)?;
        Self::verify(&path)?;
        Ok(Self { path })
    }

    /// Parse the script file.
    pub fn document(&self) -> VersioningResult<DeclarativeDocument> {
        parse(&self.path)
    }
}

fn parse(path: &Path) -> VersioningResult<DeclarativeDocument> {
    let text = std::fs::read_to_string(path).map_err(|e| VersioningError::io(path, e))?;
    parse_text(path, &text)
}

/// `path` is only used in error messages.
fn parse_text(path: &Path, text: &str) -> VersioningResult<DeclarativeDocument> {
    serde_yaml::from_str(text).map_err(|e| VersioningError::script(path, e.to_string()))
}

impl MigrationScript for DeclarativeScript {
    fn create(path: &Path, options: &ScriptOptions) -> VersioningResult<Self> {
        require_not_found(path)?;
        let text = options.templates().render(
            TemplateKind::DeclarativeScript,
            context! {
                version => options.version,
                description => &options.description,
            },
        )?;
        // Nothing is written for a template that renders an invalid document
        parse_text(path, &text)?;
        write_new(path, &text)?;
        Self::new(path)
    }

    /// The file must parse with both `upgrade` and `downgrade` present.
    fn verify(path: &Path) -> VersioningResult<()> {
        parse(path).map(|_| ())
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn apply(&self, conn: &dyn Connection, direction: Direction) -> VersioningResult<()> {
        let document = self.document()?;
        let operations = document.operations(direction);
        log::debug!(
            "{} {}: {} operation(s)",
            self.path.display(),
            direction,
            operations.len()
        );
        run_operations(conn, operations).map_err(|e| {
            log::error!("Declarative script {} failed: {}", self.path.display(), e);
            VersioningError::execution(&self.path, e)
        })
    }
}

#[cfg(test)]
#[path = "declarative_test.rs"]
mod tests;
