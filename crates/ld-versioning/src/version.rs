//! A single schema version and its scripts.

use crate::error::{VersioningError, VersioningResult};
use crate::script::{DeclarativeScript, Script, StatementScript};
use ld_core::{DialectTag, Direction, VersionNumber};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Dialect tags that themselves contain `_`.
const COMPOUND_DIALECTS: &[&str] = &["ibm_db_sa"];

/// What a script filename says about the script.
///
/// Statement scripts: `<version>[_<description>]_<dialect>_<direction>.sql`,
/// or `<version>_<direction>.sql` for the default dialect.
/// Declarative scripts: `<version>[_<description>].yml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptFileName {
    Statement {
        version: VersionNumber,
        description: Option<String>,
        dialect: DialectTag,
        direction: Direction,
    },
    Declarative {
        version: VersionNumber,
        description: Option<String>,
    },
}

impl ScriptFileName {
    /// Parse the file name part of `path`.
    pub fn parse(path: &Path) -> VersioningResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| VersioningError::script(path, "file name is not valid UTF-8"))?;
        let (stem, ext) = file_name
            .rsplit_once('.')
            .ok_or_else(|| VersioningError::script(path, "missing file extension"))?;

        let parts: Vec<&str> = stem.split('_').collect();
        let version: VersionNumber = parts[0].parse().map_err(|_| {
            VersioningError::script(path, format!("'{}' is not a version number", parts[0]))
        })?;

        match ext {
            "sql" => Self::parse_statement(path, version, &parts),
            "yml" | "yaml" => {
                let description = (parts.len() > 1).then(|| parts[1..].join("_"));
                Ok(ScriptFileName::Declarative {
                    version,
                    description,
                })
            }
            other => Err(VersioningError::script(
                path,
                format!("unsupported script extension '.{other}'"),
            )),
        }
    }

    fn parse_statement(path: &Path, version: VersionNumber, parts: &[&str]) -> VersioningResult<Self> {
        if parts.len() < 2 {
            return Err(VersioningError::script(
                path,
                "expected <version>[_<description>]_<dialect>_<upgrade|downgrade>.sql",
            ));
        }
        let op = parts[parts.len() - 1];
        let direction: Direction = op.parse().map_err(|_| {
            VersioningError::script(path, format!("'{op}' is not upgrade or downgrade"))
        })?;

        let head = &parts[1..parts.len() - 1];
        let stem_without_op = head.join("_");
        let compound = COMPOUND_DIALECTS
            .iter()
            .find(|d| stem_without_op == **d || stem_without_op.ends_with(&format!("_{d}")));

        let (dialect, description_parts) = match (compound, head.len()) {
            (_, 0) => (DialectTag::default_tag(), &head[..0]),
            (Some(compound), _) => {
                let width = compound.split('_').count();
                // A compound dialect must be preceded by a description.
                if head.len() <= width {
                    return Err(VersioningError::script(
                        path,
                        format!("dialect '{compound}' requires a description segment"),
                    ));
                }
                (
                    DialectTag::new(*compound)?,
                    &head[..head.len() - width],
                )
            }
            (None, n) => {
                let dialect = DialectTag::new(head[n - 1]).map_err(|e| {
                    VersioningError::script(path, e.to_string())
                })?;
                (dialect, &head[..n - 1])
            }
        };

        let description = (!description_parts.is_empty()).then(|| description_parts.join("_"));
        Ok(ScriptFileName::Statement {
            version,
            description,
            dialect,
            direction,
        })
    }

    pub fn version(&self) -> VersionNumber {
        match self {
            ScriptFileName::Statement { version, .. } | ScriptFileName::Declarative { version, .. } => {
                *version
            }
        }
    }

    /// File name of a new statement script.
    pub fn statement(
        version: VersionNumber,
        description: &str,
        dialect: &DialectTag,
        direction: Direction,
    ) -> String {
        if description.is_empty() {
            format!("{:03}_{}_{}.sql", version.value(), dialect, direction)
        } else {
            format!(
                "{:03}_{}_{}_{}.sql",
                version.value(),
                description,
                dialect,
                direction
            )
        }
    }

    /// File name of a new declarative script.
    pub fn declarative(version: VersionNumber, description: &str) -> String {
        if description.is_empty() {
            format!("{:03}.yml", version.value())
        } else {
            format!("{:03}_{}.yml", version.value(), description)
        }
    }
}

/// One schema version: the scripts that move a schema to it and back.
///
/// Holds at most one statement script per (dialect, direction) and at most
/// one declarative script. A version without any script is a valid no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    number: VersionNumber,
    path: PathBuf,
    statements: BTreeMap<(DialectTag, Direction), Script>,
    declarative: Option<Script>,
}

impl Version {
    /// An empty version rooted at `path`.
    pub fn new(number: VersionNumber, path: impl Into<PathBuf>) -> Self {
        Self {
            number,
            path: path.into(),
            statements: BTreeMap::new(),
            declarative: None,
        }
    }

    /// Load every script in a version directory. Hidden files are ignored.
    pub fn load(number: VersionNumber, path: impl Into<PathBuf>) -> VersioningResult<Self> {
        let mut version = Self::new(number, path);
        let entries =
            std::fs::read_dir(&version.path).map_err(|e| VersioningError::io(&version.path, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| VersioningError::io(&version.path, e))?;
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                continue;
            }
            files.push(entry.path());
        }
        files.sort();
        for file in files {
            version.add_script(&file)?;
        }
        Ok(version)
    }

    pub fn number(&self) -> VersionNumber {
        self.number
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a script file. A relative path is resolved against the
    /// version directory.
    pub fn add_script(&mut self, path: &Path) -> VersioningResult<()> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.path.join(path)
        };

        let parsed = ScriptFileName::parse(&path)?;
        if parsed.version() != self.number {
            return Err(VersioningError::script(
                &path,
                format!(
                    "script is numbered {} but belongs to version {}",
                    parsed.version(),
                    self.number
                ),
            ));
        }
        if path.is_dir() {
            return Err(VersioningError::script(&path, "expected a file, found a directory"));
        }

        match parsed {
            ScriptFileName::Statement {
                dialect, direction, ..
            } => {
                let key = (dialect, direction);
                if self.statements.contains_key(&key) {
                    return Err(VersioningError::script(
                        &path,
                        format!(
                            "version {} already has a {} script for dialect '{}'",
                            self.number, key.1, key.0
                        ),
                    ));
                }
                let script = StatementScript::new(&path)?;
                self.statements.insert(key, script.into());
            }
            ScriptFileName::Declarative { .. } => {
                if let Some(existing) = &self.declarative {
                    return Err(VersioningError::script(
                        &path,
                        format!(
                            "version {} already has a declarative script: {}",
                            self.number,
                            existing.path().display()
                        ),
                    ));
                }
                let script = DeclarativeScript::new(&path)?;
                self.declarative = Some(script.into());
            }
        }
        Ok(())
    }

    /// True if no script is registered.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty() && self.declarative.is_none()
    }

    /// Every registered script.
    pub fn scripts(&self) -> impl Iterator<Item = &Script> {
        self.statements.values().chain(self.declarative.iter())
    }

    /// The script to run for `dialect` and `direction`.
    ///
    /// Exact dialect match first, then the default statement script, then the
    /// declarative script.
    pub fn script(&self, dialect: &str, direction: Direction) -> VersioningResult<&Script> {
        self.find(dialect, direction)
            .or_else(|| self.find(DialectTag::DEFAULT, direction))
            .or(self.declarative.as_ref())
            .ok_or_else(|| VersioningError::ScriptNotFound {
                version: self.number.value(),
                dialect: dialect.to_string(),
                direction: direction.to_string(),
            })
    }

    fn find(&self, dialect: &str, direction: Direction) -> Option<&Script> {
        self.statements
            .iter()
            .find(|((d, dir), _)| d.as_str() == dialect && *dir == direction)
            .map(|(_, script)| script)
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
