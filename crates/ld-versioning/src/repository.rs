//! Versioned script repositories.
//!
//! Layout on disk:
//!
//! ```text
//! repo/
//!   migrate.yml       repository config
//!   README
//!   1/                one directory per version, contiguous from 1
//!     001_add_users_duckdb_upgrade.sql
//!     001_add_users_duckdb_downgrade.sql
//!   2/
//!     002_backfill.yml
//! ```
//!
//! Version 0 is the empty schema and has no directory.

use crate::config::{RepositoryConfig, CONFIG_FILE};
use crate::error::{VersioningError, VersioningResult};
use crate::script::{DeclarativeScript, MigrationScript, Script, ScriptOptions, StatementScript};
use crate::template::{TemplateKind, Templates};
use crate::version::{ScriptFileName, Version};
use ld_core::{str_to_filename, DialectTag, Direction, VersionNumber};
use minijinja::context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// README file name
pub const README_FILE: &str = "README";

/// One step of a changeset: run `script` of `version` in `direction`.
#[derive(Debug, Clone, Copy)]
pub struct ChangesetStep<'r> {
    pub version: VersionNumber,
    pub direction: Direction,
    /// `None` for a version without scripts
    pub script: Option<&'r Script>,
}

impl ChangesetStep<'_> {
    /// The schema version once this step has been applied.
    pub fn target(&self) -> VersionNumber {
        match self.direction {
            Direction::Upgrade => self.version,
            // Version numbers of steps are >= 1
            Direction::Downgrade => VersionNumber::from(self.version.value().saturating_sub(1)),
        }
    }
}

/// A loaded repository.
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
    config: RepositoryConfig,
    versions: Vec<Version>,
}

impl Repository {
    /// Create a new repository at `path` with built-in templates.
    pub fn create(
        path: &Path,
        name: &str,
        overrides: &BTreeMap<String, String>,
    ) -> VersioningResult<Self> {
        Self::create_with(path, name, overrides, &Templates::builtin())
    }

    /// Create a new repository at `path`, rendering files with `templates`.
    ///
    /// Fails with `PathFound` if `path` exists.
    pub fn create_with(
        path: &Path,
        name: &str,
        overrides: &BTreeMap<String, String>,
        templates: &Templates,
    ) -> VersioningResult<Self> {
        if path.exists() {
            return Err(VersioningError::PathFound {
                path: path.display().to_string(),
            });
        }
        let config_file = path.join(CONFIG_FILE);
        let config_text = RepositoryConfig::prepare(templates, name, overrides)?;
        RepositoryConfig::parse(&config_text).map_err(|message| VersioningError::Config {
            path: config_file.display().to_string(),
            message,
        })?;
        let readme = templates.render(
            TemplateKind::RepositoryReadme,
            context! { repository_id => name },
        )?;

        std::fs::create_dir_all(path).map_err(|e| VersioningError::io(path, e))?;
        let created = crate::script::write_new(&config_file, &config_text)
            .and_then(|()| crate::script::write_new(&path.join(README_FILE), &readme))
            .and_then(|()| Self::at(path));
        if created.is_err() {
            if let Err(cleanup) = std::fs::remove_dir_all(path) {
                log::error!("Failed to remove {}: {}", path.display(), cleanup);
            }
        } else {
            log::info!("Created repository '{}' at {}", name, path.display());
        }
        created
    }

    /// Load the repository at `path`.
    pub fn at(path: &Path) -> VersioningResult<Self> {
        if !path.is_dir() {
            return Err(VersioningError::PathNotFound {
                path: path.display().to_string(),
            });
        }
        let config = RepositoryConfig::load_from_dir(path)?;

        let invalid = |reason: String| VersioningError::InvalidRepository {
            path: path.display().to_string(),
            reason,
        };

        let mut numbered: BTreeMap<VersionNumber, PathBuf> = BTreeMap::new();
        let entries = std::fs::read_dir(path).map_err(|e| VersioningError::io(path, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| VersioningError::io(path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let entry_path = entry.path();
            let number = name.parse::<VersionNumber>();
            if entry_path.is_dir() {
                let number = number.map_err(|_| {
                    invalid(format!("'{name}' is not a version directory"))
                })?;
                if number == 0 {
                    return Err(invalid("version 0 cannot have a directory".to_string()));
                }
                if let Some(previous) = numbered.insert(number, entry_path) {
                    return Err(invalid(format!(
                        "version {} appears twice ({} and {name})",
                        number,
                        previous.display()
                    )));
                }
            } else if number.is_ok() {
                return Err(invalid(format!(
                    "'{name}' is a file; versions must be directories"
                )));
            }
        }

        let mut versions = Vec::with_capacity(numbered.len());
        for (index, (number, dir)) in numbered.into_iter().enumerate() {
            let expected = index as u64 + 1;
            if number != expected {
                return Err(invalid(format!(
                    "version {expected} is missing (found {number})"
                )));
            }
            versions.push(Version::load(number, dir)?);
        }

        log::debug!(
            "Loaded repository '{}' with {} version(s)",
            config.repository_id,
            versions.len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            config,
            versions,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn id(&self) -> &str {
        &self.config.repository_id
    }

    pub fn version_table(&self) -> &str {
        &self.config.version_table
    }

    /// Highest version, or 0 for an empty repository.
    pub fn latest(&self) -> VersionNumber {
        VersionNumber::from(self.versions.len() as u64)
    }

    /// Versions 1..=latest, in order.
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// Version `number`, which must be in 1..=latest.
    pub fn version(&self, number: VersionNumber) -> VersioningResult<&Version> {
        let index = number.value().checked_sub(1).map(|i| i as usize);
        index
            .and_then(|i| self.versions.get(i))
            .ok_or_else(|| VersioningError::VersionNotFound {
                version: number.to_string(),
                latest: self.latest().value(),
            })
    }

    /// Create the next version with an empty declarative script.
    pub fn create_new_declarative_version(
        &mut self,
        description: &str,
        options: &ScriptOptions,
    ) -> VersioningResult<&Version> {
        let description = str_to_filename(description);
        let (number, dir) = self.allocate_version()?;
        let options = ScriptOptions {
            version: number.value(),
            description: description.clone(),
            ..options.clone()
        };
        let file = dir.join(ScriptFileName::declarative(number, &description));
        self.populate_version(number, dir, || {
            DeclarativeScript::create(&file, &options).map(|_| ())
        })
    }

    /// Create the next version with empty upgrade and downgrade statement
    /// scripts for `dialect`.
    pub fn create_new_sql_version(
        &mut self,
        dialect: &str,
        description: &str,
        options: &ScriptOptions,
    ) -> VersioningResult<&Version> {
        let dialect = DialectTag::new(dialect)?;
        let description = str_to_filename(description);
        if description.is_empty() && dialect.contains('_') {
            return Err(VersioningError::ScriptError {
                path: self.path.display().to_string(),
                reason: format!("dialect '{dialect}' requires a description"),
            });
        }

        let (number, dir) = self.allocate_version()?;
        let version_dir = dir.clone();
        self.populate_version(number, dir, || {
            for direction in Direction::all() {
                let options = ScriptOptions {
                    version: number.value(),
                    direction: Some(direction),
                    description: description.clone(),
                    ..options.clone()
                };
                let file = version_dir.join(ScriptFileName::statement(
                    number,
                    &description,
                    &dialect,
                    direction,
                ));
                StatementScript::create(&file, &options)?;
            }
            Ok(())
        })
    }

    fn allocate_version(&self) -> VersioningResult<(VersionNumber, PathBuf)> {
        let number = self.latest().next()?;
        let dir = self.path.join(number.to_string());
        if dir.exists() {
            return Err(VersioningError::PathFound {
                path: dir.display().to_string(),
            });
        }
        std::fs::create_dir(&dir).map_err(|e| VersioningError::io(&dir, e))?;
        Ok((number, dir))
    }

    /// Write the files of a freshly allocated version with `write`, then
    /// register it. On any failure the version directory is removed again,
    /// so the repository stays loadable.
    fn populate_version<F>(
        &mut self,
        number: VersionNumber,
        dir: PathBuf,
        write: F,
    ) -> VersioningResult<&Version>
    where
        F: FnOnce() -> VersioningResult<()>,
    {
        let loaded = write().and_then(|()| Version::load(number, dir.clone()));
        let version = match loaded {
            Ok(version) => version,
            Err(e) => {
                if let Err(cleanup) = std::fs::remove_dir_all(&dir) {
                    log::error!("Failed to remove {}: {}", dir.display(), cleanup);
                }
                return Err(e);
            }
        };
        log::info!("Created version {} in {}", number, version.path().display());
        self.versions.push(version);
        self.version(number)
    }

    /// The ordered steps that move a `dialect` schema from `start` to `end`.
    ///
    /// Upgrading runs the upgrade scripts of versions start+1..=end; going
    /// down runs the downgrade scripts of versions start..=end+1. Every
    /// script is resolved before the list is returned.
    pub fn changeset(
        &self,
        dialect: &str,
        start: VersionNumber,
        end: VersionNumber,
    ) -> VersioningResult<Vec<ChangesetStep<'_>>> {
        let latest = self.latest();
        for v in [start, end] {
            if v > latest {
                return Err(VersioningError::InvalidVersion {
                    version: v.to_string(),
                    reason: format!("repository latest version is {latest}"),
                });
            }
        }

        let (direction, numbers): (Direction, Vec<u64>) = if start <= end {
            (
                Direction::Upgrade,
                (start.value() + 1..=end.value()).collect(),
            )
        } else {
            (
                Direction::Downgrade,
                (end.value() + 1..=start.value()).rev().collect(),
            )
        };

        numbers
            .into_iter()
            .map(|n| {
                let version = self.version(VersionNumber::from(n))?;
                let script = if version.is_empty() {
                    None
                } else {
                    Some(version.script(dialect, direction)?)
                };
                Ok(ChangesetStep {
                    version: version.number(),
                    direction,
                    script,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod tests;
