//! Repository configuration (`migrate.yml`)

use crate::error::{VersioningError, VersioningResult};
use crate::template::{TemplateKind, Templates};
use ld_core::DialectTag;
use minijinja::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Repository config file name
pub const CONFIG_FILE: &str = "migrate.yml";

/// Default bookkeeping table name
pub const DEFAULT_VERSION_TABLE: &str = "migrate_version";

fn default_version_table() -> String {
    DEFAULT_VERSION_TABLE.to_string()
}

/// Settings stored at the root of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Identifies the repository in the bookkeeping table
    pub repository_id: String,

    /// Table recording the applied version
    #[serde(default = "default_version_table")]
    pub version_table: String,

    /// Dialects the repository is expected to carry scripts for.
    /// Informational only.
    #[serde(default)]
    pub required_dbs: Vec<DialectTag>,
}

impl RepositoryConfig {
    /// Config with defaults for everything but the id.
    pub fn new(repository_id: impl Into<String>) -> Self {
        Self {
            repository_id: repository_id.into(),
            version_table: default_version_table(),
            required_dbs: Vec::new(),
        }
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> VersioningResult<Self> {
        if !path.exists() {
            return Err(VersioningError::PathNotFound {
                path: path.display().to_string(),
            });
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| VersioningError::io(path, e))?;
        Self::parse(&content).map_err(|message| VersioningError::Config {
            path: path.display().to_string(),
            message,
        })
    }

    /// Load `migrate.yml` from a repository root.
    pub fn load_from_dir(dir: &Path) -> VersioningResult<Self> {
        Self::load(&dir.join(CONFIG_FILE))
    }

    pub(crate) fn parse(content: &str) -> Result<Self, String> {
        let config: RepositoryConfig =
            serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.repository_id.trim().is_empty() {
            return Err("repository_id must not be empty".to_string());
        }
        if !is_identifier(&self.version_table) {
            return Err(format!(
                "version_table '{}' must be a plain SQL identifier",
                self.version_table
            ));
        }
        Ok(())
    }

    /// Render the text of a new config file.
    ///
    /// `overrides` replace the template defaults (`version_table`) by key.
    pub fn prepare(
        templates: &Templates,
        name: &str,
        overrides: &BTreeMap<String, String>,
    ) -> VersioningResult<String> {
        let mut ctx: BTreeMap<String, String> = BTreeMap::new();
        ctx.insert("repository_id".to_string(), name.to_string());
        ctx.insert("version_table".to_string(), default_version_table());
        for (key, value) in overrides {
            ctx.insert(key.clone(), value.clone());
        }
        templates.render(TemplateKind::RepositoryConfig, Value::from_serialize(&ctx))
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
