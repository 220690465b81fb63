//! Templates for new repositories and scripts.
//!
//! Built-in templates are compiled in. A templates directory may override
//! any of them by providing a file at the same relative name
//! (`repository/migrate.yml`, `script/statement.sql`, ...); names it does
//! not provide fall back to the built-in text.

use crate::error::VersioningResult;
use minijinja::{path_loader, AutoEscape, Environment, Value};
use std::path::Path;

const REPOSITORY_CONFIG: &str = "\
# Ladder repository configuration
repository_id: '{{ repository_id | replace(\"'\", \"''\") }}'

# Table in the target database that records the applied version
version_table: {{ version_table }}

# Dialects this repository is expected to support
required_dbs: []
";

const REPOSITORY_README: &str = "\
This is a database migration repository for '{{ repository_id }}'.

Each numbered directory holds the scripts that move a schema from the
previous version to that version (upgrade) and back (downgrade).
";

const STATEMENT_SCRIPT: &str = "\
-- Version {{ version }}{% if direction %} {{ direction }}{% endif %}{% if description %}: {{ description }}{% endif %}
";

const DECLARATIVE_SCRIPT: &str = "\
# Version {{ version }}{% if description %}: {{ description }}{% endif %}
upgrade: []
downgrade: []
";

/// A template the engine knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    RepositoryConfig,
    RepositoryReadme,
    StatementScript,
    DeclarativeScript,
}

impl TemplateKind {
    /// Relative name, also the override path inside a templates directory
    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::RepositoryConfig => "repository/migrate.yml",
            TemplateKind::RepositoryReadme => "repository/README",
            TemplateKind::StatementScript => "script/statement.sql",
            TemplateKind::DeclarativeScript => "script/declarative.yml",
        }
    }

    fn builtin(self) -> &'static str {
        match self {
            TemplateKind::RepositoryConfig => REPOSITORY_CONFIG,
            TemplateKind::RepositoryReadme => REPOSITORY_README,
            TemplateKind::StatementScript => STATEMENT_SCRIPT,
            TemplateKind::DeclarativeScript => DECLARATIVE_SCRIPT,
        }
    }

    fn all() -> [TemplateKind; 4] {
        [
            TemplateKind::RepositoryConfig,
            TemplateKind::RepositoryReadme,
            TemplateKind::StatementScript,
            TemplateKind::DeclarativeScript,
        ]
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|k| k.name() == name)
    }
}

// Output is YAML, SQL or plain text; never escape by file extension.
fn plain_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env
}

/// Template set used when creating repositories and scripts.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Built-in templates only.
    pub fn builtin() -> Self {
        let mut env = plain_environment();
        env.set_loader(|name| Ok(TemplateKind::from_name(name).map(|k| k.builtin().to_string())));
        Self { env }
    }

    /// Templates from `dir`, falling back to the built-ins.
    pub fn from_dir(dir: &Path) -> Self {
        let files = path_loader(dir);
        let mut env = plain_environment();
        env.set_loader(move |name| match files(name)? {
            Some(source) => Ok(Some(source)),
            None => Ok(TemplateKind::from_name(name).map(|k| k.builtin().to_string())),
        });
        Self { env }
    }

    /// Built-ins, or `dir` when given.
    pub fn new(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }

    /// Render `kind` with `ctx`.
    pub fn render(&self, kind: TemplateKind, ctx: Value) -> VersioningResult<String> {
        let template = self.env.get_template(kind.name())?;
        Ok(template.render(ctx)?)
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "template_test.rs"]
mod tests;
