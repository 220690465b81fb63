//! ld-versioning - Versioned migrations for Ladder
//!
//! A [`Repository`] is a directory of numbered version directories, each
//! holding the scripts that move a schema one step up or down. A
//! [`ControlledSchema`] binds a repository to a live database, reads the
//! currently applied version from a bookkeeping table and replays scripts
//! one version at a time, each step in its own transaction.

pub mod config;
pub mod controlled;
pub mod error;
pub mod repository;
pub mod script;
pub mod template;
pub mod version;

pub use config::RepositoryConfig;
pub use controlled::{drop_control, ControlledSchema};
pub use error::{VersioningError, VersioningResult};
pub use repository::{ChangesetStep, Repository};
pub use script::{DeclarativeScript, MigrationScript, Script, ScriptOptions, StatementScript};
pub use template::{TemplateKind, Templates};
pub use version::{ScriptFileName, Version};
