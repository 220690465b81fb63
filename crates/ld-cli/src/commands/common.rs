//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use ld_core::Direction;
use ld_db::{construct_connection, Connection, ConnectionOptions};
use ld_versioning::{ChangesetStep, Repository};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::{DbArgs, GlobalArgs, OutputFormat};

/// Load the repository named by the global `--repository` flag.
pub(crate) fn load_repository(global: &GlobalArgs) -> Result<Repository> {
    Repository::at(&global.repository).with_context(|| {
        format!(
            "Failed to load repository at {}",
            global.repository.display()
        )
    })
}

/// Engine options from repeated `-o KEY=VALUE` flags.
pub(crate) fn connection_options(db: &DbArgs) -> ConnectionOptions {
    ConnectionOptions::from_keyed(db.options.iter().cloned())
}

/// Open the database named by `--url`.
pub(crate) fn open_connection(db: &DbArgs) -> Result<Box<dyn Connection>> {
    construct_connection(db.url.as_str(), &connection_options(db))
        .with_context(|| format!("Failed to connect to {}", db.url))
}

/// One step of a changeset, as shown to the user.
#[derive(Debug, Serialize)]
pub(crate) struct StepInfo {
    pub(crate) version: u64,
    pub(crate) from: u64,
    pub(crate) direction: String,
    pub(crate) target: u64,
    pub(crate) script: Option<PathBuf>,
}

impl From<&ChangesetStep<'_>> for StepInfo {
    fn from(step: &ChangesetStep<'_>) -> Self {
        let from = match step.direction {
            Direction::Upgrade => step.version.value().saturating_sub(1),
            Direction::Downgrade => step.version.value(),
        };
        StepInfo {
            version: step.version.value(),
            from,
            direction: step.direction.to_string(),
            target: step.target().value(),
            script: step.script.map(|s| s.path().to_path_buf()),
        }
    }
}

/// Print a changeset in the requested format.
pub(crate) fn print_steps(steps: &[StepInfo], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&steps),
        OutputFormat::Text => {
            if steps.is_empty() {
                println!("Nothing to do");
            }
            for step in steps {
                let script = step
                    .script
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(no script)".to_string());
                println!(
                    "{} -> {}: {} {}",
                    step.from,
                    step.target,
                    step.direction,
                    script
                );
            }
            Ok(())
        }
    }
}

/// Pretty-print any serializable value as JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
