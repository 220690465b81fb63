//! Repository commands: create, script, script-sql, version

use anyhow::{Context, Result};
use ld_versioning::{Repository, ScriptOptions, Version};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::cli::{CreateArgs, GlobalArgs, OutputFormat, ScriptArgs, ScriptSqlArgs, VersionArgs};
use crate::commands::common::{load_repository, print_json};

/// Execute the create command
pub(crate) fn create(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let mut overrides = BTreeMap::new();
    if let Some(table) = &args.version_table {
        overrides.insert("version_table".to_string(), table.clone());
    }
    let repo = Repository::create(&args.path, &args.name, &overrides)
        .with_context(|| format!("Failed to create repository at {}", args.path.display()))?;

    println!("Created repository '{}' at {}", repo.id(), repo.path().display());
    if global.verbose {
        println!("  Version table: {}", repo.version_table());
    }
    Ok(())
}

/// Execute the script command
pub(crate) fn script(args: &ScriptArgs, global: &GlobalArgs) -> Result<()> {
    let mut repo = load_repository(global)?;
    let options = script_options(args.templates.as_ref());
    let version = repo
        .create_new_declarative_version(&args.description, &options)
        .context("Failed to create declarative version")?;
    report_new_version(version);
    Ok(())
}

/// Execute the script-sql command
pub(crate) fn script_sql(args: &ScriptSqlArgs, global: &GlobalArgs) -> Result<()> {
    let mut repo = load_repository(global)?;
    let options = script_options(args.templates.as_ref());
    let version = repo
        .create_new_sql_version(&args.dialect, &args.description, &options)
        .with_context(|| format!("Failed to create {} version", args.dialect))?;
    report_new_version(version);
    Ok(())
}

#[derive(Serialize)]
struct RepositoryVersion<'a> {
    repository_id: &'a str,
    latest: u64,
}

/// Execute the version command
pub(crate) fn version(args: &VersionArgs, global: &GlobalArgs) -> Result<()> {
    let repo = load_repository(global)?;
    match args.format {
        OutputFormat::Text => println!("{}", repo.latest()),
        OutputFormat::Json => print_json(&RepositoryVersion {
            repository_id: repo.id(),
            latest: repo.latest().value(),
        })?,
    }
    Ok(())
}

fn script_options(templates: Option<&std::path::PathBuf>) -> ScriptOptions {
    ScriptOptions {
        templates_path: templates.cloned(),
        ..Default::default()
    }
}

fn report_new_version(version: &Version) {
    println!("Created version {}", version.number());
    for script in version.scripts() {
        println!("  {}", script.path().display());
    }
}
