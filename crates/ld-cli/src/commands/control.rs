//! Version control commands: version-control, db-version, drop-version-control

use anyhow::{Context, Result};
use ld_core::VersionNumber;
use ld_versioning::{drop_control, ControlledSchema};
use serde::Serialize;

use crate::cli::{DbVersionArgs, DropVersionControlArgs, GlobalArgs, OutputFormat, VersionControlArgs};
use crate::commands::common::{load_repository, open_connection, print_json};

/// Execute the version-control command
pub(crate) fn version_control(args: &VersionControlArgs, global: &GlobalArgs) -> Result<()> {
    let repo = load_repository(global)?;
    let conn = open_connection(&args.db)?;
    let schema = ControlledSchema::create(conn.as_ref(), &repo, args.version.map(VersionNumber::from))
        .context("Failed to put database under version control")?;
    println!(
        "Database is under version control of '{}' at version {}",
        repo.id(),
        schema.version()
    );
    Ok(())
}

#[derive(Serialize)]
struct DatabaseVersion<'a> {
    repository_id: &'a str,
    version: u64,
    latest: u64,
}

/// Execute the db-version command
pub(crate) fn db_version(args: &DbVersionArgs, global: &GlobalArgs) -> Result<()> {
    let repo = load_repository(global)?;
    let conn = open_connection(&args.db)?;
    let schema = ControlledSchema::load(conn.as_ref(), &repo)
        .context("Failed to read database version")?;
    match args.format {
        OutputFormat::Text => println!("{}", schema.version()),
        OutputFormat::Json => print_json(&DatabaseVersion {
            repository_id: repo.id(),
            version: schema.version().value(),
            latest: repo.latest().value(),
        })?,
    }
    Ok(())
}

/// Execute the drop-version-control command
pub(crate) fn drop_version_control(args: &DropVersionControlArgs, global: &GlobalArgs) -> Result<()> {
    let repo = load_repository(global)?;
    let conn = open_connection(&args.db)?;
    drop_control(conn.as_ref(), &repo).context("Failed to drop version control")?;
    println!("Dropped version table '{}'", repo.version_table());
    Ok(())
}
