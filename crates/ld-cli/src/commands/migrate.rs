//! Migration commands: upgrade, downgrade, test

use anyhow::{bail, Context, Result};
use ld_core::VersionNumber;
use ld_versioning::ControlledSchema;

use crate::cli::{DowngradeArgs, GlobalArgs, OutputFormat, TestArgs, UpgradeArgs};
use crate::commands::common::{load_repository, open_connection, print_json, print_steps, StepInfo};

/// Execute the upgrade command
pub(crate) fn upgrade(args: &UpgradeArgs, global: &GlobalArgs) -> Result<()> {
    let repo = load_repository(global)?;
    let conn = open_connection(&args.db)?;
    let mut schema = ControlledSchema::load(conn.as_ref(), &repo)?;
    let target = args
        .version
        .map(VersionNumber::from)
        .unwrap_or_else(|| repo.latest());

    if args.preview {
        if target < schema.version() {
            bail!("Version {target} is below the current version {}", schema.version());
        }
        let steps: Vec<StepInfo> = schema.changeset(target)?.iter().map(StepInfo::from).collect();
        return print_steps(&steps, args.format);
    }

    let from = schema.version();
    let reached = schema
        .upgrade(Some(target))
        .with_context(|| format!("Upgrade from version {from} to {target} failed"))?;
    report(from, reached, args.format)
}

/// Execute the downgrade command
pub(crate) fn downgrade(args: &DowngradeArgs, global: &GlobalArgs) -> Result<()> {
    let repo = load_repository(global)?;
    let conn = open_connection(&args.db)?;
    let mut schema = ControlledSchema::load(conn.as_ref(), &repo)?;

    if args.preview {
        let target = VersionNumber::new(args.version)?;
        if target > schema.version() {
            bail!("Version {target} is above the current version {}", schema.version());
        }
        let steps: Vec<StepInfo> = schema.changeset(target)?.iter().map(StepInfo::from).collect();
        return print_steps(&steps, args.format);
    }

    let from = schema.version();
    let reached = schema
        .downgrade(args.version)
        .with_context(|| format!("Downgrade from version {from} to {} failed", args.version))?;
    report(from, reached, args.format)
}

/// Execute the test command
pub(crate) fn test(args: &TestArgs, global: &GlobalArgs) -> Result<()> {
    let repo = load_repository(global)?;
    let latest = repo.latest();
    if latest == 0 {
        bail!("Repository '{}' has no versions to test", repo.id());
    }
    let conn = open_connection(&args.db)?;
    let mut schema = ControlledSchema::load(conn.as_ref(), &repo)?;

    println!("Upgrading...");
    schema
        .upgrade(None)
        .context("Upgrade to the latest version failed")?;
    println!("  done, at version {}", schema.version());

    println!("Downgrading...");
    let target = i64::try_from(latest.value() - 1)?;
    schema
        .downgrade(target)
        .with_context(|| format!("Downgrade to version {target} failed"))?;
    println!("  done, at version {}", schema.version());

    println!("Success");
    Ok(())
}

fn report(from: VersionNumber, to: VersionNumber, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text if from == to => println!("Already at version {to}"),
        OutputFormat::Text => println!("Migrated from version {from} to {to}"),
        OutputFormat::Json => print_json(&serde_json::json!({
            "from": from.value(),
            "to": to.value(),
        }))?,
    }
    Ok(())
}
