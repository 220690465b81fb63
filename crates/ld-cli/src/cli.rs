//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Ladder - versioned schema migrations for SQL databases
#[derive(Parser, Debug)]
#[command(name = "ladder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the migration repository
    #[arg(
        short = 'r',
        long,
        global = true,
        env = "LADDER_REPOSITORY",
        default_value = "."
    )]
    pub repository: PathBuf,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty repository
    Create(CreateArgs),

    /// Add a version with an empty declarative script
    Script(ScriptArgs),

    /// Add a version with empty upgrade/downgrade SQL scripts for a dialect
    #[command(name = "script-sql")]
    ScriptSql(ScriptSqlArgs),

    /// Show the latest version in the repository
    Version(VersionArgs),

    /// Put a database under version control
    #[command(name = "version-control")]
    VersionControl(VersionControlArgs),

    /// Show the version applied to a database
    #[command(name = "db-version")]
    DbVersion(DbVersionArgs),

    /// Upgrade a database to a later version
    Upgrade(UpgradeArgs),

    /// Downgrade a database to an earlier version
    Downgrade(DowngradeArgs),

    /// Upgrade to the latest version, then downgrade one version
    ///
    /// This exercises the newest scripts against a scratch database and may
    /// leave it in an inconsistent state.
    Test(TestArgs),

    /// Remove version control from a database
    #[command(name = "drop-version-control")]
    DropVersionControl(DropVersionControlArgs),
}

/// Connection arguments shared by commands that touch a database
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Database URL, e.g. duckdb:///app.duckdb
    #[arg(short, long, env = "LADDER_URL")]
    pub url: String,

    /// Engine option as KEY=VALUE (keys are engine_arg_<setting>)
    #[arg(short = 'o', long = "option", value_parser = parse_key_val)]
    pub options: Vec<(String, String)>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Directory to create
    pub path: PathBuf,

    /// Repository identifier stored in the bookkeeping table
    pub name: String,

    /// Name of the bookkeeping table
    #[arg(long)]
    pub version_table: Option<String>,
}

/// Arguments for the script command
#[derive(Args, Debug)]
pub struct ScriptArgs {
    /// Free-text description, used in the file name
    #[arg(default_value = "")]
    pub description: String,

    /// Directory of custom script templates
    #[arg(long)]
    pub templates: Option<PathBuf>,
}

/// Arguments for the script-sql command
#[derive(Args, Debug)]
pub struct ScriptSqlArgs {
    /// Dialect tag (duckdb, postgres, sqlite, default, ...)
    pub dialect: String,

    /// Free-text description, used in the file name
    #[arg(default_value = "")]
    pub description: String,

    /// Directory of custom script templates
    #[arg(long)]
    pub templates: Option<PathBuf>,
}

/// Arguments for the version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the version-control command
#[derive(Args, Debug)]
pub struct VersionControlArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// Version the database is already at (default 0)
    pub version: Option<u64>,
}

/// Arguments for the db-version command
#[derive(Args, Debug)]
pub struct DbVersionArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the upgrade command
#[derive(Args, Debug)]
pub struct UpgradeArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// Target version (default: latest)
    pub version: Option<u64>,

    /// List the scripts that would run without running them
    #[arg(long)]
    pub preview: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the downgrade command
#[derive(Args, Debug)]
pub struct DowngradeArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// Target version
    #[arg(allow_negative_numbers = true)]
    pub version: i64,

    /// List the scripts that would run without running them
    #[arg(long)]
    pub preview: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the test command
#[derive(Args, Debug)]
pub struct TestArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Arguments for the drop-version-control command
#[derive(Args, Debug)]
pub struct DropVersionControlArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Parse a `KEY=VALUE` pair.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{s}'"))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
