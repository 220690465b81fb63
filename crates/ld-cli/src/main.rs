//! Ladder CLI - versioned schema migrations

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{control, migrate, repository};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Create(args) => repository::create(args, &cli.global),
        cli::Commands::Script(args) => repository::script(args, &cli.global),
        cli::Commands::ScriptSql(args) => repository::script_sql(args, &cli.global),
        cli::Commands::Version(args) => repository::version(args, &cli.global),
        cli::Commands::VersionControl(args) => control::version_control(args, &cli.global),
        cli::Commands::DbVersion(args) => control::db_version(args, &cli.global),
        cli::Commands::DropVersionControl(args) => control::drop_version_control(args, &cli.global),
        cli::Commands::Upgrade(args) => migrate::upgrade(args, &cli.global),
        cli::Commands::Downgrade(args) => migrate::downgrade(args, &cli.global),
        cli::Commands::Test(args) => migrate::test(args, &cli.global),
    }
}
