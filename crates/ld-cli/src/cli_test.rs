use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_parse_key_val() {
    assert_eq!(
        parse_key_val("engine_arg_threads=4").unwrap(),
        ("engine_arg_threads".to_string(), "4".to_string())
    );
    assert_eq!(
        parse_key_val("k=a=b").unwrap(),
        ("k".to_string(), "a=b".to_string())
    );
    assert!(parse_key_val("no_equals").is_err());
    assert!(parse_key_val("=value").is_err());
}

#[test]
fn test_upgrade_args() {
    let cli = Cli::try_parse_from([
        "ladder",
        "-r",
        "repo",
        "upgrade",
        "--url",
        "duckdb://",
        "-o",
        "engine_arg_threads=2",
        "3",
        "--preview",
    ])
    .unwrap();
    assert_eq!(cli.global.repository, PathBuf::from("repo"));
    match cli.command {
        Commands::Upgrade(args) => {
            assert_eq!(args.version, Some(3));
            assert!(args.preview);
            assert_eq!(args.db.url, "duckdb://");
            assert_eq!(
                args.db.options,
                vec![("engine_arg_threads".to_string(), "2".to_string())]
            );
            assert_eq!(args.format, OutputFormat::Text);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_downgrade_accepts_negative_version() {
    let cli = Cli::try_parse_from(["ladder", "downgrade", "--url", "duckdb://", "-1"]).unwrap();
    match cli.command {
        Commands::Downgrade(args) => assert_eq!(args.version, -1),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_script_sql_description_defaults_empty() {
    let cli = Cli::try_parse_from(["ladder", "script-sql", "duckdb"]).unwrap();
    match cli.command {
        Commands::ScriptSql(args) => {
            assert_eq!(args.dialect, "duckdb");
            assert_eq!(args.description, "");
            assert!(args.templates.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
