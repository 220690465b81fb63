use super::*;
use tempfile::TempDir;

fn new_repo(tmp: &TempDir) -> Repository {
    Repository::create(&tmp.path().join("repo"), "repository_name", &BTreeMap::new()).unwrap()
}

#[test]
fn test_create_writes_config_and_readme() {
    let tmp = TempDir::new().unwrap();
    let repo = new_repo(&tmp);
    assert!(repo.path().join(CONFIG_FILE).is_file());
    assert!(repo.path().join(README_FILE).is_file());
    assert_eq!(repo.id(), "repository_name");
    assert_eq!(repo.version_table(), "migrate_version");
    assert_eq!(repo.latest(), 0u64);
    assert!(repo.versions().is_empty());
}

#[test]
fn test_create_with_table_override() {
    let tmp = TempDir::new().unwrap();
    let mut overrides = BTreeMap::new();
    overrides.insert("version_table".to_string(), "_other_table".to_string());
    let repo = Repository::create(&tmp.path().join("repo"), "r", &overrides).unwrap();
    assert_eq!(repo.version_table(), "_other_table");
}

#[test]
fn test_create_existing_path_fails() {
    let tmp = TempDir::new().unwrap();
    let err = Repository::create(tmp.path(), "r", &BTreeMap::new()).unwrap_err();
    assert!(matches!(err, VersioningError::PathFound { .. }));
}

#[test]
fn test_at_missing_path() {
    let tmp = TempDir::new().unwrap();
    let err = Repository::at(&tmp.path().join("nope")).unwrap_err();
    assert!(matches!(err, VersioningError::PathNotFound { .. }));
}

#[test]
fn test_collection() {
    let tmp = TempDir::new().unwrap();
    let mut repo = new_repo(&tmp);
    let options = ScriptOptions::default();
    repo.create_new_declarative_version("foo bar", &options).unwrap();
    repo.create_new_sql_version("postgres", "foo bar", &options).unwrap();
    repo.create_new_sql_version("sqlite", "foo bar", &options).unwrap();
    repo.create_new_declarative_version("", &options).unwrap();

    assert_eq!(repo.latest(), 4u64);
    assert_eq!(repo.versions().len(), 4);
    let four = VersionNumber::from(4u64);
    assert_eq!(repo.version(repo.latest()).unwrap(), repo.version(four).unwrap());
    assert!(matches!(
        repo.version(VersionNumber::from(5u64)),
        Err(VersioningError::VersionNotFound { .. })
    ));
    assert!(matches!(
        repo.version(VersionNumber::ZERO),
        Err(VersioningError::VersionNotFound { .. })
    ));
    assert_eq!(repo.version(four).unwrap().number(), 4u64);

    let reloaded = Repository::at(repo.path()).unwrap();
    assert_eq!(reloaded.versions(), repo.versions());
}

#[test]
fn test_create_new_sql_version_round_trip() {
    let tmp = TempDir::new().unwrap();
    let mut repo = new_repo(&tmp);
    let created = repo
        .create_new_sql_version("sqlite", "foo bar", &ScriptOptions::default())
        .unwrap()
        .script("sqlite", Direction::Upgrade)
        .unwrap()
        .path()
        .to_path_buf();
    assert!(created.ends_with("1/001_foo_bar_sqlite_upgrade.sql"));

    let reloaded = Repository::at(repo.path()).unwrap();
    let version = reloaded.version(VersionNumber::from(1u64)).unwrap();
    let up = version.script("sqlite", Direction::Upgrade).unwrap();
    assert_eq!(up.path(), created);
    assert!(up.source().unwrap().starts_with("-- Version 1 upgrade: foo_bar"));
    let down = version.script("sqlite", Direction::Downgrade).unwrap();
    assert!(down.path().ends_with("1/001_foo_bar_sqlite_downgrade.sql"));
}

#[test]
fn test_create_new_declarative_version_has_content() {
    let tmp = TempDir::new().unwrap();
    let mut repo = new_repo(&tmp);
    let version = repo
        .create_new_declarative_version("'", &ScriptOptions::default())
        .unwrap();
    let script = version.script("duckdb", Direction::Upgrade).unwrap();
    assert!(!script.source().unwrap().is_empty());
    assert!(matches!(script, Script::Declarative(_)));
}

#[test]
fn test_compound_dialect_needs_description() {
    let tmp = TempDir::new().unwrap();
    let mut repo = new_repo(&tmp);
    let err = repo
        .create_new_sql_version("ibm_db_sa", "", &ScriptOptions::default())
        .unwrap_err();
    assert!(matches!(err, VersioningError::ScriptError { .. }));
    assert_eq!(repo.latest(), 0u64);

    repo.create_new_sql_version("ibm_db_sa", "test", &ScriptOptions::default())
        .unwrap();
    let reloaded = Repository::at(repo.path()).unwrap();
    assert!(reloaded
        .version(VersionNumber::from(1u64))
        .unwrap()
        .script("ibm_db_sa", Direction::Downgrade)
        .is_ok());
}

#[test]
fn test_custom_templates() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    std::fs::create_dir_all(templates.join("script")).unwrap();
    std::fs::write(
        templates.join("script/statement.sql"),
        "SELECT {{ version }};",
    )
    .unwrap();

    let mut repo = new_repo(&tmp);
    let options = ScriptOptions {
        templates_path: Some(templates),
        ..Default::default()
    };
    let version = repo.create_new_sql_version("duckdb", "", &options).unwrap();
    let up = version.script("duckdb", Direction::Upgrade).unwrap();
    assert_eq!(up.source().unwrap(), "SELECT 1;\n");
}

#[test]
fn test_old_repository_layout_is_invalid() {
    let tmp = TempDir::new().unwrap();
    let repo = new_repo(&tmp);
    std::fs::write(repo.path().join("1"), "").unwrap();
    let err = Repository::at(repo.path()).unwrap_err();
    assert!(matches!(err, VersioningError::InvalidRepository { .. }));
}

#[test]
fn test_non_numeric_directory_is_invalid() {
    let tmp = TempDir::new().unwrap();
    let repo = new_repo(&tmp);
    std::fs::create_dir(repo.path().join("versions")).unwrap();
    let err = Repository::at(repo.path()).unwrap_err();
    assert!(matches!(err, VersioningError::InvalidRepository { .. }));
}

#[test]
fn test_gap_is_invalid() {
    let tmp = TempDir::new().unwrap();
    let repo = new_repo(&tmp);
    std::fs::create_dir(repo.path().join("1")).unwrap();
    std::fs::create_dir(repo.path().join("3")).unwrap();
    let err = Repository::at(repo.path()).unwrap_err();
    match err {
        VersioningError::InvalidRepository { reason, .. } => {
            assert!(reason.contains("version 2 is missing"))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_changeset_directions() {
    let tmp = TempDir::new().unwrap();
    let mut repo = new_repo(&tmp);
    for _ in 0..3 {
        repo.create_new_sql_version("duckdb", "", &ScriptOptions::default())
            .unwrap();
    }

    let up = repo
        .changeset("duckdb", VersionNumber::ZERO, VersionNumber::from(3u64))
        .unwrap();
    let versions: Vec<u64> = up.iter().map(|s| s.version.value()).collect();
    assert_eq!(versions, vec![1, 2, 3]);
    assert!(up.iter().all(|s| s.direction == Direction::Upgrade));
    assert_eq!(up[2].target(), 3u64);

    let down = repo
        .changeset("duckdb", VersionNumber::from(3u64), VersionNumber::from(1u64))
        .unwrap();
    let versions: Vec<u64> = down.iter().map(|s| s.version.value()).collect();
    assert_eq!(versions, vec![3, 2]);
    assert_eq!(down[1].target(), 1u64);
    assert!(down[0]
        .script
        .unwrap()
        .path()
        .ends_with("3/003_duckdb_downgrade.sql"));

    let same = repo
        .changeset("duckdb", VersionNumber::from(2u64), VersionNumber::from(2u64))
        .unwrap();
    assert!(same.is_empty());

    let err = repo
        .changeset("duckdb", VersionNumber::ZERO, VersionNumber::from(4u64))
        .unwrap_err();
    assert!(matches!(err, VersioningError::InvalidVersion { .. }));

    let err = repo
        .changeset("postgres", VersionNumber::ZERO, VersionNumber::from(1u64))
        .unwrap_err();
    assert!(matches!(err, VersioningError::ScriptNotFound { .. }));
}

#[test]
fn test_changeset_empty_version_has_no_script() {
    let tmp = TempDir::new().unwrap();
    let repo = new_repo(&tmp);
    std::fs::create_dir(repo.path().join("1")).unwrap();
    let repo = Repository::at(repo.path()).unwrap();
    let steps = repo
        .changeset("duckdb", VersionNumber::ZERO, VersionNumber::from(1u64))
        .unwrap();
    assert_eq!(steps.len(), 1);
    assert!(steps[0].script.is_none());
}

#[test]
fn test_invalid_override_leaves_nothing_behind() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("repo");
    let mut overrides = BTreeMap::new();
    overrides.insert("version_table".to_string(), "bad-name".to_string());

    let err = Repository::create(&path, "r", &overrides).unwrap_err();
    assert!(matches!(err, VersioningError::Config { .. }));
    assert!(!path.exists());

    // A retry with a valid name succeeds
    overrides.insert("version_table".to_string(), "good_name".to_string());
    let repo = Repository::create(&path, "r", &overrides).unwrap();
    assert_eq!(repo.version_table(), "good_name");
}

#[test]
fn test_broken_declarative_template_leaves_repository_loadable() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    std::fs::create_dir_all(templates.join("script")).unwrap();
    std::fs::write(templates.join("script/declarative.yml"), "upgrade: []").unwrap();

    let mut repo = new_repo(&tmp);
    let options = ScriptOptions {
        templates_path: Some(templates),
        ..Default::default()
    };
    let err = repo
        .create_new_declarative_version("x", &options)
        .unwrap_err();
    assert!(matches!(err, VersioningError::ScriptError { .. }));
    assert!(!repo.path().join("1").exists());
    assert_eq!(repo.latest(), 0u64);

    let reloaded = Repository::at(repo.path()).unwrap();
    assert_eq!(reloaded.latest(), 0u64);

    // The next version still gets number 1
    repo.create_new_declarative_version("x", &ScriptOptions::default())
        .unwrap();
    assert_eq!(repo.latest(), 1u64);
}

#[test]
fn test_failed_sql_version_removes_directory() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    std::fs::create_dir_all(templates.join("script")).unwrap();
    std::fs::write(
        templates.join("script/statement.sql"),
        "{{ undefined_call() }}",
    )
    .unwrap();

    let mut repo = new_repo(&tmp);
    let options = ScriptOptions {
        templates_path: Some(templates),
        ..Default::default()
    };
    assert!(repo
        .create_new_sql_version("duckdb", "", &options)
        .is_err());
    assert!(!repo.path().join("1").exists());
    assert!(Repository::at(repo.path()).is_ok());
}
