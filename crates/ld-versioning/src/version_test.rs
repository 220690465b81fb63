use super::*;
use tempfile::TempDir;

fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), "").unwrap();
}

fn touch_declarative(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), "upgrade: []\ndowngrade: []\n").unwrap();
}

fn file_name(script: &Script) -> String {
    script
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned()
}

#[test]
fn test_parse_statement_names() {
    let parsed = ScriptFileName::parse(Path::new("001_sqlite_upgrade.sql")).unwrap();
    assert_eq!(
        parsed,
        ScriptFileName::Statement {
            version: VersionNumber::from(1u64),
            description: None,
            dialect: DialectTag::new("sqlite").unwrap(),
            direction: Direction::Upgrade,
        }
    );

    let parsed = ScriptFileName::parse(Path::new("002_add_users_postgres_downgrade.sql")).unwrap();
    match parsed {
        ScriptFileName::Statement {
            description,
            dialect,
            direction,
            ..
        } => {
            assert_eq!(description.as_deref(), Some("add_users"));
            assert_eq!(dialect, "postgres");
            assert_eq!(direction, Direction::Downgrade);
        }
        other => panic!("unexpected parse: {other:?}"),
    }

    let parsed = ScriptFileName::parse(Path::new("003_upgrade.sql")).unwrap();
    match parsed {
        ScriptFileName::Statement { dialect, .. } => assert!(dialect.is_default()),
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn test_parse_compound_dialect() {
    let parsed = ScriptFileName::parse(Path::new("123_test_ibm_db_sa_upgrade.sql")).unwrap();
    match parsed {
        ScriptFileName::Statement {
            description,
            dialect,
            ..
        } => {
            assert_eq!(description.as_deref(), Some("test"));
            assert_eq!(dialect, "ibm_db_sa");
        }
        other => panic!("unexpected parse: {other:?}"),
    }

    let err = ScriptFileName::parse(Path::new("123_ibm_db_sa_upgrade.sql")).unwrap_err();
    assert!(matches!(err, VersioningError::ScriptError { .. }));
}

#[test]
fn test_parse_declarative_names() {
    let parsed = ScriptFileName::parse(Path::new("001_initial.yml")).unwrap();
    assert_eq!(
        parsed,
        ScriptFileName::Declarative {
            version: VersionNumber::from(1u64),
            description: Some("initial".to_string()),
        }
    );
    let parsed = ScriptFileName::parse(Path::new("010.yaml")).unwrap();
    assert_eq!(parsed.version(), 10u64);
}

#[test]
fn test_parse_rejects_bad_names() {
    for name in [
        "123.sql",
        "001_sqlite_sideways.sql",
        "one_sqlite_upgrade.sql",
        "001_SQLite_upgrade.sql",
        "001_upgrade.txt",
        "001_upgrade",
        "bla.yml",
    ] {
        let err = ScriptFileName::parse(Path::new(name)).unwrap_err();
        assert!(
            matches!(err, VersioningError::ScriptError { .. }),
            "accepted {name}"
        );
    }
}

#[test]
fn test_new_file_names() {
    let v = VersionNumber::from(7u64);
    let duckdb = DialectTag::new("duckdb").unwrap();
    assert_eq!(
        ScriptFileName::statement(v, "foo_bar", &duckdb, Direction::Upgrade),
        "007_foo_bar_duckdb_upgrade.sql"
    );
    assert_eq!(
        ScriptFileName::statement(v, "", &duckdb, Direction::Downgrade),
        "007_duckdb_downgrade.sql"
    );
    assert_eq!(ScriptFileName::declarative(v, ""), "007.yml");
    assert_eq!(ScriptFileName::declarative(v, "foo"), "007_foo.yml");
}

#[test]
fn test_selection() {
    let dir = TempDir::new().unwrap();
    let path = dir.path();
    touch(path, "001_sqlite_upgrade.sql");
    touch(path, "001_default_upgrade.sql");
    touch_declarative(path, "001_initial.yml");
    let one = VersionNumber::from(1u64);

    let mut ver = Version::new(one, path);
    ver.add_script(Path::new("001_sqlite_upgrade.sql")).unwrap();
    assert_eq!(
        file_name(ver.script("sqlite", Direction::Upgrade).unwrap()),
        "001_sqlite_upgrade.sql"
    );

    let mut ver = Version::new(one, path);
    ver.add_script(Path::new("001_default_upgrade.sql")).unwrap();
    assert_eq!(
        file_name(ver.script("default", Direction::Upgrade).unwrap()),
        "001_default_upgrade.sql"
    );

    let mut ver = Version::new(one, path);
    ver.add_script(Path::new("001_sqlite_upgrade.sql")).unwrap();
    ver.add_script(Path::new("001_default_upgrade.sql")).unwrap();
    assert_eq!(
        file_name(ver.script("sqlite", Direction::Upgrade).unwrap()),
        "001_sqlite_upgrade.sql"
    );

    ver.add_script(Path::new("001_initial.yml")).unwrap();
    assert_eq!(
        file_name(ver.script("postgres", Direction::Upgrade).unwrap()),
        "001_default_upgrade.sql"
    );
    assert_eq!(
        file_name(ver.script("postgres", Direction::Downgrade).unwrap()),
        "001_initial.yml"
    );

    let mut ver = Version::new(one, path);
    ver.add_script(Path::new("001_sqlite_upgrade.sql")).unwrap();
    ver.add_script(Path::new("001_initial.yml")).unwrap();
    assert_eq!(
        file_name(ver.script("postgres", Direction::Upgrade).unwrap()),
        "001_initial.yml"
    );
}

#[test]
fn test_selection_not_found() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "001_sqlite_upgrade.sql");
    let mut ver = Version::new(VersionNumber::from(1u64), dir.path());
    ver.add_script(Path::new("001_sqlite_upgrade.sql")).unwrap();

    let err = ver.script("postgres", Direction::Upgrade).unwrap_err();
    assert!(matches!(err, VersioningError::ScriptNotFound { version: 1, .. }));
    let err = ver.script("sqlite", Direction::Downgrade).unwrap_err();
    assert!(matches!(err, VersioningError::ScriptNotFound { .. }));
}

#[test]
fn test_bad_version() {
    let dir = TempDir::new().unwrap();
    let mut ver = Version::new(VersionNumber::from(1u64), dir.path());
    let err = ver.add_script(Path::new("123.sql")).unwrap_err();
    assert!(matches!(err, VersioningError::ScriptError { .. }));

    let mut ver = Version::new(VersionNumber::from(123u64), dir.path());
    let err = ver
        .add_script(Path::new("123_ibm_db_sa_upgrade.sql"))
        .unwrap_err();
    assert!(matches!(err, VersioningError::ScriptError { .. }));

    // Well-formed name, missing file
    let err = ver
        .add_script(Path::new("123_test_ibm_db_sa_upgrade.sql"))
        .unwrap_err();
    assert!(matches!(err, VersioningError::InvalidScript { .. }));

    touch_declarative(dir.path(), "123_first.yml");
    touch_declarative(dir.path(), "123_second.yml");
    ver.add_script(Path::new("123_first.yml")).unwrap();
    let err = ver.add_script(Path::new("123_second.yml")).unwrap_err();
    assert!(matches!(err, VersioningError::ScriptError { .. }));
}

#[test]
fn test_version_mismatch_and_duplicates() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "002_upgrade.sql");
    touch(dir.path(), "001_upgrade.sql");
    touch(dir.path(), "001_default_upgrade.sql");

    let mut ver = Version::new(VersionNumber::from(1u64), dir.path());
    let err = ver.add_script(Path::new("002_upgrade.sql")).unwrap_err();
    assert!(matches!(err, VersioningError::ScriptError { .. }));

    ver.add_script(Path::new("001_upgrade.sql")).unwrap();
    // Same (default, upgrade) slot under another spelling
    let err = ver
        .add_script(Path::new("001_default_upgrade.sql"))
        .unwrap_err();
    assert!(matches!(err, VersioningError::ScriptError { .. }));
}

#[test]
fn test_load_directory() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "001_duckdb_upgrade.sql");
    touch(dir.path(), "001_duckdb_downgrade.sql");
    touch(dir.path(), ".001_duckdb_upgrade.sql.swp");

    let ver = Version::load(VersionNumber::from(1u64), dir.path()).unwrap();
    assert_eq!(ver.scripts().count(), 2);
    assert!(!ver.is_empty());
    assert_eq!(ver.number(), 1u64);

    let empty = TempDir::new().unwrap();
    let ver = Version::load(VersionNumber::from(1u64), empty.path()).unwrap();
    assert!(ver.is_empty());
}

#[test]
fn test_load_rejects_stray_file() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "001_duckdb_upgrade.sql");
    touch(dir.path(), "notes.txt");
    let err = Version::load(VersionNumber::from(1u64), dir.path()).unwrap_err();
    assert!(matches!(err, VersioningError::ScriptError { .. }));
}
