use super::*;
use ld_changeset::ChangesetError;
use ld_db::DuckDbConnection;
use tempfile::TempDir;

const USERS: &str = r#"
upgrade:
  - create_table:
      name: users
      columns:
        - { name: id, type: INTEGER, primary_key: true }
        - { name: name, type: VARCHAR }
  - create_index: { name: ix_users_name, table: users, columns: [name] }
downgrade:
  - drop_index: { name: ix_users_name }
  - drop_table: { name: users }
"#;

fn script_file(dir: &TempDir, name: &str, yaml: &str) -> VersioningResult<DeclarativeScript> {
    let path = dir.path().join(name);
    std::fs::write(&path, yaml).unwrap();
    DeclarativeScript::new(path)
}

#[test]
fn test_upgrade_then_downgrade() {
    let dir = TempDir::new().unwrap();
    let script = script_file(&dir, "001_users.yml", USERS).unwrap();
    let conn = DuckDbConnection::in_memory().unwrap();

    script.run(&conn, Direction::Upgrade).unwrap();
    assert!(conn.relation_exists("users").unwrap());

    script.run(&conn, Direction::Downgrade).unwrap();
    assert!(!conn.relation_exists("users").unwrap());
}

#[test]
fn test_document_operations_by_direction() {
    let dir = TempDir::new().unwrap();
    let script = script_file(&dir, "001_users.yml", USERS).unwrap();
    let doc = script.document().unwrap();
    assert_eq!(doc.operations(Direction::Upgrade).len(), 2);
    assert_eq!(doc.operations(Direction::Downgrade)[1].kind(), "drop_table");
}

#[test]
fn test_verify_requires_both_entry_points() {
    let dir = TempDir::new().unwrap();
    let err = script_file(&dir, "001.yml", "upgrade: []\n").unwrap_err();
    match err {
        VersioningError::ScriptError { reason, .. } => assert!(reason.contains("downgrade")),
        other => panic!("unexpected error: {other}"),
    }

    let err = script_file(&dir, "002.yml", "").unwrap_err();
    assert!(matches!(err, VersioningError::ScriptError { .. }));

    let err = script_file(&dir, "003.yml", "upgrade: []\ndowngrade: []\nsideways: []\n")
        .unwrap_err();
    assert!(matches!(err, VersioningError::ScriptError { .. }));
}

#[test]
fn test_failure_rolls_back_earlier_operations() {
    let dir = TempDir::new().unwrap();
    let script = script_file(
        &dir,
        "001.yml",
        r#"
upgrade:
  - create_table: { name: a, columns: [{ name: id, type: INTEGER }] }
  - drop_table: { name: does_not_exist }
downgrade: []
"#,
    )
    .unwrap();
    let conn = DuckDbConnection::in_memory().unwrap();
    let err = script.run(&conn, Direction::Upgrade).unwrap_err();
    assert!(matches!(err, VersioningError::ExecutionError { .. }));
    assert!(!conn.relation_exists("a").unwrap());
}

#[test]
fn test_unsupported_operation_runs_nothing() {
    let dir = TempDir::new().unwrap();
    let script = script_file(
        &dir,
        "001.yml",
        r#"
upgrade:
  - create_table: { name: a, columns: [{ name: id, type: INTEGER }] }
  - create_index: { name: ix_a, table: a, columns: [id] }
  - rename_index: { table: a, from: ix_a, to: ix_b }
downgrade: []
"#,
    )
    .unwrap();
    let conn = DuckDbConnection::in_memory().unwrap();
    let err = script.run(&conn, Direction::Upgrade).unwrap_err();
    let source = std::error::Error::source(&err)
        .and_then(|s| s.downcast_ref::<ChangesetError>())
        .unwrap();
    assert!(matches!(source, ChangesetError::NotSupported { .. }));
    assert!(!conn.relation_exists("a").unwrap());
}

#[test]
fn test_create_from_template_is_empty_migration() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("004_nothing.yml");
    let options = ScriptOptions {
        version: 4,
        description: "nothing".to_string(),
        ..Default::default()
    };
    let script = DeclarativeScript::create(&path, &options).unwrap();
    let doc = script.document().unwrap();
    assert!(doc.upgrade.is_empty());
    assert!(doc.downgrade.is_empty());
    assert!(script.source().unwrap().starts_with("# Version 4: nothing"));

    let conn = DuckDbConnection::in_memory().unwrap();
    script.run(&conn, Direction::Upgrade).unwrap();
}
