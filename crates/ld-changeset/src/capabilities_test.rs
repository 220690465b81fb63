use super::*;

#[test]
fn test_capabilities_for_known_dialects() {
    for tag in ["default", "duckdb", "postgres", "sqlite", "mysql"] {
        let caps = capabilities_for(tag).unwrap();
        assert_eq!(caps.name(), tag);
    }
    assert_eq!(capabilities_for("postgresql").unwrap().name(), "postgres");
}

#[test]
fn test_capabilities_for_unknown_dialect() {
    let err = capabilities_for("oracle").err().unwrap();
    assert!(matches!(err, ChangesetError::UnknownDialect(ref d) if d == "oracle"));
    assert!(err.to_string().contains("[C004]"));
}

#[test]
fn test_default_supports_everything() {
    let caps = DefaultCapabilities;
    assert!(caps.supports_rename_column());
    assert!(caps.supports_rename_index());
    assert!(caps.supports_named_check_constraints());
    assert!(caps.supports_alter_column_type());
    assert!(caps.supports_alter_nullability());
    assert!(caps.supports_alter_server_default());
    assert!(caps.supports_alter_primary_key());
    assert!(caps.supports_alter_constraints());
    assert!(caps.supports_drop_column());
}

#[test]
fn test_engine_specific_answers() {
    assert!(!DuckDbCapabilities.supports_rename_index());
    assert!(DuckDbCapabilities.supports_alter_column_type());
    assert!(!SqliteCapabilities.supports_alter_column_type());
    assert!(SqliteCapabilities.supports_rename_column());
    assert!(!MySqlCapabilities.supports_named_check_constraints());
    assert!(PostgresCapabilities.supports_rename_index());
}

#[test]
fn test_quoting() {
    assert_eq!(DefaultCapabilities.quote_ident("user"), "\"user\"");
    assert_eq!(DefaultCapabilities.quote_ident("a\"b"), "\"a\"\"b\"");
    assert_eq!(MySqlCapabilities.quote_ident("user"), "`user`");
}

#[test]
fn test_type_rendering() {
    assert_eq!(PostgresCapabilities.render_type(&ColumnType::Binary), "BYTEA");
    assert_eq!(
        PostgresCapabilities.render_type(&ColumnType::Double),
        "DOUBLE PRECISION"
    );
    assert_eq!(DuckDbCapabilities.render_type(&ColumnType::Binary), "BLOB");
    assert_eq!(
        DefaultCapabilities.render_type(&ColumnType::String(Some(40))),
        "VARCHAR(40)"
    );
}

#[test]
fn test_rename_index_and_alter_type_sql() {
    assert_eq!(
        PostgresCapabilities.rename_index_sql("t", "ix_a", "ix_b"),
        "ALTER INDEX \"ix_a\" RENAME TO \"ix_b\""
    );
    assert_eq!(
        MySqlCapabilities.rename_index_sql("t", "ix_a", "ix_b"),
        "ALTER TABLE `t` RENAME INDEX `ix_a` TO `ix_b`"
    );
    assert_eq!(
        DuckDbCapabilities.alter_type_sql("t", "c", &ColumnType::BigInt),
        "ALTER TABLE \"t\" ALTER COLUMN \"c\" TYPE BIGINT"
    );
    assert_eq!(
        MySqlCapabilities.alter_type_sql("t", "c", &ColumnType::Text),
        "ALTER TABLE `t` MODIFY `c` TEXT"
    );
}

#[test]
fn test_drop_primary_key_sql() {
    assert_eq!(
        PostgresCapabilities.drop_primary_key_sql("users"),
        "ALTER TABLE \"users\" DROP CONSTRAINT \"users_pkey\""
    );
    assert_eq!(
        MySqlCapabilities.drop_primary_key_sql("users"),
        "ALTER TABLE `users` DROP PRIMARY KEY"
    );
    assert!(!DuckDbCapabilities.supports_inline_add_column_constraints());
}
