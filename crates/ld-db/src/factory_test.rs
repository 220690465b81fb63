use super::*;

#[test]
fn test_construct_in_memory() {
    let conn = construct_connection("duckdb://", &ConnectionOptions::default()).unwrap();
    assert_eq!(conn.dialect(), "duckdb");

    let conn = construct_connection("duckdb:///:memory:", &ConnectionOptions::default()).unwrap();
    assert_eq!(conn.dialect(), "duckdb");
}

#[test]
fn test_construct_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f.duckdb");
    let url = format!("duckdb:///{}", path.display());
    let conn = construct_connection(url.as_str(), &ConnectionOptions::default()).unwrap();
    conn.execute_batch("CREATE TABLE t (id INT)").unwrap();
    assert!(path.exists());
}

#[test]
fn test_pass_through_connection() {
    let built: Box<dyn Connection> = Box::new(DuckDbConnection::in_memory().unwrap());
    built.execute_batch("CREATE TABLE marker (id INT)").unwrap();

    let conn = construct_connection(built, &ConnectionOptions::default()).unwrap();
    assert!(conn.relation_exists("marker").unwrap());
}

#[test]
fn test_keyed_options() {
    let options = ConnectionOptions::from_keyed([
        ("engine_arg_threads", "2"),
        ("echo", "true"),
        ("engine_arg_", "x"),
    ]);
    assert_eq!(options.engine_args.len(), 1);
    assert_eq!(options.engine_args["threads"], "2");
    assert!(options.engine_dict.is_empty());
}

#[test]
fn test_per_argument_overrides_win() {
    let options = ConnectionOptions::from_keyed([("engine_arg_threads", "2")])
        .with_dict([("threads", "4"), ("access_mode", "automatic")]);
    let merged = options.merged();
    assert_eq!(merged["threads"], "2");
    assert_eq!(merged["access_mode"], "automatic");
}

#[test]
fn test_options_applied_to_duckdb() {
    let options = ConnectionOptions::from_keyed([("engine_arg_threads", "1")]);
    let conn = construct_connection("duckdb://", &options).unwrap();
    let threads = conn
        .query_i64("SELECT current_setting('threads')::BIGINT", &[])
        .unwrap();
    assert_eq!(threads, Some(1));
}

#[test]
fn test_invalid_option_rejected() {
    let options = ConnectionOptions::default().with_dict([("no_such_setting_xyz", "1")]);
    let result = construct_connection("duckdb://", &options);
    assert!(matches!(result, Err(DbError::InvalidOption { .. })));
}

#[test]
fn test_unsupported_engine() {
    let result = construct_connection("postgres://localhost/db", &ConnectionOptions::default());
    assert!(matches!(result, Err(DbError::UnsupportedEngine(e)) if e == "postgres"));
}

#[test]
fn test_invalid_urls() {
    for url in ["not a url", "duckdb://host/path.db"] {
        let result = construct_connection(url, &ConnectionOptions::default());
        assert!(
            matches!(result, Err(DbError::InvalidUrl { .. })),
            "{url} should be rejected"
        );
    }
}
