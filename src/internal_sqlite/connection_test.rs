use super::connection::Connection;
use crate::{
    errors::{connection::SqlitePrepareErrors, row::RowError},
    query::Value,
};

#[test]
fn test_open_memory_db() {
    let result = Connection::open_memory();
    assert!(result.is_ok());
}

#[test]
fn test_open_file_db() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let db_path = db_path.to_str().unwrap();

    {
        let conn = Connection::open(db_path).expect("failed to open db");
        conn.exec("CREATE TABLE test (id INTEGER PRIMARY KEY); INSERT INTO test VALUES (7);")
            .unwrap();
    }
    assert!(std::path::Path::new(db_path).exists());

    let conn = Connection::open_read_only(db_path).unwrap();
    let stmt = conn.prepare("SELECT id FROM test").unwrap();
    assert!(stmt.fetch_next().unwrap());
    assert_eq!(stmt.row().value(0), Value::Integer(7));
}

#[test]
fn test_open_read_only_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("missing.db");

    assert!(Connection::open_read_only(db_path.to_str().unwrap()).is_err());
}

#[test]
fn test_prepare_statement() {
    let conn = Connection::open_memory().expect("Failed to open Connection");
    let sql = "CREATE TABLE test (id INTEGER PRIMARY KEY);";

    let prepare_result = conn.prepare(sql);
    assert!(prepare_result.is_ok());
}

#[test]
fn test_prepare_invalid_sql() {
    let conn = Connection::open_memory().unwrap();

    let result = conn.prepare("SELEC id FROM nowhere");
    assert!(matches!(result, Err(SqlitePrepareErrors::SqliteFailure { .. })));
}

#[test]
fn test_prepare_empty_sql() {
    let conn = Connection::open_memory().unwrap();

    assert!(matches!(conn.prepare("   "), Err(SqlitePrepareErrors::EmptySql)));
    assert!(matches!(
        conn.prepare("-- nothing here"),
        Err(SqlitePrepareErrors::EmptySql)
    ));
    assert!(matches!(
        conn.prepare("SELECT '\0'"),
        Err(SqlitePrepareErrors::EmbeddedNullInSql)
    ));
}

#[test]
fn test_named_parameter_index() {
    let conn = Connection::open_memory().unwrap();
    let stmt = conn.prepare("SELECT :id, @name, $age, ?").unwrap();

    assert_eq!(stmt.parameter_index(":id"), Some(1));
    assert_eq!(stmt.parameter_index("@name"), Some(2));
    assert_eq!(stmt.parameter_index("$age"), Some(3));
    assert_eq!(stmt.parameter_index(":missing"), None);
}

#[test]
fn test_column_count() {
    let conn = Connection::open_memory().unwrap();
    let stmt = conn.prepare("SELECT 1 AS one, 'x' AS two").unwrap();

    assert_eq!(stmt.column_count(), 2);
}

#[test]
fn test_write_through_fetch_next() {
    let conn = Connection::open_memory().unwrap();
    conn.exec("CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT UNIQUE)")
        .unwrap();

    let insert = || {
        let stmt = conn.prepare("INSERT INTO users (email) VALUES (?)").unwrap();
        stmt.bind_parameter(1, "a@example.com").unwrap();
        stmt.fetch_next()
    };

    // a write yields no rows
    assert!(!insert().unwrap());
    assert!(matches!(insert(), Err(RowError::SqliteFailure { .. })));
}

#[test]
fn test_exec_reports_failures() {
    let conn = Connection::open_memory().unwrap();

    assert!(conn.exec("CREATE TABLE t (id INTEGER)").is_ok());
    let err = conn.exec("INSERT INTO missing VALUES (1)").unwrap_err();
    assert!(err.error_msg.contains("missing"));
}
