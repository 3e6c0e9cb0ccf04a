#![allow(dead_code)]

use pagesql::{BindRecord, Connection};

#[derive(Debug, Default, BindRecord)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created: String,
    pub updated: Option<String>,
}

pub const USER_COLUMNS: &str =
    "id, username, password, email, first_name, last_name, created, updated";

/// In-memory database holding john.doe, jane.smith and sally.james, in
/// that id order.
pub fn users_db() -> Connection {
    let conn = Connection::open_memory().unwrap();
    conn.exec(
        "CREATE TABLE users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            email       TEXT NOT NULL,
            first_name  TEXT NOT NULL,
            last_name   TEXT NOT NULL,
            created     TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated     TEXT
        );",
    )
    .unwrap();

    insert_user(&conn, "john", "doe", "abc123");
    insert_user(&conn, "jane", "smith", "pass");
    insert_user(&conn, "sally", "james", "none");
    conn
}

pub fn insert_user(conn: &Connection, first_name: &str, last_name: &str, password: &str) {
    let stmt = conn
        .prepare(
            "INSERT INTO users (username, password, email, first_name, last_name) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .unwrap();

    let username = format!("{first_name}.{last_name}");
    stmt.bind_parameter(1, username.as_str()).unwrap();
    stmt.bind_parameter(2, password).unwrap();
    stmt.bind_parameter(3, format!("{username}@fakemail.com")).unwrap();
    stmt.bind_parameter(4, first_name).unwrap();
    stmt.bind_parameter(5, last_name).unwrap();
    assert!(!stmt.fetch_next().unwrap());
}

/// Installs a test subscriber once; `RUST_LOG=pagesql=trace` shows the
/// cursor events.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
