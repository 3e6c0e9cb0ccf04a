use std::ffi::c_int;

pub mod binding;
pub mod connection;
pub mod cursor;
pub mod row;

/// recommended to **log** this error rather than directly handling it
#[derive(thiserror::Error, Debug)]
#[error("SQLite error {code}: {error_msg}")]
pub struct SqliteFailure {
    pub code: c_int,
    pub error_msg: String,
}
