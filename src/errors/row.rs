use std::ffi::c_int;

/// Raised while pulling the next row of a result set.
#[derive(thiserror::Error, Debug)]
pub enum RowError {
    #[error("Operation took more than 5 seconds")]
    SqliteBusy,

    #[error("SQLite error {code}: {error_msg}")]
    SqliteFailure { code: c_int, error_msg: String },
}
