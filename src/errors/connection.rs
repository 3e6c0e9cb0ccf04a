use std::ffi::c_int;

#[derive(thiserror::Error, Debug)]
pub enum SqliteOpenErrors {
    /// This error occurs when SQLite is unable to allocate memory to hold
    /// the database connection object.
    #[error("SQLite is unable to allocate memory to hold the database connection object")]
    ConnectionAllocationFailed,

    #[error("{filename} contains a null byte")]
    EmbeddedNullInFileName { filename: String },

    // in case of any other errors
    #[error("SQLite error {code}: {error_msg}")]
    SqliteFailure { code: c_int, error_msg: String },
}

#[derive(thiserror::Error, Debug)]
pub enum SqlitePrepareErrors {
    #[error("sql statement contains a null byte")]
    EmbeddedNullInSql,

    /// The text was empty, pure whitespace or only a comment. SQLite hands
    /// back a NULL statement in that case.
    #[error("sql statement contains no sql")]
    EmptySql,

    // in case of any other errors
    #[error("SQLite error {code}: {error_msg}")]
    SqliteFailure { code: c_int, error_msg: String },
}
