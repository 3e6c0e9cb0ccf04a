use libsqlite3_sys::{
    self as ffi, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_MEMORY, SQLITE_OPEN_READONLY,
    SQLITE_OPEN_READWRITE, sqlite3, sqlite3_busy_timeout, sqlite3_exec,
};
use std::{
    ffi::{CString, c_int},
    ptr,
};

use crate::{
    errors::{
        SqliteFailure,
        connection::{SqliteOpenErrors, SqlitePrepareErrors},
    },
    internal_sqlite::statement::Statement,
    utility::utils::{close_db, sqlite_failure},
};

/// How long a statement waits on a locked database before SQLITE_BUSY.
pub const BUSY_TIMEOUT_MS: c_int = 5000;

/// An open SQLite database handle.
///
/// A connection hands out statements that borrow it, so it always outlives
/// them. It is not `Send`; one thread drives one connection.
pub struct Connection {
    pub(crate) db: *mut sqlite3,
}

impl Drop for Connection {
    fn drop(&mut self) {
        unsafe {
            close_db(self.db);
        };
    }
}

impl Connection {
    pub fn open(filename: &str) -> Result<Self, SqliteOpenErrors> {
        let flag = SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE;

        Connection::open_with_flags(filename, flag)
    }

    pub fn open_memory() -> Result<Self, SqliteOpenErrors> {
        let flag = SQLITE_OPEN_MEMORY | SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE;
        Connection::open_with_flags(":memory:", flag)
    }

    pub fn open_read_only(filename: &str) -> Result<Self, SqliteOpenErrors> {
        Connection::open_with_flags(filename, SQLITE_OPEN_READONLY)
    }

    // The flags refer to what mode to open the db in (readwrite, memory, etc)
    fn open_with_flags(filename: &str, flag: c_int) -> Result<Self, SqliteOpenErrors> {
        let mut db = ptr::null_mut();

        let c_filename =
            CString::new(filename).map_err(|_| SqliteOpenErrors::EmbeddedNullInFileName {
                filename: filename.to_owned(),
            })?;

        let code = unsafe { ffi::sqlite3_open_v2(c_filename.as_ptr(), &mut db, flag, ptr::null()) };

        if db.is_null() {
            Err(SqliteOpenErrors::ConnectionAllocationFailed)
        } else if code == SQLITE_OK {
            unsafe { sqlite3_busy_timeout(db, BUSY_TIMEOUT_MS) };
            tracing::debug!(filename, "opened sqlite connection");
            Ok(Connection { db })
        } else {
            let (code, error_msg) = unsafe { sqlite_failure(db) };
            unsafe {
                close_db(db);
            };
            Err(SqliteOpenErrors::SqliteFailure { code, error_msg })
        }
    }

    pub fn prepare(&self, sql: &str) -> Result<Statement<'_>, SqlitePrepareErrors> {
        let c_sql_query = CString::new(sql).map_err(|_| SqlitePrepareErrors::EmbeddedNullInSql)?;

        let mut stmt = ptr::null_mut();
        let code = unsafe {
            ffi::sqlite3_prepare_v2(
                self.db,
                c_sql_query.as_ptr(),
                -1,
                &mut stmt,
                ptr::null_mut(),
            )
        };

        if code != SQLITE_OK {
            let (code, error_msg) = unsafe { sqlite_failure(self.db) };
            return Err(SqlitePrepareErrors::SqliteFailure { code, error_msg });
        }

        // empty text or a lone comment compiles to nothing
        if stmt.is_null() {
            return Err(SqlitePrepareErrors::EmptySql);
        }

        Ok(Statement { conn: self, stmt })
    }

    /// Runs one or more `;` separated statements, discarding any rows.
    pub fn exec(&self, sql: &str) -> Result<(), SqliteFailure> {
        let c_sql = CString::new(sql).map_err(|_| SqliteFailure {
            code: ffi::SQLITE_MISUSE,
            error_msg: "sql statement contains a null byte".to_owned(),
        })?;

        let code = unsafe {
            sqlite3_exec(
                self.db,
                c_sql.as_ptr(),
                None,
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };

        if code != SQLITE_OK {
            let (code, error_msg) = unsafe { sqlite_failure(self.db) };
            return Err(SqliteFailure { code, error_msg });
        }
        Ok(())
    }
}
