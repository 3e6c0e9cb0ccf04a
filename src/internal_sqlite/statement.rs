use libsqlite3_sys::{
    SQLITE_BUSY, SQLITE_DONE, SQLITE_OK, SQLITE_ROW, sqlite3_bind_parameter_index,
    sqlite3_column_count, sqlite3_finalize, sqlite3_step, sqlite3_stmt,
};
use std::ffi::CString;

use crate::{
    errors::{SqliteFailure, row::RowError},
    internal_sqlite::{connection::Connection, row::CurrentRow},
    traits::to_sql::ToSql,
    utility::utils::sqlite_failure,
};

/// A prepared statement. Dropping it finalizes the underlying handle, which
/// also closes any open result set.
pub struct Statement<'conn> {
    pub(crate) conn: &'conn Connection,
    pub(crate) stmt: *mut sqlite3_stmt,
}

impl Drop for Statement<'_> {
    fn drop(&mut self) {
        unsafe {
            sqlite3_finalize(self.stmt);
        }
    }
}

impl Statement<'_> {
    ///note index start from 1 and not 0
    pub fn bind_parameter(&self, index: i32, value: impl ToSql) -> Result<(), SqliteFailure> {
        let code = unsafe { value.bind_to(self.stmt, index) };

        if code != SQLITE_OK {
            let (code, error_msg) = unsafe { sqlite_failure(self.conn.db) };
            Err(SqliteFailure { code, error_msg })
        } else {
            Ok(())
        }
    }

    /// Index of a named parameter (`:name`, `@name`, `$name`), if the
    /// statement has one.
    pub fn parameter_index(&self, name: &str) -> Option<i32> {
        let c_name = CString::new(name).ok()?;
        let index = unsafe { sqlite3_bind_parameter_index(self.stmt, c_name.as_ptr()) };

        (index > 0).then_some(index)
    }

    pub fn column_count(&self) -> usize {
        let count = unsafe { sqlite3_column_count(self.stmt) };
        count.max(0) as usize
    }

    /// Moves to the next row of the result set. `Ok(true)` means a row is
    /// ready to be read through [`Statement::row`].
    pub fn fetch_next(&self) -> Result<bool, RowError> {
        let result_code = unsafe { sqlite3_step(self.stmt) };

        if result_code == SQLITE_ROW {
            Ok(true)
        } else if result_code == SQLITE_DONE {
            Ok(false)
        } else if result_code == SQLITE_BUSY {
            Err(RowError::SqliteBusy)
        } else {
            let (code, error_msg) = unsafe { sqlite_failure(self.conn.db) };
            Err(RowError::SqliteFailure { code, error_msg })
        }
    }

    /// The row the statement currently points at. Only meaningful after
    /// [`Statement::fetch_next`] returned `Ok(true)`.
    pub fn row(&self) -> CurrentRow<'_> {
        CurrentRow::new(self)
    }
}
