use libsqlite3_sys::{self as ffi, sqlite3, sqlite3_errcode};
use std::ffi::{CStr, c_char};

/// Internally calls sqlite3_errcode and sqlite3_errmsg to return
/// the code and error_msg of the most recent failure on `db`
///
///  # Safety
///
/// - db must be a valid sqlite3 connection which is not NULL
pub unsafe fn sqlite_failure(db: *mut sqlite3) -> (i32, String) {
    let safe_error_msg = unsafe {
        // sqlite internally handles dropping c_error_msg
        let c_error_msg = ffi::sqlite3_errmsg(db);
        CStr::from_ptr(c_error_msg as *const c_char)
    };

    let error_msg = safe_error_msg.to_string_lossy().into_owned();
    let code = unsafe { sqlite3_errcode(db) };

    (code, error_msg)
}

/// Every statement is finalized by its own Drop before the connection goes,
/// so sqlite3_close is enough here (sqlite3_close_v2 is meant for gc languages)
///
/// # Safety
///
/// - db must be a valid sqlite3 connection or NULL
pub unsafe fn close_db(db: *mut sqlite3) {
    unsafe { ffi::sqlite3_close(db) };
}

/// Strips trailing whitespace and statement terminators so a clause can be
/// appended to the text.
pub fn trim_statement_end(sql: &str) -> &str {
    sql.trim_end().trim_end_matches(';').trim_end()
}
