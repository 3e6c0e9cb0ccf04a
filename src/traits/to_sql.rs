use std::ffi::{c_int, c_void};

use libsqlite3_sys::{self as ffi, SQLITE_TOOBIG, SQLITE_TRANSIENT, sqlite3_stmt};

use crate::query::Value;

pub trait ToSql {
    /// - Indexes start at 1
    /// - returns the sqlite3_bind_* result code
    ///# Safety
    ///
    /// Pass in the stmt pointer (not the address). it uses sqlite3_bind_* to bind it to the correct type
    unsafe fn bind_to(self, stmt: *mut sqlite3_stmt, index: i32) -> i32;
}

impl ToSql for String {
    unsafe fn bind_to(self, stmt: *mut sqlite3_stmt, index: i32) -> i32 {
        unsafe { self.as_str().bind_to(stmt, index) }
    }
}

impl ToSql for &str {
    unsafe fn bind_to(self, stmt: *mut sqlite3_stmt, index: i32) -> i32 {
        let bytes = self.as_bytes();
        let Ok(len) = c_int::try_from(bytes.len()) else {
            return SQLITE_TOOBIG;
        };

        unsafe {
            ffi::sqlite3_bind_text(
                stmt,
                index,
                bytes.as_ptr() as *const _,
                len,
                SQLITE_TRANSIENT(),
            )
        }
    }
}

impl ToSql for &[u8] {
    unsafe fn bind_to(self, stmt: *mut sqlite3_stmt, index: i32) -> i32 {
        let Ok(len) = c_int::try_from(self.len()) else {
            return SQLITE_TOOBIG;
        };

        unsafe {
            ffi::sqlite3_bind_blob(
                stmt,
                index,
                self.as_ptr() as *const c_void,
                len,
                SQLITE_TRANSIENT(),
            )
        }
    }
}

impl ToSql for i32 {
    unsafe fn bind_to(self, stmt: *mut sqlite3_stmt, index: i32) -> i32 {
        unsafe { ffi::sqlite3_bind_int(stmt, index, self) }
    }
}

impl ToSql for i64 {
    unsafe fn bind_to(self, stmt: *mut sqlite3_stmt, index: i32) -> i32 {
        unsafe { ffi::sqlite3_bind_int64(stmt, index, self) }
    }
}

impl ToSql for f64 {
    unsafe fn bind_to(self, stmt: *mut sqlite3_stmt, index: i32) -> i32 {
        unsafe { ffi::sqlite3_bind_double(stmt, index, self) }
    }
}

impl ToSql for bool {
    unsafe fn bind_to(self, stmt: *mut sqlite3_stmt, index: i32) -> i32 {
        unsafe { ffi::sqlite3_bind_int(stmt, index, self as i32) }
    }
}

impl<T: ToSql> ToSql for Option<T> {
    unsafe fn bind_to(self, stmt: *mut sqlite3_stmt, index: i32) -> i32 {
        match self {
            Some(rust_value) => unsafe { rust_value.bind_to(stmt, index) },
            None => unsafe { ffi::sqlite3_bind_null(stmt, index) },
        }
    }
}

impl ToSql for &Value {
    unsafe fn bind_to(self, stmt: *mut sqlite3_stmt, index: i32) -> i32 {
        unsafe {
            match self {
                Value::Integer(i) => i.bind_to(stmt, index),
                Value::Real(r) => r.bind_to(stmt, index),
                Value::Text(s) => s.as_str().bind_to(stmt, index),
                Value::Blob(b) => b.as_slice().bind_to(stmt, index),
                Value::Null => ffi::sqlite3_bind_null(stmt, index),
            }
        }
    }
}
