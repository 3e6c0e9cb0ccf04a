use libsqlite3_sys::{
    SQLITE_BLOB, SQLITE_FLOAT, SQLITE_INTEGER, SQLITE_NULL, SQLITE_TEXT, sqlite3_column_blob,
    sqlite3_column_bytes, sqlite3_column_double, sqlite3_column_int64, sqlite3_column_text,
    sqlite3_column_type, sqlite3_stmt,
};
use std::{ffi::c_int, marker::PhantomData, slice};

use crate::{internal_sqlite::statement::Statement, query::Value};

/// Read access to the row a statement is positioned on.
///
/// Column indexes are 0-based, as in the SQLite C API. Reads borrow SQLite's
/// own buffers and copy out of them; nothing is cached between rows.
pub struct CurrentRow<'stmt> {
    stmt: *mut sqlite3_stmt,
    _statement: PhantomData<&'stmt Statement<'stmt>>,
}

impl<'stmt> CurrentRow<'stmt> {
    pub(crate) fn new(statement: &'stmt Statement<'_>) -> Self {
        CurrentRow {
            stmt: statement.stmt,
            _statement: PhantomData,
        }
    }

    pub fn column_type(&self, index: c_int) -> c_int {
        unsafe { sqlite3_column_type(self.stmt, index) }
    }

    pub fn is_null(&self, index: c_int) -> bool {
        self.column_type(index) == SQLITE_NULL
    }

    pub fn integer(&self, index: c_int) -> i64 {
        unsafe { sqlite3_column_int64(self.stmt, index) }
    }

    pub fn real(&self, index: c_int) -> f64 {
        unsafe { sqlite3_column_double(self.stmt, index) }
    }

    /// Overwrites `out` with the column's text, reusing its allocation.
    pub fn text_into(&self, index: c_int, out: &mut String) {
        out.clear();
        let bytes = self.text_bytes(index);
        match std::str::from_utf8(bytes) {
            Ok(text) => out.push_str(text),
            Err(_) => out.push_str(&String::from_utf8_lossy(bytes)),
        }
    }

    /// Overwrites `out` with the column's bytes, reusing its allocation.
    pub fn blob_into(&self, index: c_int, out: &mut Vec<u8>) {
        out.clear();
        out.extend_from_slice(self.blob_bytes(index));
    }

    pub fn value(&self, index: c_int) -> Value {
        match self.column_type(index) {
            SQLITE_INTEGER => Value::Integer(self.integer(index)),
            SQLITE_FLOAT => Value::Real(self.real(index)),
            SQLITE_TEXT => {
                let mut text = String::new();
                self.text_into(index, &mut text);
                Value::Text(text)
            }
            SQLITE_BLOB => Value::Blob(self.blob_bytes(index).to_vec()),
            _ => Value::Null,
        }
    }

    fn text_bytes(&self, index: c_int) -> &[u8] {
        // sqlite3_column_text first, then sqlite3_column_bytes: the length
        // is only valid for the representation that was last requested
        unsafe {
            let ptr = sqlite3_column_text(self.stmt, index);
            let len = sqlite3_column_bytes(self.stmt, index);
            if ptr.is_null() || len <= 0 {
                &[]
            } else {
                slice::from_raw_parts(ptr, len as usize)
            }
        }
    }

    fn blob_bytes(&self, index: c_int) -> &[u8] {
        unsafe {
            let ptr = sqlite3_column_blob(self.stmt, index);
            let len = sqlite3_column_bytes(self.stmt, index);
            if ptr.is_null() || len <= 0 {
                &[]
            } else {
                slice::from_raw_parts(ptr as *const u8, len as usize)
            }
        }
    }
}
