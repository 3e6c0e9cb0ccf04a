use libsqlite3_sys::SQLITE_TEXT;
use std::ffi::c_int;

use crate::{internal_sqlite::row::CurrentRow, query::Value};

/// A storage slot that can be refreshed in place from a result column.
///
/// Implementations overwrite `self` rather than building a new value, so a
/// `String` or `Vec<u8>` field keeps its allocation from row to row.
/// SQL NULL resets a non-`Option` slot to its default.
pub trait FromColumn {
    fn load(&mut self, row: &CurrentRow<'_>, index: c_int);
}

impl FromColumn for i64 {
    fn load(&mut self, row: &CurrentRow<'_>, index: c_int) {
        *self = row.integer(index);
    }
}

/// Out-of-range integers saturate at `i32::MIN` / `i32::MAX`.
impl FromColumn for i32 {
    fn load(&mut self, row: &CurrentRow<'_>, index: c_int) {
        let value = row.integer(index);
        *self = i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX });
    }
}

/// Negative integers load as 0, values above `u32::MAX` as `u32::MAX`.
impl FromColumn for u32 {
    fn load(&mut self, row: &CurrentRow<'_>, index: c_int) {
        let value = row.integer(index);
        *self = u32::try_from(value).unwrap_or(if value < 0 { 0 } else { u32::MAX });
    }
}

impl FromColumn for f64 {
    fn load(&mut self, row: &CurrentRow<'_>, index: c_int) {
        *self = row.real(index);
    }
}

impl FromColumn for bool {
    fn load(&mut self, row: &CurrentRow<'_>, index: c_int) {
        *self = row.integer(index) != 0;
    }
}

impl FromColumn for String {
    fn load(&mut self, row: &CurrentRow<'_>, index: c_int) {
        row.text_into(index, self);
    }
}

impl FromColumn for Vec<u8> {
    fn load(&mut self, row: &CurrentRow<'_>, index: c_int) {
        row.blob_into(index, self);
    }
}

impl FromColumn for Value {
    fn load(&mut self, row: &CurrentRow<'_>, index: c_int) {
        // keep the existing buffer when text follows text
        if row.column_type(index) == SQLITE_TEXT {
            if let Value::Text(current) = self {
                row.text_into(index, current);
                return;
            }
        }
        *self = row.value(index);
    }
}

impl<T: FromColumn + Default> FromColumn for Option<T> {
    fn load(&mut self, row: &CurrentRow<'_>, index: c_int) {
        if row.is_null(index) {
            *self = None;
        } else {
            self.get_or_insert_with(T::default).load(row, index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal_sqlite::connection::Connection;

    fn load_first<T: FromColumn>(sql: &str, slot: &mut T) {
        let conn = Connection::open_memory().unwrap();
        let stmt = conn.prepare(sql).unwrap();
        assert!(stmt.fetch_next().unwrap());
        slot.load(&stmt.row(), 0);
    }

    #[test]
    fn test_narrow_integers_saturate() {
        let mut small = 0i32;
        load_first("SELECT 5000000000", &mut small);
        assert_eq!(small, i32::MAX);
        load_first("SELECT -5000000000", &mut small);
        assert_eq!(small, i32::MIN);
        load_first("SELECT -12", &mut small);
        assert_eq!(small, -12);

        let mut unsigned = 7u32;
        load_first("SELECT -1", &mut unsigned);
        assert_eq!(unsigned, 0);
        load_first("SELECT 5000000000", &mut unsigned);
        assert_eq!(unsigned, u32::MAX);
        load_first("SELECT 42", &mut unsigned);
        assert_eq!(unsigned, 42);
    }

    #[test]
    fn test_optional_value_slot() {
        let mut slot: Option<Value> = None;
        load_first("SELECT 'abc'", &mut slot);
        assert_eq!(slot, Some(Value::Text("abc".into())));

        load_first("SELECT NULL", &mut slot);
        assert_eq!(slot, None);

        load_first("SELECT x'00ff'", &mut slot);
        assert_eq!(slot, Some(Value::Blob(vec![0, 255])));
    }

    #[test]
    fn test_null_resets_plain_slots() {
        let mut text = String::from("stale");
        load_first("SELECT NULL", &mut text);
        assert_eq!(text, "");

        let mut value = Value::Integer(3);
        load_first("SELECT NULL", &mut value);
        assert_eq!(value, Value::default());
    }
}
