use std::ffi::c_int;

use crate::internal_sqlite::row::CurrentRow;

/// One named storage slot of a record type.
pub struct FieldSlot<R> {
    /// Name a SELECT column must resolve to (exact, case-sensitive).
    pub name: &'static str,
    /// Refreshes the field from a 0-based column of the current row.
    pub load: fn(&mut R, &CurrentRow<'_>, c_int),
}

/// A caller-owned record whose fields can be bound to result columns.
///
/// The field table is static, built once per type, usually by
/// `#[derive(BindRecord)]`:
///
/// ```ignore
/// #[derive(Default, pagesql::BindRecord)]
/// struct User {
///     id: i64,
///     username: String,
///     #[bind(rename = "SMITH_COUNT")]
///     smith_count: i64,
/// }
/// ```
pub trait BindRecord: Sized + 'static {
    const FIELDS: &'static [FieldSlot<Self>];

    /// Type name used in binding errors.
    fn record_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    fn field_index(name: &str) -> Option<usize> {
        Self::FIELDS.iter().position(|field| field.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, pagesql::BindRecord)]
    struct User {
        id: i64,
        r#type: String,
        #[bind(rename = "SMITH_COUNT")]
        smith_count: Option<i64>,
        #[bind(skip)]
        #[allow(dead_code)]
        cache: Vec<u8>,
    }

    #[test]
    fn test_derived_field_table() {
        let names: Vec<&str> = User::FIELDS.iter().map(|f| f.name).collect();

        assert_eq!(names, vec!["id", "type", "SMITH_COUNT"]);
        assert_eq!(User::field_index("SMITH_COUNT"), Some(2));
        assert_eq!(User::field_index("smith_count"), None);
        assert_eq!(User::field_index("cache"), None);
        assert!(User::record_name().ends_with("User"));
    }

    #[test]
    fn test_derived_slots_load_fields() {
        let conn = crate::internal_sqlite::connection::Connection::open_memory().unwrap();
        let stmt = conn.prepare("SELECT 7, 'admin', NULL").unwrap();
        let mut user = User {
            smith_count: Some(3),
            ..Default::default()
        };

        assert!(stmt.fetch_next().unwrap());
        let row = stmt.row();
        for (index, slot) in User::FIELDS.iter().enumerate() {
            (slot.load)(&mut user, &row, index as c_int);
        }

        assert_eq!(user.id, 7);
        assert_eq!(user.r#type, "admin");
        assert_eq!(user.smith_count, None);
    }
}
