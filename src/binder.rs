//! Wires binding keys to the typed field registry of a record.
//!
//! Binding happens once per execution; every fetch afterwards only copies
//! the current row into the same slots.

use std::{ffi::c_int, marker::PhantomData};

use crate::{
    errors::binding::BindError,
    internal_sqlite::row::CurrentRow,
    mapper::BindingTable,
    traits::bind_record::BindRecord,
};

/// A result column wired to a field of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundColumn {
    /// 1-based column position.
    pub position: usize,
    /// Index into `R::FIELDS`.
    pub field: usize,
}

/// The destinations registered for one execution.
pub struct BoundColumns<R> {
    columns: Vec<BoundColumn>,
    highest_position: usize,
    _record: PhantomData<fn(&mut R)>,
}

impl<R: BindRecord> BoundColumns<R> {
    pub fn columns(&self) -> &[BoundColumn] {
        &self.columns
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| R::FIELDS[c.field].name).collect()
    }

    /// Fails if the statement returns fewer columns than the SELECT clause
    /// names, which would make positional reads run off the end.
    pub fn verify_column_count(&self, actual: usize) -> Result<(), BindError> {
        if actual < self.highest_position {
            return Err(BindError::ColumnCountMismatch {
                expected: self.highest_position,
                actual,
            });
        }
        Ok(())
    }

    /// Copies the current row into the bound fields of `record`.
    pub fn transfer(&self, row: &CurrentRow<'_>, record: &mut R) {
        for column in &self.columns {
            let slot = &R::FIELDS[column.field];
            (slot.load)(record, row, (column.position - 1) as c_int);
        }
    }
}

pub struct RowBinder;

impl RowBinder {
    /// Registers a field for every binding whose key names one, matching
    /// exactly and case-sensitively.
    pub fn bind<R: BindRecord>(table: &BindingTable) -> Result<BoundColumns<R>, BindError> {
        let columns: Vec<BoundColumn> = table
            .iter()
            .filter_map(|binding| {
                R::field_index(&binding.key).map(|field| BoundColumn {
                    position: binding.position,
                    field,
                })
            })
            .collect();

        if columns.is_empty() {
            let keys = table.keys();
            tracing::error!(record = R::record_name(), ?keys, "no bindable columns");
            return Err(BindError::NoBindableColumns {
                record: R::record_name(),
                keys,
            });
        }

        if columns.len() < table.len() {
            let unbound: Vec<&str> = table
                .iter()
                .filter(|b| R::field_index(&b.key).is_none())
                .map(|b| b.key.as_str())
                .collect();
            tracing::warn!(record = R::record_name(), ?unbound, "result columns without a field");
        }

        Ok(BoundColumns {
            columns,
            highest_position: table.iter().map(|b| b.position).max().unwrap_or(0),
            _record: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        internal_sqlite::connection::Connection, mapper::ColumnMapper,
        traits::bind_record::FieldSlot, traits::from_column::FromColumn,
    };

    #[derive(Default, Debug)]
    struct Person {
        name: String,
        age: i64,
    }

    fn load_name(p: &mut Person, row: &CurrentRow<'_>, index: c_int) {
        p.name.load(row, index);
    }

    fn load_age(p: &mut Person, row: &CurrentRow<'_>, index: c_int) {
        p.age.load(row, index);
    }

    impl BindRecord for Person {
        const FIELDS: &'static [FieldSlot<Self>] = &[
            FieldSlot {
                name: "name",
                load: load_name,
            },
            FieldSlot {
                name: "age",
                load: load_age,
            },
        ];
    }

    fn table(sql: &str) -> BindingTable {
        ColumnMapper::new().resolve(sql).unwrap()
    }

    #[test]
    fn test_binds_matching_keys_only() {
        let bound = RowBinder::bind::<Person>(&table("SELECT id, p.name, years AS age FROM p")).unwrap();

        assert_eq!(
            bound.columns(),
            &[
                BoundColumn {
                    position: 2,
                    field: 0
                },
                BoundColumn {
                    position: 3,
                    field: 1
                },
            ]
        );
        assert_eq!(bound.field_names(), vec!["name", "age"]);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let result = RowBinder::bind::<Person>(&table("SELECT Name, AGE FROM p"));

        assert!(matches!(result, Err(BindError::NoBindableColumns { keys, .. }) if keys == vec!["Name", "AGE"]));
    }

    #[test]
    fn test_column_count_check() {
        let bound = RowBinder::bind::<Person>(&table("SELECT id, name FROM p")).unwrap();

        assert!(bound.verify_column_count(2).is_ok());
        assert_eq!(
            bound.verify_column_count(1),
            Err(BindError::ColumnCountMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_transfer_reuses_the_same_record() {
        let conn = Connection::open_memory().unwrap();
        let stmt = conn
            .prepare("SELECT 'ada' AS name, 36 AS age UNION ALL SELECT 'grace', 85")
            .unwrap();
        let bound = RowBinder::bind::<Person>(&table("SELECT 'ada' AS name, 36 AS age")).unwrap();
        let mut person = Person::default();

        assert!(stmt.fetch_next().unwrap());
        bound.transfer(&stmt.row(), &mut person);
        assert_eq!((person.name.as_str(), person.age), ("ada", 36));

        assert!(stmt.fetch_next().unwrap());
        bound.transfer(&stmt.row(), &mut person);
        assert_eq!((person.name.as_str(), person.age), ("grace", 85));

        assert!(!stmt.fetch_next().unwrap());
    }
}
