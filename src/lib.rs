//! Bounded-memory iteration over SQLite result sets.
//!
//! Result columns are bound by name to the fields of a caller-owned record,
//! which is refreshed in place for every row. [`PaginatedCursor`] pages
//! through large tables by an increasing identifier column (keyset
//! pagination) instead of `OFFSET`.
//!
//! ```ignore
//! use pagesql::{BindRecord, Connection, PageSpec, PaginatedCursor, Query};
//!
//! #[derive(Default, BindRecord)]
//! struct User {
//!     id: i64,
//!     username: String,
//! }
//!
//! let conn = Connection::open("app.db")?;
//! let query = Query::new("SELECT id, username FROM users WHERE id > :id ORDER BY id");
//! let mut cursor = PaginatedCursor::<User>::new(query, PageSpec::new(1000, "id"))?;
//! let mut user = User::default();
//!
//! cursor.execute(&conn)?;
//! while cursor.advance(&mut user)? {
//!     println!("{}", user.username);
//! }
//! ```

extern crate self as pagesql;

pub mod binder;
pub mod cursor;
pub mod errors;
pub mod internal_sqlite;
pub mod mapper;
pub mod query;
pub mod traits;
mod utility;

pub use binder::{BoundColumn, BoundColumns, RowBinder};
pub use cursor::{CursorState, PaginatedCursor, ResultCursor};
pub use errors::{
    SqliteFailure,
    binding::{BindError, MapperError},
    connection::{SqliteOpenErrors, SqlitePrepareErrors},
    cursor::{ConfigError, CursorError},
    row::RowError,
};
pub use internal_sqlite::{
    connection::{BUSY_TIMEOUT_MS, Connection},
    row::CurrentRow,
    statement::Statement,
};
pub use mapper::{Binding, BindingTable, ColumnMapper};
pub use query::{PageSpec, ParamKey, Params, Query, Value};
pub use traits::{
    bind_record::{BindRecord, FieldSlot},
    from_column::FromColumn,
    to_sql::ToSql,
};

pub use pagesql_macros::BindRecord;
