use crate::errors::{
    SqliteFailure,
    binding::{BindError, MapperError},
    connection::SqlitePrepareErrors,
    row::RowError,
};

/// Rejected before any I/O happens.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("sql text is empty")]
    EmptySql,

    #[error("pagination needs a non-empty identifier column")]
    EmptyIdentifierColumn,

    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Unified error type for the cursors.
#[derive(thiserror::Error, Debug)]
pub enum CursorError {
    #[error("invalid query: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot map SELECT clause: {0}")]
    Mapper(#[from] MapperError),

    #[error(transparent)]
    Binding(#[from] BindError),

    #[error("Failed to prepare statement: {0}")]
    Prepare(#[from] SqlitePrepareErrors),

    #[error("Failed to bind parameter {param}: {source}")]
    Parameter {
        param: String,
        #[source]
        source: SqliteFailure,
    },

    #[error("parameter {0} does not appear in the statement")]
    UnknownParameter(String),

    #[error("Failed to fetch row: {0}")]
    Fetch(#[from] RowError),
}

impl CursorError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, CursorError::Config(_))
    }

    /// Contract violations between the SELECT clause and the target record.
    pub fn is_binding(&self) -> bool {
        matches!(self, CursorError::Mapper(_) | CursorError::Binding(_))
    }

    /// Failures reported by the database itself.
    pub fn is_execution(&self) -> bool {
        matches!(
            self,
            CursorError::Prepare(_)
                | CursorError::Parameter { .. }
                | CursorError::UnknownParameter(_)
                | CursorError::Fetch(_)
        )
    }
}
