use std::ops::ControlFlow;

use crate::{
    binder::{BoundColumns, RowBinder},
    cursor::CursorState,
    errors::cursor::CursorError,
    internal_sqlite::{connection::Connection, statement::Statement},
    mapper::{BindingTable, ColumnMapper},
    query::{ParamKey, Params, Query, Value},
    traits::bind_record::BindRecord,
};

struct Execution<'conn, R> {
    stmt: Statement<'conn>,
    bound: BoundColumns<R>,
    rows: u64,
}

/// Runs one query and copies each row into a caller-owned record.
///
/// ```ignore
/// let mut cursor = ResultCursor::<User>::new(Query::new("SELECT id, username FROM users"));
/// let mut user = User::default();
///
/// cursor.execute(&conn)?;
/// while cursor.advance(&mut user)? {
///     println!("{} {}", user.id, user.username);
/// }
/// ```
pub struct ResultCursor<'conn, R> {
    query: Query,
    mapper: ColumnMapper,
    bindings: Option<BindingTable>,
    execution: Option<Execution<'conn, R>>,
    state: CursorState,
}

impl<'conn, R: BindRecord> ResultCursor<'conn, R> {
    pub fn new(query: Query) -> Self {
        ResultCursor {
            query,
            mapper: ColumnMapper::new(),
            bindings: None,
            execution: None,
            state: CursorState::Idle,
        }
    }

    pub fn with_mapper(mut self, mapper: ColumnMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Binding table of the last successful execution.
    pub fn bindings(&self) -> Option<&BindingTable> {
        self.bindings.as_ref()
    }

    /// Prepares the statement, binds parameters and wires result columns to
    /// the fields of `R`. Any statement still open from an earlier execution
    /// is released first. On failure nothing stays open and the cursor is
    /// `Idle`.
    pub fn execute(&mut self, conn: &'conn Connection) -> Result<(), CursorError> {
        self.query.validate()?;
        self.reset();

        let stmt = conn.prepare(self.query.sql())?;
        bind_params(&stmt, self.query.params())?;

        let bindings = self.mapper.resolve(self.query.sql())?;
        let bound = RowBinder::bind::<R>(&bindings)?;
        bound.verify_column_count(stmt.column_count())?;

        tracing::debug!(
            sql = self.query.sql(),
            params = self.query.params().len(),
            bound = ?bound.field_names(),
            "executed query"
        );

        self.bindings = Some(bindings);
        self.execution = Some(Execution {
            stmt,
            bound,
            rows: 0,
        });
        self.state = CursorState::Executing;
        Ok(())
    }

    /// Loads the next row into `record`. Returns `Ok(false)` once rows run
    /// out, and keeps returning it, as it does before any `execute`.
    pub fn advance(&mut self, record: &mut R) -> Result<bool, CursorError> {
        let Some(execution) = self.execution.as_mut() else {
            return Ok(false);
        };

        match execution.stmt.fetch_next() {
            Ok(true) => {
                execution.bound.transfer(&execution.stmt.row(), record);
                execution.rows += 1;
                tracing::trace!(row = execution.rows, "fetched row");
                Ok(true)
            }
            Ok(false) => {
                self.finish();
                Ok(false)
            }
            Err(err) => {
                self.finish();
                Err(err.into())
            }
        }
    }

    /// Releases the statement before the rows run out. Safe to call any
    /// number of times.
    pub fn close(&mut self) {
        if let Some(execution) = self.execution.take() {
            tracing::warn!(rows = execution.rows, "closing cursor with an open statement");
        }
        if self.state == CursorState::Executing {
            self.state = CursorState::Exhausted;
        }
    }

    /// Runs the query and hands every row to `f` until it breaks or rows run
    /// out. The statement is released on every exit path. Returns the number
    /// of rows handed out.
    pub fn for_each<F>(
        &mut self,
        conn: &'conn Connection,
        record: &mut R,
        mut f: F,
    ) -> Result<u64, CursorError>
    where
        F: FnMut(&R) -> ControlFlow<()>,
    {
        self.execute(conn)?;

        let mut rows = 0;
        let result = loop {
            match self.advance(record) {
                Ok(true) => {
                    rows += 1;
                    if f(&*record).is_break() {
                        break Ok(rows);
                    }
                }
                Ok(false) => break Ok(rows),
                Err(err) => break Err(err),
            }
        };

        self.finish();
        result
    }

    pub(crate) fn params_mut(&mut self) -> &mut Params {
        self.query.params_mut()
    }

    /// Value of a 1-based column of the row loaded by the last `advance`.
    pub(crate) fn column_value(&self, position: usize) -> Option<Value> {
        let execution = self.execution.as_ref()?;
        let index = i32::try_from(position.checked_sub(1)?).ok()?;
        Some(execution.stmt.row().value(index))
    }

    /// Drops any open statement and returns to `Idle`.
    pub(crate) fn reset(&mut self) {
        self.execution = None;
        self.bindings = None;
        self.state = CursorState::Idle;
    }

    /// Releases the statement without the early-close warning.
    pub(crate) fn finish(&mut self) {
        if let Some(execution) = self.execution.take() {
            tracing::debug!(rows = execution.rows, "cursor exhausted");
        }
        if self.state == CursorState::Executing {
            self.state = CursorState::Exhausted;
        }
    }
}

fn bind_params(stmt: &Statement<'_>, params: &Params) -> Result<(), CursorError> {
    for (key, value) in params.iter() {
        let index = match key {
            ParamKey::Index(index) => *index,
            ParamKey::Name(name) => stmt
                .parameter_index(name)
                .ok_or_else(|| CursorError::UnknownParameter(name.clone()))?,
        };

        stmt.bind_parameter(index, value)
            .map_err(|source| CursorError::Parameter {
                param: key.to_string(),
                source,
            })?;
    }
    Ok(())
}
