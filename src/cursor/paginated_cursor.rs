use std::ops::ControlFlow;

use crate::{
    cursor::{CursorState, result_cursor::ResultCursor},
    errors::{binding::BindError, cursor::CursorError},
    internal_sqlite::connection::Connection,
    query::{PageSpec, ParamKey, Query, Value},
    traits::bind_record::BindRecord,
    utility::utils::trim_statement_end,
};

/// Keyset pagination over a query ordered by an increasing identifier.
///
/// The SQL must compare the identifier column against the identifier
/// parameter and order by that column, without a `LIMIT`:
///
/// ```sql
/// SELECT id, name FROM users WHERE id > :id ORDER BY id
/// ```
///
/// Each page runs with `LIMIT <page size>`. When a full page runs out the
/// query is executed again from the last identifier seen, so callers only
/// ever loop on [`PaginatedCursor::advance`]. Once rows run out, or after
/// [`PaginatedCursor::close`], no further page is executed until the next
/// explicit `execute`.
pub struct PaginatedCursor<'conn, R> {
    inner: ResultCursor<'conn, R>,
    page: PageSpec,
    identifier_param: ParamKey,
    identifier_position: Option<usize>,
    last_identifier: Value,
    current_page_rows: u32,
    pages_executed: u64,
    finished: bool,
    conn: Option<&'conn Connection>,
}

impl<'conn, R: BindRecord> PaginatedCursor<'conn, R> {
    pub fn new(query: Query, page: PageSpec) -> Result<Self, CursorError> {
        query.validate()?;
        page.validate()?;

        // own line, so a trailing `--` comment cannot swallow the limit
        let sql = format!(
            "{}\nLIMIT {}",
            trim_statement_end(query.sql()),
            page.page_size()
        );
        let inner = ResultCursor::new(Query::new(sql).with_params(query.params().clone()));

        Ok(PaginatedCursor {
            inner,
            identifier_param: page.identifier_param(),
            identifier_position: None,
            last_identifier: page.start_after().clone(),
            current_page_rows: 0,
            pages_executed: 0,
            finished: false,
            conn: None,
            page,
        })
    }

    pub fn state(&self) -> CursorState {
        self.inner.state()
    }

    /// Identifier of the last row loaded; the lower bound of the next page.
    pub fn last_identifier(&self) -> &Value {
        &self.last_identifier
    }

    pub fn current_page_rows(&self) -> u32 {
        self.current_page_rows
    }

    /// Number of successful page executions so far.
    pub fn pages_executed(&self) -> u64 {
        self.pages_executed
    }

    /// Runs the next page, starting after [`PaginatedCursor::last_identifier`].
    pub fn execute(&mut self, conn: &'conn Connection) -> Result<(), CursorError> {
        self.inner
            .params_mut()
            .set(self.identifier_param.clone(), self.last_identifier.clone());
        self.current_page_rows = 0;
        self.inner.execute(conn)?;

        let column = self.page.identifier_column();
        let Some(position) = self.inner.bindings().and_then(|b| b.position_of(column)) else {
            self.inner.reset();
            tracing::error!(column, "identifier column is not selected");
            return Err(BindError::IdentifierNotSelected {
                column: column.to_owned(),
            }
            .into());
        };

        self.identifier_position = Some(position);
        self.finished = false;
        self.conn = Some(conn);
        self.pages_executed += 1;
        tracing::debug!(
            page = self.pages_executed,
            after = %self.last_identifier,
            "executed page"
        );
        Ok(())
    }

    /// Loads the next row into `record`, executing the next page when a full
    /// page has been consumed.
    pub fn advance(&mut self, record: &mut R) -> Result<bool, CursorError> {
        if self.finished || self.inner.state() == CursorState::Idle {
            return Ok(false);
        }
        if self.fetch(record)? {
            return Ok(true);
        }

        // a short page is the last one
        let conn = match self.conn {
            Some(conn) if self.current_page_rows >= self.page.page_size() => conn,
            _ => {
                self.finished = true;
                return Ok(false);
            }
        };

        self.inner.close();
        self.execute(conn)?;
        if self.fetch(record)? {
            return Ok(true);
        }
        self.finished = true;
        Ok(false)
    }

    /// Releases the open page. Later `advance` calls return `Ok(false)`
    /// without executing another page.
    pub fn close(&mut self) {
        self.inner.close();
        self.finished = true;
    }

    /// Walks every page, handing each row to `f` until it breaks or rows run
    /// out. Returns the number of rows handed out.
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

        self.inner.finish();
        self.finished = true;
        result
    }

    fn fetch(&mut self, record: &mut R) -> Result<bool, CursorError> {
        if !self.inner.advance(record)? {
            return Ok(false);
        }

        self.current_page_rows += 1;
        if let Some(position) = self.identifier_position
            && let Some(identifier) = self.inner.column_value(position)
        {
            self.last_identifier = identifier;
        }
        tracing::trace!(page_rows = self.current_page_rows, "fetched page row");
        Ok(true)
    }
}
