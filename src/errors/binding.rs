/// The SELECT clause could not be turned into a binding table.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MapperError {
    #[error("statement has no SELECT clause")]
    NotASelect,

    /// `*` and `t.*` expand to a column list that cannot be known from the text.
    #[error("wildcard projection `{text}` cannot be bound by position")]
    Wildcard { text: String },

    #[error("failed to parse SELECT clause: {0}")]
    Parse(String),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BindError {
    /// None of the output expressions matched a field of the target record.
    /// Iterating anyway would have no observable effect.
    #[error("no bindable columns: none of {keys:?} matches a field of {record}")]
    NoBindableColumns { record: &'static str, keys: Vec<String> },

    #[error("identifier column `{column}` is not part of the SELECT clause")]
    IdentifierNotSelected { column: String },

    #[error("SELECT clause names {expected} columns but the statement returns {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },
}
