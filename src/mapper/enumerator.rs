use crate::errors::binding::MapperError;

/// What kind of output expression a SELECT item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionKind {
    /// Aggregate or scalar function call, `CAST(..)` included.
    Function,
    /// `col`, `t.col`, `schema.t.col`.
    ColumnRef,
    /// `*` or `t.*`.
    Wildcard,
    /// Literals, arithmetic, `CASE`, sub-queries.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Alias text with any surrounding quotes removed.
    pub name: String,
    /// The quote character the alias was written with, if any.
    pub quote: Option<char>,
}

/// One top-level expression of a SELECT clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectExpression {
    pub kind: ExpressionKind,
    /// Expression text, without the alias.
    pub text: String,
    /// Unquoted identifier segments of a column reference, outermost first.
    pub parts: Vec<String>,
    pub alias: Option<Alias>,
}

impl SelectExpression {
    pub fn new(kind: ExpressionKind, text: impl Into<String>) -> Self {
        SelectExpression {
            kind,
            text: text.into(),
            parts: Vec::new(),
            alias: None,
        }
    }

    pub fn column(parts: Vec<String>, text: impl Into<String>) -> Self {
        SelectExpression {
            kind: ExpressionKind::ColumnRef,
            text: text.into(),
            parts,
            alias: None,
        }
    }

    pub fn aliased(mut self, name: impl Into<String>, quote: Option<char>) -> Self {
        self.alias = Some(Alias {
            name: name.into(),
            quote,
        });
        self
    }
}

/// Lists the output expressions of a statement's top-level SELECT clause,
/// left to right. Nothing else about the statement needs to be understood.
pub trait ExpressionEnumerator {
    fn enumerate(&self, sql: &str) -> Result<Vec<SelectExpression>, MapperError>;
}
