//! Column mapping: which output column of a SELECT feeds which binding key.
//!
//! The key of each top-level expression is derived with this precedence:
//!
//! 1. function call with an alias: the alias, quotes stripped
//!    (`SUM(x) AS s`, `SUM(x) 'total'`)
//! 2. column reference with an alias: the alias (`col AS a`, `col a`)
//! 3. qualified column reference: its last segment (`t.col` -> `col`)
//! 4. bare column reference: the column text
//! 5. anything else: the alias if present, else the expression text
//!
//! Every expression takes the next 1-based position whether or not a field
//! ends up bound to it, so positions always follow the projection order.

pub mod clause_splitter;
pub mod enumerator;
pub mod sqlparser_enumerator;

use crate::{
    errors::binding::MapperError,
    mapper::{
        clause_splitter::ClauseSplitter,
        enumerator::{ExpressionEnumerator, ExpressionKind, SelectExpression},
        sqlparser_enumerator::SqlParserEnumerator,
    },
};

/// One output column and the key it binds under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// 1-based physical column position.
    pub position: usize,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.bindings.iter().map(|b| b.key.clone()).collect()
    }

    /// Position of the first column bound under `key`.
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.bindings.iter().find(|b| b.key == key).map(|b| b.position)
    }
}

impl FromIterator<Binding> for BindingTable {
    fn from_iter<I: IntoIterator<Item = Binding>>(iter: I) -> Self {
        BindingTable {
            bindings: iter.into_iter().collect(),
        }
    }
}

/// Resolves SELECT clauses into binding tables.
pub struct ColumnMapper {
    enumerator: Box<dyn ExpressionEnumerator>,
    fallback: Option<Box<dyn ExpressionEnumerator>>,
}

impl Default for ColumnMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnMapper {
    /// `sqlparser` first; the hand-rolled splitter when sqlparser rejects
    /// the statement.
    pub fn new() -> Self {
        ColumnMapper {
            enumerator: Box::new(SqlParserEnumerator),
            fallback: Some(Box::new(ClauseSplitter)),
        }
    }

    pub fn with_enumerator(enumerator: impl ExpressionEnumerator + 'static) -> Self {
        ColumnMapper {
            enumerator: Box::new(enumerator),
            fallback: None,
        }
    }

    pub fn resolve(&self, sql: &str) -> Result<BindingTable, MapperError> {
        let expressions = match (self.enumerator.enumerate(sql), &self.fallback) {
            (Err(MapperError::Parse(reason)), Some(fallback)) => {
                tracing::debug!(%reason, "sqlparser rejected statement, splitting SELECT clause by hand");
                fallback.enumerate(sql)?
            }
            (result, _) => result?,
        };

        expressions
            .iter()
            .zip(1..)
            .map(|(expression, position)| {
                Ok(Binding {
                    position,
                    key: binding_key(expression)?,
                })
            })
            .collect()
    }
}

pub fn binding_key(expression: &SelectExpression) -> Result<String, MapperError> {
    let key = match (expression.kind, &expression.alias) {
        (ExpressionKind::Wildcard, _) => {
            return Err(MapperError::Wildcard {
                text: expression.text.clone(),
            });
        }

        // enumerators hand aliases over unquoted
        (ExpressionKind::Function, Some(alias)) => alias.name.clone(),

        (ExpressionKind::ColumnRef, Some(alias)) => alias.name.clone(),

        (ExpressionKind::ColumnRef, None) => expression
            .parts
            .last()
            .cloned()
            .unwrap_or_else(|| expression.text.clone()),

        (ExpressionKind::Other, Some(alias)) => alias.name.clone(),

        (ExpressionKind::Function | ExpressionKind::Other, None) => expression.text.clone(),
    };

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(mapper: &ColumnMapper, sql: &str) -> Vec<(usize, String)> {
        mapper
            .resolve(sql)
            .unwrap()
            .iter()
            .map(|b| (b.position, b.key.clone()))
            .collect()
    }

    fn both() -> [ColumnMapper; 2] {
        [
            ColumnMapper::with_enumerator(SqlParserEnumerator),
            ColumnMapper::with_enumerator(ClauseSplitter),
        ]
    }

    #[test]
    fn test_precedence_rules() {
        let sql = "SELECT SUM(o.total) AS spent, MAX(o.total) 'biggest', u.first_name AS first, \
                   u.last_name, email FROM users u JOIN orders o ON o.user_id = u.id";

        for mapper in both() {
            assert_eq!(
                keys(&mapper, sql),
                vec![
                    (1, "spent".to_string()),
                    (2, "biggest".to_string()),
                    (3, "first".to_string()),
                    (4, "last_name".to_string()),
                    (5, "email".to_string()),
                ]
            );
        }
    }

    #[test]
    fn test_unaliased_expressions_keep_their_position() {
        for mapper in both() {
            let table = mapper.resolve("SELECT COUNT(*), id FROM users").unwrap();

            assert_eq!(table.len(), 2);
            assert_eq!(table.position_of("id"), Some(2));
        }
    }

    struct Rejecting;

    impl ExpressionEnumerator for Rejecting {
        fn enumerate(&self, _sql: &str) -> Result<Vec<SelectExpression>, MapperError> {
            Err(MapperError::Parse("unsupported syntax".to_owned()))
        }
    }

    #[test]
    fn test_falls_back_when_parser_rejects() {
        let mapper = ColumnMapper {
            enumerator: Box::new(Rejecting),
            fallback: Some(Box::new(ClauseSplitter)),
        };

        assert_eq!(
            keys(&mapper, "SELECT u.id, name n FROM users u"),
            vec![(1, "id".to_string()), (2, "n".to_string())]
        );
        assert!(ColumnMapper::with_enumerator(Rejecting).resolve("SELECT 1").is_err());
    }

    #[test]
    fn test_window_expressions_resolve() {
        let sql = "SELECT id, group_concat(name, ',') FILTER (WHERE name <> '') OVER win AS names \
                   FROM users WINDOW win AS (ORDER BY id) ORDER BY id";

        let table = ColumnMapper::new().resolve(sql).unwrap();

        assert_eq!(table.position_of("id"), Some(1));
        assert_eq!(table.position_of("names"), Some(2));
    }

    #[test]
    fn test_wildcard_is_an_error() {
        assert!(matches!(
            ColumnMapper::new().resolve("SELECT * FROM users"),
            Err(MapperError::Wildcard { .. })
        ));
    }
}
