use sqlparser::{
    ast::{Expr, Ident, SelectItem, SetExpr, Statement},
    dialect::SQLiteDialect,
    parser::Parser,
};

use crate::{
    errors::binding::MapperError,
    mapper::enumerator::{ExpressionEnumerator, ExpressionKind, SelectExpression},
};

/// Enumerates the projection with `sqlparser`'s SQLite dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlParserEnumerator;

impl ExpressionEnumerator for SqlParserEnumerator {
    fn enumerate(&self, sql: &str) -> Result<Vec<SelectExpression>, MapperError> {
        let dialect = SQLiteDialect {};
        let ast = Parser::parse_sql(&dialect, sql).map_err(|e| MapperError::Parse(e.to_string()))?;

        match ast.first() {
            Some(Statement::Query(query)) => projection(&query.body),
            _ => Err(MapperError::NotASelect),
        }
    }
}

fn projection(body: &SetExpr) -> Result<Vec<SelectExpression>, MapperError> {
    match body {
        SetExpr::Select(select) => select.projection.iter().map(select_item).collect(),

        // output names of a compound select come from its left-most member
        SetExpr::SetOperation { left, .. } => projection(left),

        SetExpr::Query(query) => projection(&query.body),

        _ => Err(MapperError::NotASelect),
    }
}

fn select_item(item: &SelectItem) -> Result<SelectExpression, MapperError> {
    match item {
        SelectItem::UnnamedExpr(expr) => Ok(expression(expr)),

        SelectItem::ExprWithAlias { expr, alias } => {
            Ok(expression(expr).aliased(alias.value.clone(), alias.quote_style))
        }

        SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..) => Err(MapperError::Wildcard {
            text: item.to_string(),
        }),
    }
}

fn expression(expr: &Expr) -> SelectExpression {
    match expr {
        Expr::Identifier(ident) => SelectExpression::column(unquoted(&[ident]), expr.to_string()),

        Expr::CompoundIdentifier(idents) => {
            let idents: Vec<&Ident> = idents.iter().collect();
            SelectExpression::column(unquoted(&idents), expr.to_string())
        }

        Expr::Nested(inner) if matches!(**inner, Expr::Identifier(_) | Expr::CompoundIdentifier(_)) => {
            SelectExpression {
                text: expr.to_string(),
                ..expression(inner)
            }
        }

        Expr::Function(_) | Expr::Cast { .. } => {
            SelectExpression::new(ExpressionKind::Function, expr.to_string())
        }

        _ => SelectExpression::new(ExpressionKind::Other, expr.to_string()),
    }
}

fn unquoted(idents: &[&Ident]) -> Vec<String> {
    idents.iter().map(|ident| ident.value.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::enumerator::Alias;

    fn enumerate(sql: &str) -> Vec<SelectExpression> {
        SqlParserEnumerator.enumerate(sql).unwrap()
    }

    #[test]
    fn test_plain_and_qualified_columns() {
        let exprs = enumerate("SELECT u.first_name, last_name FROM users u ORDER BY u.first_name");

        assert_eq!(exprs.len(), 2);
        assert_eq!(exprs[0].kind, ExpressionKind::ColumnRef);
        assert_eq!(exprs[0].parts, vec!["u", "first_name"]);
        assert_eq!(exprs[1].parts, vec!["last_name"]);
    }

    #[test]
    fn test_aliases_are_unquoted() {
        let exprs = enumerate("SELECT SUM(x) AS 'total', last_name AS \"last\", id i FROM t");

        assert_eq!(exprs[0].kind, ExpressionKind::Function);
        assert_eq!(
            exprs[0].alias,
            Some(Alias {
                name: "total".into(),
                quote: Some('\'')
            })
        );
        assert_eq!(exprs[1].alias.as_ref().map(|a| a.name.as_str()), Some("last"));
        assert_eq!(exprs[2].alias.as_ref().map(|a| a.name.as_str()), Some("i"));
    }

    #[test]
    fn test_named_placeholders_parse() {
        let exprs = enumerate("SELECT id, username FROM users WHERE id > :id ORDER BY id LIMIT 50");
        assert_eq!(exprs.len(), 2);
    }

    #[test]
    fn test_wildcard_is_rejected() {
        assert!(matches!(
            SqlParserEnumerator.enumerate("SELECT * FROM users"),
            Err(MapperError::Wildcard { .. })
        ));
    }

    #[test]
    fn test_non_select_is_rejected() {
        assert_eq!(
            SqlParserEnumerator.enumerate("DELETE FROM users"),
            Err(MapperError::NotASelect)
        );
    }

    #[test]
    fn test_union_takes_left_names() {
        let exprs = enumerate("SELECT a AS x FROM t UNION SELECT b FROM u");
        assert_eq!(exprs.len(), 1);
        assert_eq!(exprs[0].alias.as_ref().map(|a| a.name.as_str()), Some("x"));
    }
}
