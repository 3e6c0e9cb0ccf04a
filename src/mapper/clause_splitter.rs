//! A small tokenizer that only understands enough SQL to find the top-level
//! SELECT clause and split it on top-level commas. Used when `sqlparser`
//! rejects a statement SQLite itself would accept.

use crate::{
    errors::binding::MapperError,
    mapper::enumerator::{Alias, ExpressionEnumerator, ExpressionKind, SelectExpression},
};

/// Words that end the SELECT clause when they appear outside parentheses.
const CLAUSE_END: &[&str] = &[
    "FROM", "WHERE", "GROUP", "HAVING", "WINDOW", "ORDER", "LIMIT", "UNION", "INTERSECT", "EXCEPT",
    "INTO",
];

/// Words that can never be a bare alias, nor precede one.
const NOT_ALIAS: &[&str] = &[
    "AND", "AS", "ASC", "BETWEEN", "CASE", "COLLATE", "DESC", "DISTINCT", "ELSE", "END", "ESCAPE",
    "FALSE", "GLOB", "IN", "IS", "LIKE", "MATCH", "NOT", "NULL", "OR", "REGEXP", "THEN", "TRUE",
    "WHEN",
];

/// Keywords that read like a column but are values.
const LITERAL_WORDS: &[&str] = &[
    "NULL",
    "TRUE",
    "FALSE",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Word,
    Quoted(u8),
    Number,
    Placeholder,
    LParen,
    RParen,
    Comma,
    Dot,
    Star,
    Semicolon,
    Symbol,
}

#[derive(Debug, Clone, Copy)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
    /// Parenthesis depth the token sits at; a `(` and its `)` share the
    /// depth of their surroundings.
    depth: u32,
}

/// Hand-rolled [`ExpressionEnumerator`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ClauseSplitter;

impl ExpressionEnumerator for ClauseSplitter {
    fn enumerate(&self, sql: &str) -> Result<Vec<SelectExpression>, MapperError> {
        let tokens = tokenize(sql);
        let items = select_items(sql, &tokens).ok_or(MapperError::NotASelect)?;

        split_top_level(items)
            .into_iter()
            .map(|group| select_expression(sql, group))
            .collect()
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn skip_quoted(bytes: &[u8], open: usize, close: u8) -> usize {
    let mut j = open + 1;
    while j < bytes.len() {
        if bytes[j] == close {
            // doubled quote is an escaped quote, except inside [brackets]
            if close != b']' && bytes.get(j + 1) == Some(&close) {
                j += 2;
                continue;
            }
            return j + 1;
        }
        j += 1;
    }
    bytes.len()
}

fn tokenize(sql: &str) -> Vec<Token> {
    let bytes = sql.as_bytes();
    let mut tokens = Vec::new();
    let mut depth = 0u32;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let start = i;
        let next = bytes.get(i + 1).copied();

        let kind = match b {
            _ if b.is_ascii_whitespace() => {
                i += 1;
                continue;
            }
            b'-' if next == Some(b'-') => {
                i = bytes[i..]
                    .iter()
                    .position(|&c| c == b'\n')
                    .map_or(bytes.len(), |p| i + p + 1);
                continue;
            }
            b'/' if next == Some(b'*') => {
                i = sql[i + 2..].find("*/").map_or(bytes.len(), |p| i + 2 + p + 2);
                continue;
            }
            b'\'' | b'"' | b'`' => {
                i = skip_quoted(bytes, i, b);
                TokenKind::Quoted(b)
            }
            b'[' => {
                i = skip_quoted(bytes, i, b']');
                TokenKind::Quoted(b'[')
            }
            b'(' => {
                i += 1;
                depth += 1;
                tokens.push(Token {
                    kind: TokenKind::LParen,
                    start,
                    end: i,
                    depth: depth - 1,
                });
                continue;
            }
            b')' => {
                i += 1;
                depth = depth.saturating_sub(1);
                TokenKind::RParen
            }
            b',' => {
                i += 1;
                TokenKind::Comma
            }
            b';' => {
                i += 1;
                TokenKind::Semicolon
            }
            b'*' => {
                i += 1;
                TokenKind::Star
            }
            b'.' if !next.is_some_and(|c| c.is_ascii_digit()) => {
                i += 1;
                TokenKind::Dot
            }
            b'?' | b':' | b'@' | b'$' => {
                i += 1;
                while i < bytes.len() && is_word_byte(bytes[i]) {
                    i += 1;
                }
                TokenKind::Placeholder
            }
            b'0'..=b'9' | b'.' => {
                i += 1;
                while i < bytes.len() && (is_word_byte(bytes[i]) || bytes[i] == b'.') {
                    i += 1;
                }
                TokenKind::Number
            }
            _ if is_word_byte(b) => {
                while i < bytes.len() && is_word_byte(bytes[i]) {
                    i += 1;
                }
                TokenKind::Word
            }
            _ => {
                i += 1;
                TokenKind::Symbol
            }
        };

        tokens.push(Token {
            kind,
            start,
            end: i,
            depth,
        });
    }

    tokens
}

fn text<'a>(sql: &'a str, token: &Token) -> &'a str {
    &sql[token.start..token.end]
}

fn is_word(sql: &str, token: &Token, words: &[&str]) -> bool {
    token.kind == TokenKind::Word && words.iter().any(|w| text(sql, token).eq_ignore_ascii_case(w))
}

/// Tokens between the top-level SELECT (and any DISTINCT/ALL) and the end
/// of the clause.
fn select_items<'t>(sql: &str, tokens: &'t [Token]) -> Option<&'t [Token]> {
    let select = tokens
        .iter()
        .position(|t| t.depth == 0 && is_word(sql, t, &["SELECT"]))?;

    let mut start = select + 1;
    while start < tokens.len() && tokens[start].depth == 0 && is_word(sql, &tokens[start], &["DISTINCT", "ALL"]) {
        start += 1;
    }

    let end = tokens[start..]
        .iter()
        .position(|t| {
            t.depth == 0 && (t.kind == TokenKind::Semicolon || is_word(sql, t, CLAUSE_END))
        })
        .map_or(tokens.len(), |p| start + p);

    Some(&tokens[start..end])
}

fn split_top_level(items: &[Token]) -> Vec<&[Token]> {
    items
        .split(|t| t.depth == 0 && t.kind == TokenKind::Comma)
        .collect()
}

fn select_expression(sql: &str, group: &[Token]) -> Result<SelectExpression, MapperError> {
    let (expr, alias) = split_alias(sql, group);

    let (Some(first), Some(last)) = (expr.first(), expr.last()) else {
        return Err(MapperError::Parse("empty expression in SELECT clause".to_owned()));
    };
    let expr_text = &sql[first.start..last.end];

    let mut expression = match classify(sql, expr) {
        ExpressionKind::Wildcard => {
            return Err(MapperError::Wildcard {
                text: expr_text.to_owned(),
            });
        }
        ExpressionKind::ColumnRef => {
            let parts = expr
                .iter()
                .filter(|t| t.kind != TokenKind::Dot)
                .map(|t| unquote(sql, t).0)
                .collect();
            SelectExpression::column(parts, expr_text)
        }
        kind => SelectExpression::new(kind, expr_text),
    };

    expression.alias = alias;
    Ok(expression)
}

/// Splits `expr AS alias`, `expr alias` and `expr 'alias'`.
fn split_alias<'t>(sql: &str, group: &'t [Token]) -> (&'t [Token], Option<Alias>) {
    let n = group.len();
    let Some(last) = group.last() else {
        return (group, None);
    };

    let alias_like = last.depth == 0
        && matches!(last.kind, TokenKind::Word | TokenKind::Quoted(_))
        && !is_word(sql, last, NOT_ALIAS);

    if !alias_like || n < 2 {
        return (group, None);
    }

    if n >= 3 && is_word(sql, &group[n - 2], &["AS"]) {
        return (&group[..n - 2], Some(alias(sql, last)));
    }

    let previous = &group[n - 2];
    let ends_operand = match previous.kind {
        TokenKind::Word => !is_word(sql, previous, NOT_ALIAS),
        TokenKind::Quoted(_)
        | TokenKind::Number
        | TokenKind::Placeholder
        | TokenKind::RParen => true,
        _ => false,
    };

    if ends_operand {
        (&group[..n - 1], Some(alias(sql, last)))
    } else {
        (group, None)
    }
}

fn alias(sql: &str, token: &Token) -> Alias {
    let (name, quote) = unquote(sql, token);
    Alias { name, quote }
}

fn unquote(sql: &str, token: &Token) -> (String, Option<char>) {
    let raw = text(sql, token);

    let TokenKind::Quoted(open) = token.kind else {
        return (raw.to_owned(), None);
    };
    let close = if open == b'[' { b']' } else { open };

    let inner = raw
        .strip_prefix(open as char)
        .map(|s| s.strip_suffix(close as char).unwrap_or(s))
        .unwrap_or(raw);

    let name = if open == b'[' {
        inner.to_owned()
    } else {
        let quote = (open as char).to_string();
        inner.replace(&quote.repeat(2), &quote)
    };

    (name, Some(open as char))
}

fn is_identifier(sql: &str, token: &Token) -> bool {
    match token.kind {
        TokenKind::Word => !is_word(sql, token, LITERAL_WORDS),
        TokenKind::Quoted(q) => q != b'\'',
        _ => false,
    }
}

fn classify(sql: &str, expr: &[Token]) -> ExpressionKind {
    let n = expr.len();

    if expr.last().is_some_and(|t| t.kind == TokenKind::Star)
        && (n == 1 || (n >= 3 && expr[n - 2].kind == TokenKind::Dot))
    {
        return ExpressionKind::Wildcard;
    }

    // ident ( . ident )*
    let is_chain = n % 2 == 1
        && expr.iter().enumerate().all(|(i, t)| {
            if i % 2 == 0 {
                is_identifier(sql, t)
            } else {
                t.kind == TokenKind::Dot
            }
        });
    if is_chain {
        return ExpressionKind::ColumnRef;
    }

    // name ( ... ) with nothing after the closing parenthesis
    let outer = expr[0].depth;
    let is_call = n >= 3
        && expr[0].kind == TokenKind::Word
        && expr[1].kind == TokenKind::LParen
        && expr[n - 1].kind == TokenKind::RParen
        && expr[n - 1].depth == outer
        && expr[2..n - 1].iter().all(|t| t.depth > outer);
    if is_call {
        return ExpressionKind::Function;
    }

    ExpressionKind::Other
}
