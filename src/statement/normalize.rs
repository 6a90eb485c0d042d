//! Schema text normalization.
//!
//! Turns column-specification tokens into the literal text of a CREATE
//! TABLE column definition. Nothing here is a bound value: keywords and
//! numbers pass through verbatim and no quoting is added.

use super::types::{Keyword, Token};
use crate::error::{Error, Result};

/// Render one token as schema text.
///
/// Single-element lists unwrap to their element, longer lists render each
/// element separated by a space, and an empty list is rejected.
pub fn normalize(token: &Token) -> Result<String> {
    match token {
        Token::Keyword(k) => Ok(k.as_sql().to_string()),
        Token::Integer(i) => Ok(i.to_string()),
        Token::Real(r) => Ok(r.to_string()),
        Token::Text(s) => Ok(s.clone()),
        Token::List(items) => match items.as_slice() {
            [] => Err(Error::EmptySequence),
            [only] => normalize(only),
            many => {
                let parts = many.iter().map(normalize).collect::<Result<Vec<_>>>()?;
                Ok(parts.join(" "))
            }
        },
        Token::Default(inner) => Ok(format!("DEFAULT {}", normalize(inner)?)),
        Token::Check(expr) => Ok(format!("CHECK ({})", expr)),
    }
}

/// Sort rank of a token inside one column definition.
///
/// The type comes first, followed by constraint keywords in the order
/// SQLite's grammar expects them. Free-form text is ranked by its leading
/// word, so `"DEFAULT 0"` sorts with DEFAULT and `"VARCHAR(20)"` with the
/// types.
pub fn priority(token: &Token) -> u8 {
    match token {
        Token::Keyword(k) if k.is_type() => 0,
        Token::Keyword(Keyword::PrimaryKey) => 1,
        Token::Keyword(Keyword::Autoincrement) => 2,
        Token::Keyword(Keyword::NotNull) | Token::Keyword(Keyword::Null) => 3,
        Token::Keyword(Keyword::Unique) => 4,
        Token::Keyword(_) | Token::Default(_) => 5,
        Token::Check(_) => 6,
        Token::Text(text) => text_priority(text),
        Token::Integer(_) | Token::Real(_) | Token::List(_) => 0,
    }
}

fn text_priority(text: &str) -> u8 {
    let lead = text
        .trim_start()
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("")
        .to_uppercase();
    match lead.as_str() {
        "PRIMARY" => 1,
        "AUTOINCREMENT" => 2,
        "NOT" | "NULL" => 3,
        "UNIQUE" => 4,
        "DEFAULT" => 5,
        "CHECK" => 6,
        "COLLATE" | "REFERENCES" | "GENERATED" | "AS" | "CONSTRAINT" => 7,
        _ => 0,
    }
}

/// Render a column's tokens in priority order. Ties keep declaration order.
pub fn column_definition(tokens: &[Token]) -> Result<String> {
    let mut sorted: Vec<&Token> = tokens.iter().collect();
    sorted.sort_by_key(|t| priority(t));
    let parts = sorted
        .into_iter()
        .map(normalize)
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(" "))
}
