//! Declarative table templates for CREATE TABLE.
//!
//! A template lists tables, each table lists its columns in declaration
//! order, and each column carries one token or a list of tokens. Foreign
//! keys sit under the reserved `FOREIGN_KEY` entry when a template is read
//! from JSON or TOML:
//!
//! ```json
//! {
//!   "users": {
//!     "id": ["INTEGER", "PRIMARY_KEY"],
//!     "group_id": "INTEGER",
//!     "FOREIGN_KEY": { "group_id": ["groups", "id"] }
//!   }
//! }
//! ```

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use super::normalize::{column_definition, normalize};
use super::types::{Keyword, Token};
use crate::error::{Error, Result};

/// Reserved template key holding foreign-key declarations.
pub const FOREIGN_KEY: &str = "FOREIGN_KEY";

/// Type and constraints of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSpec {
    One(Token),
    Many(Vec<Token>),
}

impl ColumnSpec {
    /// Column definition text, tokens sorted by priority.
    pub fn definition(&self) -> Result<String> {
        match self {
            ColumnSpec::One(Token::List(items)) | ColumnSpec::Many(items) if items.is_empty() => {
                Err(Error::EmptySequence)
            }
            ColumnSpec::One(Token::List(items)) | ColumnSpec::Many(items) => {
                column_definition(items)
            }
            ColumnSpec::One(token) => normalize(token),
        }
    }
}

impl From<Token> for ColumnSpec {
    fn from(t: Token) -> Self {
        ColumnSpec::One(t)
    }
}

impl From<Keyword> for ColumnSpec {
    fn from(k: Keyword) -> Self {
        ColumnSpec::One(Token::Keyword(k))
    }
}

impl From<&str> for ColumnSpec {
    fn from(s: &str) -> Self {
        ColumnSpec::One(Token::Text(s.to_string()))
    }
}

impl From<Vec<Token>> for ColumnSpec {
    fn from(v: Vec<Token>) -> Self {
        ColumnSpec::Many(v)
    }
}

impl<const N: usize> From<[Keyword; N]> for ColumnSpec {
    fn from(v: [Keyword; N]) -> Self {
        ColumnSpec::Many(v.into_iter().map(Token::Keyword).collect())
    }
}

/// `FOREIGN KEY (column) REFERENCES table (references)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: String,
    pub table: String,
    pub references: String,
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            self.column, self.table, self.references
        )
    }
}

/// Columns and foreign keys of one table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableDef {
    pub columns: Vec<(String, ColumnSpec)>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, name: impl Into<String>, spec: impl Into<ColumnSpec>) -> Self {
        self.columns.push((name.into(), spec.into()));
        self
    }

    pub fn foreign_key(
        mut self,
        column: impl Into<String>,
        table: impl Into<String>,
        references: impl Into<String>,
    ) -> Self {
        self.foreign_keys.push(ForeignKey {
            column: column.into(),
            table: table.into(),
            references: references.into(),
        });
        self
    }

    /// One line per column, then one per foreign key.
    pub fn definitions(&self) -> Result<Vec<String>> {
        let mut lines = self
            .columns
            .iter()
            .map(|(name, spec)| Ok(format!("{} {}", name, spec.definition()?)))
            .collect::<Result<Vec<_>>>()?;
        lines.extend(self.foreign_keys.iter().map(ForeignKey::to_string));
        Ok(lines)
    }
}

/// Tables in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableTemplate {
    pub tables: Vec<(String, TableDef)>,
}

impl TableTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: impl Into<String>, def: TableDef) -> Self {
        self.tables.push((name.into(), def));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableDef)> {
        self.tables.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

// ---------------------------------------------------------------------------
// Deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum RawToken {
    Integer(i64),
    Real(f64),
    Text(String),
    List(Vec<RawToken>),
    Default {
        #[serde(rename = "DEFAULT")]
        default: Box<RawToken>,
    },
    Check {
        #[serde(rename = "CHECK")]
        check: String,
    },
}

impl From<RawToken> for Token {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::Integer(i) => Token::Integer(i),
            RawToken::Real(r) => Token::Real(r),
            RawToken::Text(s) => Keyword::parse(&s)
                .map(Token::Keyword)
                .unwrap_or(Token::Text(s)),
            RawToken::List(items) => Token::List(items.into_iter().map(Token::from).collect()),
            RawToken::Default { default } => Token::Default(Box::new(Token::from(*default))),
            RawToken::Check { check } => Token::Check(check),
        }
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        RawToken::deserialize(deserializer).map(Token::from)
    }
}

impl<'de> Deserialize<'de> for ColumnSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match Token::deserialize(deserializer)? {
            Token::List(items) => ColumnSpec::Many(items),
            token => ColumnSpec::One(token),
        })
    }
}

struct ForeignKeys(Vec<ForeignKey>);

impl<'de> Deserialize<'de> for ForeignKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ForeignKeysVisitor;

        impl<'de> Visitor<'de> for ForeignKeysVisitor {
            type Value = ForeignKeys;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column to [table, column]")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<ForeignKeys, A::Error> {
                let mut keys = Vec::new();
                while let Some((column, (table, references))) =
                    map.next_entry::<String, (String, String)>()?
                {
                    keys.push(ForeignKey {
                        column,
                        table,
                        references,
                    });
                }
                Ok(ForeignKeys(keys))
            }
        }

        deserializer.deserialize_map(ForeignKeysVisitor)
    }
}

impl<'de> Deserialize<'de> for TableDef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableDefVisitor;

        impl<'de> Visitor<'de> for TableDefVisitor {
            type Value = TableDef;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column name to column specification")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<TableDef, A::Error> {
                let mut def = TableDef::new();
                while let Some(key) = map.next_key::<String>()? {
                    if key == FOREIGN_KEY {
                        if !def.foreign_keys.is_empty() {
                            return Err(de::Error::duplicate_field(FOREIGN_KEY));
                        }
                        def.foreign_keys = map.next_value::<ForeignKeys>()?.0;
                    } else {
                        let spec = map.next_value::<ColumnSpec>()?;
                        def.columns.push((key, spec));
                    }
                }
                Ok(def)
            }
        }

        deserializer.deserialize_map(TableDefVisitor)
    }
}

impl<'de> Deserialize<'de> for TableTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TemplateVisitor;

        impl<'de> Visitor<'de> for TemplateVisitor {
            type Value = TableTemplate;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of table name to table definition")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<TableTemplate, A::Error> {
                let mut template = TableTemplate::new();
                while let Some((name, def)) = map.next_entry::<String, TableDef>()? {
                    template.tables.push((name, def));
                }
                Ok(template)
            }
        }

        deserializer.deserialize_map(TemplateVisitor)
    }
}
