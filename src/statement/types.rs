//! Statement and clause types shared by the builders and the assembler.
//!
//! Every type here is plain data: the clause builders in `clauses.rs` turn
//! them into SQL text, and the assembler in `assembler.rs` fixes the order
//! in which they are applied.

use std::fmt;

use serde::Serialize;

use super::condition::Condition;
use crate::value::Value;

/// Positional placeholder marker.
pub const PLACEHOLDER: char = '?';

/// A parameterized SQL statement: script text plus one value per placeholder.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Statement {
    pub(crate) script: String,
    pub(crate) values: Vec<Value>,
}

impl Statement {
    pub fn new(script: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            script: script.into(),
            values,
        }
    }

    /// A statement without bound values.
    pub fn raw(script: impl Into<String>) -> Self {
        Self::new(script, Vec::new())
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.script, self.values)
    }

    /// Number of `?` markers outside quoted literals and identifiers.
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.script)
    }

    /// True when every placeholder has exactly one value.
    pub fn is_aligned(&self) -> bool {
        self.placeholder_count() == self.values.len()
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.script.push_str(text);
    }

    pub(crate) fn push_fragment(&mut self, script: &str, values: &[Value]) {
        self.script.push_str(script);
        self.values.extend_from_slice(values);
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.script)
    }
}

/// One script executed once per row, as used by bulk inserts.
///
/// Every row carries exactly `placeholder_count()` values.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BatchStatement {
    pub(crate) script: String,
    pub(crate) rows: Vec<Vec<Value>>,
}

impl BatchStatement {
    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn into_parts(self) -> (String, Vec<Vec<Value>>) {
        (self.script, self.rows)
    }

    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.script)
    }

    pub fn is_aligned(&self) -> bool {
        let arity = self.placeholder_count();
        self.rows.iter().all(|row| row.len() == arity)
    }
}

/// Count `?` markers, skipping `'...'`, `"..."`, `` `...` `` and `[...]`.
pub(crate) fn count_placeholders(script: &str) -> usize {
    let mut count = 0;
    let mut closing: Option<char> = None;
    for ch in script.chars() {
        match closing {
            Some(end) if ch == end => closing = None,
            Some(_) => {}
            None => match ch {
                '\'' | '"' | '`' => closing = Some(ch),
                '[' => closing = Some(']'),
                PLACEHOLDER => count += 1,
                _ => {}
            },
        }
    }
    count
}

// ---------------------------------------------------------------------------
// Schema keywords
// ---------------------------------------------------------------------------

/// Keywords that are SQL syntax rather than data when they appear in a
/// column definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Types
    Integer,
    Text,
    Real,
    Blob,
    Numeric,
    // Constraints
    PrimaryKey,
    Autoincrement,
    NotNull,
    Null,
    Unique,
    // Values
    CurrentTimestamp,
    CurrentDate,
    CurrentTime,
}

impl Keyword {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Keyword::Integer => "INTEGER",
            Keyword::Text => "TEXT",
            Keyword::Real => "REAL",
            Keyword::Blob => "BLOB",
            Keyword::Numeric => "NUMERIC",
            Keyword::PrimaryKey => "PRIMARY KEY",
            Keyword::Autoincrement => "AUTOINCREMENT",
            Keyword::NotNull => "NOT NULL",
            Keyword::Null => "NULL",
            Keyword::Unique => "UNIQUE",
            Keyword::CurrentTimestamp => "CURRENT_TIMESTAMP",
            Keyword::CurrentDate => "CURRENT_DATE",
            Keyword::CurrentTime => "CURRENT_TIME",
        }
    }

    /// Parse a keyword, ignoring case and accepting `_` or spaces between
    /// words (`"primary_key"`, `"NOT NULL"`).
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s
            .trim()
            .split(|c: char| c == '_' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        match normalized.as_str() {
            "INTEGER" | "INT" => Some(Keyword::Integer),
            "TEXT" => Some(Keyword::Text),
            "REAL" => Some(Keyword::Real),
            "BLOB" => Some(Keyword::Blob),
            "NUMERIC" => Some(Keyword::Numeric),
            "PRIMARY KEY" => Some(Keyword::PrimaryKey),
            "AUTOINCREMENT" => Some(Keyword::Autoincrement),
            "NOT NULL" => Some(Keyword::NotNull),
            "NULL" => Some(Keyword::Null),
            "UNIQUE" => Some(Keyword::Unique),
            "CURRENT TIMESTAMP" => Some(Keyword::CurrentTimestamp),
            "CURRENT DATE" => Some(Keyword::CurrentDate),
            "CURRENT TIME" => Some(Keyword::CurrentTime),
            _ => None,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Keyword::Integer | Keyword::Text | Keyword::Real | Keyword::Blob | Keyword::Numeric
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One element of a column specification.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Keyword(Keyword),
    Integer(i64),
    Real(f64),
    /// Free-form schema text, emitted verbatim (e.g. `VARCHAR(20)`).
    Text(String),
    List(Vec<Token>),
    /// `DEFAULT <token>`
    Default(Box<Token>),
    /// `CHECK (<expr>)`
    Check(String),
}

impl Token {
    pub fn default_value(token: impl Into<Token>) -> Self {
        Token::Default(Box::new(token.into()))
    }

    pub fn check(expr: impl Into<String>) -> Self {
        Token::Check(expr.into())
    }
}

impl From<Keyword> for Token {
    fn from(k: Keyword) -> Self {
        Token::Keyword(k)
    }
}

impl From<i64> for Token {
    fn from(v: i64) -> Self {
        Token::Integer(v)
    }
}

impl From<f64> for Token {
    fn from(v: f64) -> Self {
        Token::Real(v)
    }
}

impl From<&str> for Token {
    fn from(v: &str) -> Self {
        Token::Text(v.to_string())
    }
}

impl From<String> for Token {
    fn from(v: String) -> Self {
        Token::Text(v)
    }
}

impl<T: Into<Token>> From<Vec<T>> for Token {
    fn from(v: Vec<T>) -> Self {
        Token::List(v.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Clause parameters
// ---------------------------------------------------------------------------

/// Conflict resolution modifier: `INSERT OR <option>` / `UPDATE OR <option>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrOption {
    Abort,
    Fail,
    Ignore,
    Replace,
    Rollback,
}

impl OrOption {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrOption::Abort => "ABORT",
            OrOption::Fail => "FAIL",
            OrOption::Ignore => "IGNORE",
            OrOption::Replace => "REPLACE",
            OrOption::Rollback => "ROLLBACK",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ABORT" => Some(OrOption::Abort),
            "FAIL" => Some(OrOption::Fail),
            "IGNORE" => Some(OrOption::Ignore),
            "REPLACE" => Some(OrOption::Replace),
            "ROLLBACK" => Some(OrOption::Rollback),
            _ => None,
        }
    }
}

/// Leading keyword of a row-writing statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertVerb {
    #[default]
    Insert,
    Replace,
}

impl InsertVerb {
    pub fn as_sql(&self) -> &'static str {
        match self {
            InsertVerb::Insert => "INSERT",
            InsertVerb::Replace => "REPLACE",
        }
    }
}

/// Comparison operators accepted in WHERE mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Lt,
    Le,
    Eq,
    EqEq,
    Ne,
    LtGt,
    Gt,
    Ge,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Lt,
        Operator::Le,
        Operator::Eq,
        Operator::EqEq,
        Operator::Ne,
        Operator::LtGt,
        Operator::Gt,
        Operator::Ge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Eq => "=",
            Operator::EqEq => "==",
            Operator::Ne => "!=",
            Operator::LtGt => "<>",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s.trim())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of one WHERE mapping entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `col = ?`
    Eq(Value),
    /// `col = ? OR col = ? ...`
    Any(Vec<Value>),
    /// `col <op> ? OR col <op> ? ...`
    Op(Operator, Vec<Value>),
}

impl Predicate {
    /// Interpret a loosely-typed list: a leading operator string selects
    /// the operator, any other list is an OR over equality.
    pub fn from_values(mut values: Vec<Value>) -> Self {
        let op = values.first().and_then(Value::as_str).and_then(Operator::parse);
        match op {
            Some(op) => {
                values.remove(0);
                Predicate::Op(op, values)
            }
            None if values.len() == 1 => Predicate::Eq(values.remove(0)),
            None => Predicate::Any(values),
        }
    }
}

impl<T: Into<Value>> From<T> for Predicate {
    fn from(v: T) -> Self {
        Predicate::Eq(v.into())
    }
}

/// WHERE clause input.
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    /// Column → predicate, joined with AND.
    Mapping(Vec<(String, Predicate)>),
    /// Pre-built condition fragment.
    Condition(Condition),
    /// Literal predicate text.
    Raw(String),
}

impl Where {
    pub fn mapping<K, P, I>(entries: I) -> Self
    where
        K: Into<String>,
        P: Into<Predicate>,
        I: IntoIterator<Item = (K, P)>,
    {
        Where::Mapping(
            entries
                .into_iter()
                .map(|(k, p)| (k.into(), p.into()))
                .collect(),
        )
    }
}

impl From<Condition> for Where {
    fn from(c: Condition) -> Self {
        Where::Condition(c)
    }
}

impl From<&str> for Where {
    fn from(s: &str) -> Self {
        Where::Raw(s.to_string())
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// ORDER BY input.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderBy {
    Column(String),
    /// 1-based position in the result column list.
    Position(usize),
    Columns(Vec<String>),
    Directions(Vec<(String, Direction)>),
}

impl From<&str> for OrderBy {
    fn from(s: &str) -> Self {
        OrderBy::Column(s.to_string())
    }
}

impl From<usize> for OrderBy {
    fn from(p: usize) -> Self {
        OrderBy::Position(p)
    }
}

/// JOIN method keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinMethod {
    #[default]
    Inner,
    Left,
    LeftOuter,
    Right,
    Full,
    Cross,
    Natural,
}

impl JoinMethod {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinMethod::Inner => "INNER JOIN",
            JoinMethod::Left => "LEFT JOIN",
            JoinMethod::LeftOuter => "LEFT OUTER JOIN",
            JoinMethod::Right => "RIGHT JOIN",
            JoinMethod::Full => "FULL JOIN",
            JoinMethod::Cross => "CROSS JOIN",
            JoinMethod::Natural => "NATURAL JOIN",
        }
    }
}

/// One JOIN fragment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Join {
    pub method: JoinMethod,
    pub table: String,
    pub on: Option<Condition>,
    pub using: Vec<String>,
}

impl Join {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn method(mut self, method: JoinMethod) -> Self {
        self.method = method;
        self
    }

    pub fn on(mut self, condition: Condition) -> Self {
        self.on = Some(condition);
        self
    }

    pub fn using<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.using = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// SELECT column list.
#[derive(Debug, Clone, PartialEq)]
pub enum Columns {
    All,
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Columns {
    fn from(s: &str) -> Self {
        Columns::One(s.to_string())
    }
}

impl<S: Into<String>> From<Vec<S>> for Columns {
    fn from(v: Vec<S>) -> Self {
        Columns::Many(v.into_iter().map(Into::into).collect())
    }
}

/// `SELECT`, `SELECT DISTINCT` or `SELECT ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMethod {
    #[default]
    Plain,
    Distinct,
    All,
}

impl SelectMethod {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SelectMethod::Plain => "SELECT",
            SelectMethod::Distinct => "SELECT DISTINCT",
            SelectMethod::All => "SELECT ALL",
        }
    }
}

/// Common table expression prefixed as `WITH name AS (...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct With {
    pub name: String,
    pub statement: Statement,
}

impl With {
    pub fn new(name: impl Into<String>, statement: Statement) -> Self {
        Self {
            name: name.into(),
            statement,
        }
    }
}

/// Value assigned by one SET entry.
#[derive(Debug, Clone, PartialEq)]
pub enum SetValue {
    Value(Value),
    /// Expression fragment inlined unquoted (`col = col + ?`).
    Expr(Condition),
}

/// One `column = value` pair of an UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: SetValue,
}

/// Ordered SET list of an UPDATE.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assignments(pub(crate) Vec<Assignment>);

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = ?`
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push(Assignment {
            column: column.into(),
            value: SetValue::Value(value.into()),
        });
        self
    }

    /// `column = <expr>`, the expression inlined with its values appended.
    pub fn set_expr(mut self, column: impl Into<String>, expr: Condition) -> Self {
        self.0.push(Assignment {
            column: column.into(),
            value: SetValue::Expr(expr),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.0.iter()
    }
}

/// `TEMP` / `TEMPORARY` table variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Temporary {
    #[default]
    No,
    Temp,
    Temporary,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// A SELECT with all supported clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: String,
    pub method: SelectMethod,
    /// `None` selects `*` and logs a warning.
    pub columns: Option<Columns>,
    pub joins: Vec<Join>,
    pub filter: Option<Where>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub with: Vec<With>,
    pub execute: bool,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            method: SelectMethod::default(),
            columns: None,
            joins: Vec::new(),
            filter: None,
            order_by: None,
            limit: None,
            offset: None,
            with: Vec::new(),
            execute: true,
        }
    }

    pub fn method(mut self, method: SelectMethod) -> Self {
        self.method = method;
        self
    }

    pub fn columns(mut self, columns: impl Into<Columns>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn filter(mut self, filter: impl Into<Where>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn order_by(mut self, order_by: impl Into<OrderBy>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with(mut self, with: With) -> Self {
        self.with.push(with);
        self
    }

    /// Build the statement instead of running it.
    pub fn build_only(mut self) -> Self {
        self.execute = false;
        self
    }
}

/// Modifiers shared by single-row and bulk inserts.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOptions {
    pub verb: InsertVerb,
    pub or: Option<OrOption>,
    pub with: Vec<With>,
    pub execute: bool,
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self {
            verb: InsertVerb::Insert,
            or: None,
            with: Vec::new(),
            execute: true,
        }
    }
}

impl InsertOptions {
    pub fn or(mut self, option: OrOption) -> Self {
        self.or = Some(option);
        self
    }

    pub fn with(mut self, with: With) -> Self {
        self.with.push(with);
        self
    }

    pub fn build_only(mut self) -> Self {
        self.execute = false;
        self
    }
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    pub table: String,
    pub set: Assignments,
    pub filter: Option<Where>,
    pub or: Option<OrOption>,
    pub with: Vec<With>,
    pub execute: bool,
}

impl UpdateQuery {
    pub fn new(table: impl Into<String>, set: impl Into<Assignments>) -> Self {
        Self {
            table: table.into(),
            set: set.into(),
            filter: None,
            or: None,
            with: Vec::new(),
            execute: true,
        }
    }

    pub fn filter(mut self, filter: impl Into<Where>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn or(mut self, option: OrOption) -> Self {
        self.or = Some(option);
        self
    }

    pub fn with(mut self, with: With) -> Self {
        self.with.push(with);
        self
    }

    pub fn build_only(mut self) -> Self {
        self.execute = false;
        self
    }
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQuery {
    pub table: String,
    pub filter: Option<Where>,
    pub with: Vec<With>,
    pub execute: bool,
}

impl DeleteQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: None,
            with: Vec::new(),
            execute: true,
        }
    }

    pub fn filter(mut self, filter: impl Into<Where>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with(mut self, with: With) -> Self {
        self.with.push(with);
        self
    }

    pub fn build_only(mut self) -> Self {
        self.execute = false;
        self
    }
}

/// A DROP TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub table: String,
    pub if_exists: bool,
    pub execute: bool,
}

impl DropTable {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            if_exists: false,
            execute: true,
        }
    }

    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    pub fn build_only(mut self) -> Self {
        self.execute = false;
        self
    }
}

/// CREATE TABLE modifiers; the column list comes from a `TableDef`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOptions {
    pub temporary: Temporary,
    pub if_not_exists: bool,
    pub without_rowid: bool,
    pub execute: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            temporary: Temporary::No,
            if_not_exists: false,
            without_rowid: false,
            execute: true,
        }
    }
}

impl CreateOptions {
    pub fn temporary(mut self, temporary: Temporary) -> Self {
        self.temporary = temporary;
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn without_rowid(mut self) -> Self {
        self.without_rowid = true;
        self
    }

    pub fn build_only(mut self) -> Self {
        self.execute = false;
        self
    }
}
