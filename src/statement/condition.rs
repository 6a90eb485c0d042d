//! Condition fragments for WHERE, ON and SET expressions.
//!
//! A `Condition` is an immutable `(script, values)` pair. Fragments are
//! built from column handles with explicit methods (`col("a").eq(1)`) and
//! combined with `and` / `or` / `not`. Combining two fragments concatenates
//! their scripts around the operator and their values left to right, so
//! values always follow the order of the placeholders in the text.

use super::types::{Operator, PLACEHOLDER};
use crate::value::Value;

/// How tightly a fragment binds, used to decide where parentheses go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    /// Column, placeholder, or already-parenthesized text.
    Atom,
    Arithmetic,
    Comparison,
    Not,
    And,
    Or,
    /// Caller-supplied text of unknown shape; always parenthesized when nested.
    Raw,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    script: String,
    values: Vec<Value>,
    kind: Kind,
}

impl Condition {
    /// A literal fragment with its bound values.
    pub fn raw(script: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            script: script.into(),
            values,
            kind: Kind::Raw,
        }
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

    pub fn and(self, other: Condition) -> Condition {
        let wrap = |kind: Kind| matches!(kind, Kind::Or | Kind::Raw);
        binary(self, "AND", other, Kind::And, wrap)
    }

    pub fn or(self, other: Condition) -> Condition {
        binary(self, "OR", other, Kind::Or, |kind: Kind| kind == Kind::Raw)
    }

    pub fn not(self) -> Condition {
        Condition {
            script: format!("NOT ({})", self.script),
            values: self.values,
            kind: Kind::Not,
        }
    }

    /// `self <op> rhs`, for comparing expressions (`(a + ?) > ?`).
    pub fn compare(self, op: Operator, rhs: impl Into<Operand>) -> Condition {
        let wrap = |kind: Kind| !matches!(kind, Kind::Atom | Kind::Arithmetic);
        binary(self, op.as_str(), rhs.into().into_condition(), Kind::Comparison, wrap)
    }

    /// Fold several fragments with AND. `None` for an empty input.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Option<Condition> {
        conditions.into_iter().reduce(Condition::and)
    }

    /// Fold several fragments with OR. `None` for an empty input.
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Option<Condition> {
        conditions.into_iter().reduce(Condition::or)
    }

    /// Wrap in parentheses unless the fragment is a single term.
    pub(crate) fn grouped(self) -> Condition {
        if self.kind == Kind::Atom {
            return self;
        }
        Condition {
            script: format!("({})", self.script),
            values: self.values,
            kind: Kind::Atom,
        }
    }

    fn atom(script: String, values: Vec<Value>) -> Self {
        Self {
            script,
            values,
            kind: Kind::Atom,
        }
    }

    fn placeholder(value: Value) -> Self {
        Self::atom(PLACEHOLDER.to_string(), vec![value])
    }
}

fn binary(
    lhs: Condition,
    op: &str,
    rhs: Condition,
    kind: Kind,
    needs_parens: impl Fn(Kind) -> bool,
) -> Condition {
    let side = |c: Condition| {
        if needs_parens(c.kind) {
            (format!("({})", c.script), c.values)
        } else {
            (c.script, c.values)
        }
    };
    let (left, mut values) = side(lhs);
    let (right, right_values) = side(rhs);
    values.extend(right_values);
    Condition {
        script: format!("{} {} {}", left, op, right),
        values,
        kind,
    }
}

/// Right-hand side of a comparison or arithmetic operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Bound as a placeholder.
    Value(Value),
    /// Another column, emitted by name.
    Column(String),
    /// A nested fragment, inlined.
    Expr(Condition),
}

impl Operand {
    fn into_condition(self) -> Condition {
        match self {
            Operand::Value(v) => Condition::placeholder(v),
            Operand::Column(name) => Condition::atom(name, Vec::new()),
            Operand::Expr(c) => c,
        }
    }
}

macro_rules! value_operand {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Operand {
                fn from(v: $ty) -> Self {
                    Operand::Value(Value::from(v))
                }
            }
        )*
    };
}

value_operand!(i32, i64, u32, f64, bool, &str, String, Vec<u8>);

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<Column> for Operand {
    fn from(c: Column) -> Self {
        Operand::Column(c.name)
    }
}

impl From<&Column> for Operand {
    fn from(c: &Column) -> Self {
        Operand::Column(c.name.clone())
    }
}

impl From<Condition> for Operand {
    fn from(c: Condition) -> Self {
        Operand::Expr(c)
    }
}

/// Handle naming one column, the starting point of every fragment.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
}

/// Shorthand for `Column::new`.
pub fn col(name: impl Into<String>) -> Column {
    Column::new(name)
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compare(&self, op: Operator, rhs: impl Into<Operand>) -> Condition {
        self.as_condition().compare(op, rhs)
    }

    pub fn eq(&self, rhs: impl Into<Operand>) -> Condition {
        self.compare(Operator::Eq, rhs)
    }

    pub fn ne(&self, rhs: impl Into<Operand>) -> Condition {
        self.compare(Operator::Ne, rhs)
    }

    pub fn lt(&self, rhs: impl Into<Operand>) -> Condition {
        self.compare(Operator::Lt, rhs)
    }

    pub fn le(&self, rhs: impl Into<Operand>) -> Condition {
        self.compare(Operator::Le, rhs)
    }

    pub fn gt(&self, rhs: impl Into<Operand>) -> Condition {
        self.compare(Operator::Gt, rhs)
    }

    pub fn ge(&self, rhs: impl Into<Operand>) -> Condition {
        self.compare(Operator::Ge, rhs)
    }

    pub fn like(&self, pattern: impl Into<Value>) -> Condition {
        Condition {
            script: format!("{} LIKE {}", self.name, PLACEHOLDER),
            values: vec![pattern.into()],
            kind: Kind::Comparison,
        }
    }

    pub fn is_null(&self) -> Condition {
        Condition {
            script: format!("{} IS NULL", self.name),
            values: Vec::new(),
            kind: Kind::Comparison,
        }
    }

    pub fn is_not_null(&self) -> Condition {
        Condition {
            script: format!("{} IS NOT NULL", self.name),
            values: Vec::new(),
            kind: Kind::Comparison,
        }
    }

    /// `col IN (?, ?, ...)`. An empty list renders `col IN ()`, which SQLite
    /// accepts and never matches.
    pub fn is_in<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Condition {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let marks = vec![PLACEHOLDER.to_string(); values.len()].join(", ");
        Condition {
            script: format!("{} IN ({})", self.name, marks),
            values,
            kind: Kind::Comparison,
        }
    }

    pub fn between(&self, low: impl Into<Value>, high: impl Into<Value>) -> Condition {
        Condition {
            script: format!("{} BETWEEN {} AND {}", self.name, PLACEHOLDER, PLACEHOLDER),
            values: vec![low.into(), high.into()],
            kind: Kind::Comparison,
        }
    }

    pub fn add(&self, rhs: impl Into<Operand>) -> Condition {
        self.arithmetic("+", rhs)
    }

    pub fn sub(&self, rhs: impl Into<Operand>) -> Condition {
        self.arithmetic("-", rhs)
    }

    pub fn mul(&self, rhs: impl Into<Operand>) -> Condition {
        self.arithmetic("*", rhs)
    }

    pub fn div(&self, rhs: impl Into<Operand>) -> Condition {
        self.arithmetic("/", rhs)
    }

    fn arithmetic(&self, op: &str, rhs: impl Into<Operand>) -> Condition {
        let wrap = |kind: Kind| kind != Kind::Atom;
        binary(
            self.as_condition(),
            op,
            rhs.into().into_condition(),
            Kind::Arithmetic,
            wrap,
        )
    }

    fn as_condition(&self) -> Condition {
        Condition::atom(self.name.clone(), Vec::new())
    }
}
