//! Argument shape resolution.
//!
//! Callers hand data to insert/update/select in several shapes: keyword
//! bindings, one mapping, one sequence, or several positional scalars.
//! `resolve` reduces all of them to either named bindings or an ordered
//! list of positional values. A single container argument is always
//! unwrapped: it holds the payload, it is not the payload.

use crate::error::{Error, Result};
use crate::value::Value;

/// Insertion-ordered `column → value` pairs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bindings(Vec<(String, Value)>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.push((column.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<(String, Value)> {
        self.0
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Bindings(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Bindings {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// One positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Scalar(Value),
    Sequence(Vec<Value>),
    Mapping(Bindings),
}

impl Arg {
    fn describe(&self) -> &'static str {
        match self {
            Arg::Scalar(_) => "scalar",
            Arg::Sequence(_) => "sequence",
            Arg::Mapping(_) => "mapping",
        }
    }

    /// Map a loosely-typed JSON payload onto an argument.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => Arg::Mapping(map.into_iter().collect()),
            serde_json::Value::Array(items) => {
                Arg::Sequence(items.into_iter().map(Value::from).collect())
            }
            scalar => Arg::Scalar(Value::from(scalar)),
        }
    }
}

/// Positional arguments plus keyword bindings, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallArgs {
    pub positional: Vec<Arg>,
    pub keywords: Bindings,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Several positional scalars: `insert(t, 1, "Alex")`.
    pub fn values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self {
            positional: values.into_iter().map(|v| Arg::Scalar(v.into())).collect(),
            keywords: Bindings::new(),
        }
    }

    /// One sequence argument: `insert(t, [1, "Alex"])`.
    pub fn sequence<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self {
            positional: vec![Arg::Sequence(values.into_iter().map(Into::into).collect())],
            keywords: Bindings::new(),
        }
    }

    /// One mapping argument: `insert(t, {"id": 1})`.
    pub fn mapping(bindings: impl Into<Bindings>) -> Self {
        Self {
            positional: vec![Arg::Mapping(bindings.into())],
            keywords: Bindings::new(),
        }
    }

    /// Keyword bindings only: `insert(t, id=1)`.
    pub fn keywords(bindings: impl Into<Bindings>) -> Self {
        Self {
            positional: Vec::new(),
            keywords: bindings.into(),
        }
    }

    pub fn arg(mut self, arg: Arg) -> Self {
        self.positional.push(arg);
        self
    }

    pub fn kw(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.push(column, value);
        self
    }

    /// A JSON payload as a single positional argument.
    pub fn from_json(value: serde_json::Value) -> Self {
        Self {
            positional: vec![Arg::from_json(value)],
            keywords: Bindings::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }
}

impl From<Bindings> for CallArgs {
    fn from(b: Bindings) -> Self {
        CallArgs::mapping(b)
    }
}

/// Canonical form of a call's data.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Named `column → value` bindings.
    Bindings(Bindings),
    /// Ordered values with no column names.
    Positional(Vec<Value>),
}

/// Reduce positional/keyword arguments to one canonical shape.
///
/// `operation` names the caller in error messages.
pub fn resolve(operation: &'static str, args: &CallArgs) -> Result<Resolved> {
    let positional = &args.positional;
    let keywords = &args.keywords;

    if positional.is_empty() && keywords.is_empty() {
        return Err(Error::NoData { operation });
    }
    if !positional.is_empty() && !keywords.is_empty() {
        return Err(Error::shape(
            operation,
            "positional and keyword data cannot be mixed",
        ));
    }
    if positional.is_empty() {
        return Ok(Resolved::Bindings(keywords.clone()));
    }

    if let [single] = positional.as_slice() {
        return match single {
            Arg::Mapping(m) if m.is_empty() => Err(Error::NoData { operation }),
            Arg::Mapping(m) => Ok(Resolved::Bindings(m.clone())),
            Arg::Sequence(s) if s.is_empty() => Err(Error::NoData { operation }),
            Arg::Sequence(s) => Ok(Resolved::Positional(s.clone())),
            Arg::Scalar(v) => Ok(Resolved::Positional(vec![v.clone()])),
        };
    }

    positional
        .iter()
        .enumerate()
        .map(|(i, arg)| match arg {
            Arg::Scalar(v) => Ok(v.clone()),
            other => Err(Error::shape(
                operation,
                format!(
                    "positional argument {} is a {}; only scalars may follow one another",
                    i + 1,
                    other.describe()
                ),
            )),
        })
        .collect::<Result<Vec<_>>>()
        .map(Resolved::Positional)
}

/// Turn an alternating `[col, val, col, val, ...]` list into bindings.
pub fn pairs(operation: &'static str, values: Vec<Value>) -> Result<Bindings> {
    if values.len() % 2 != 0 {
        return Err(Error::shape(
            operation,
            format!("alternating column/value list has odd length {}", values.len()),
        ));
    }
    let mut bindings = Bindings::new();
    let mut iter = values.into_iter();
    while let (Some(column), Some(value)) = (iter.next(), iter.next()) {
        match column {
            Value::Text(name) => bindings.push(name, value),
            other => {
                return Err(Error::shape(
                    operation,
                    format!("expected a column name, got {}", other.kind()),
                ))
            }
        }
    }
    Ok(bindings)
}
