//! Clause builders.
//!
//! Each builder takes the statement built so far and appends one clause,
//! extending the values in the same order the clause's placeholders
//! appear. Builders that take an `Option` are no-ops on `None` so the
//! assembler can chain them unconditionally.

use tracing::warn;

use super::condition::{col, Condition};
use super::shape::{pairs, resolve, CallArgs, Resolved};
use super::template::TableDef;
use super::types::*;
use crate::error::{Error, Result};
use crate::value::Value;

/// `?, ?, ?`
pub fn placeholders(count: usize) -> String {
    vec![PLACEHOLDER.to_string(); count].join(", ")
}

// ---------------------------------------------------------------------------
// INSERT
// ---------------------------------------------------------------------------

/// Target of a single-row INSERT: columns are omitted on the fast path.
#[derive(Debug, Clone, Copy)]
pub struct InsertTarget<'a> {
    pub verb: InsertVerb,
    pub or: Option<OrOption>,
    pub table: &'a str,
    pub columns: Option<&'a [String]>,
    pub arity: usize,
}

/// `INSERT [OR x] INTO t [(c1, c2)] VALUES (?, ?)`, script only.
pub fn insert_into(mut stmt: Statement, target: &InsertTarget) -> Result<Statement> {
    if target.arity == 0 {
        return Err(Error::NoData {
            operation: "insert",
        });
    }
    if target.verb == InsertVerb::Replace && target.or.is_some() {
        return Err(Error::clause("insert", "REPLACE with OR option"));
    }
    stmt.push_str(target.verb.as_sql());
    if let Some(or) = target.or {
        stmt.push_str(" OR ");
        stmt.push_str(or.as_sql());
    }
    stmt.push_str(" INTO ");
    stmt.push_str(target.table);
    if let Some(columns) = target.columns {
        stmt.push_str(&format!(" ({})", columns.join(", ")));
    }
    stmt.push_str(&format!(" VALUES ({})", placeholders(target.arity)));
    Ok(stmt)
}

/// Append values without script text.
pub fn bind(mut stmt: Statement, values: &[Value]) -> Statement {
    stmt.values.extend_from_slice(values);
    stmt
}

// ---------------------------------------------------------------------------
// SELECT
// ---------------------------------------------------------------------------

/// `SELECT[ DISTINCT| ALL] <columns> FROM <table>`
pub fn select_from(
    mut stmt: Statement,
    method: SelectMethod,
    columns: Option<&Columns>,
    table: &str,
) -> Result<Statement> {
    let list = match columns {
        None => {
            warn!(table, "no columns selected; defaulting to *");
            "*".to_string()
        }
        Some(Columns::All) => "*".to_string(),
        Some(Columns::One(c)) => c.clone(),
        Some(Columns::Many(cs)) if cs.is_empty() => {
            return Err(Error::clause("select", "empty column list"))
        }
        Some(Columns::Many(cs)) => cs.join(", "),
    };
    stmt.push_str(&format!("{} {} FROM {}", method.as_sql(), list, table));
    Ok(stmt)
}

/// ` INNER JOIN t ON ...` / ` LEFT JOIN t USING (a, b)`, one per join.
pub fn joins(mut stmt: Statement, joins: &[Join]) -> Result<Statement> {
    for join in joins {
        stmt.push_str(&format!(" {} {}", join.method.as_sql(), join.table));
        match (&join.on, join.using.is_empty()) {
            (Some(_), false) => return Err(Error::clause("join", "both ON and USING")),
            (Some(on), true) => {
                aligned("join", on.script(), on.values())?;
                stmt.push_str(" ON ");
                stmt.push_fragment(on.script(), on.values());
            }
            (None, false) => stmt.push_str(&format!(" USING ({})", join.using.join(", "))),
            (None, true) => {}
        }
    }
    Ok(stmt)
}

// ---------------------------------------------------------------------------
// WHERE
// ---------------------------------------------------------------------------

/// ` WHERE (<predicate>)`
pub fn where_clause(mut stmt: Statement, filter: Option<&Where>) -> Result<Statement> {
    let Some(filter) = filter else {
        return Ok(stmt);
    };
    let condition = predicate(filter)?;
    aligned("where", condition.script(), condition.values())?;
    stmt.push_str(" WHERE (");
    stmt.push_fragment(condition.script(), condition.values());
    stmt.push_str(")");
    Ok(stmt)
}

/// Render WHERE input as one condition. Mapping entries are joined with
/// AND; several values under one column are joined with OR.
pub fn predicate(filter: &Where) -> Result<Condition> {
    match filter {
        Where::Condition(c) => Ok(c.clone()),
        Where::Raw(text) if text.trim().is_empty() => {
            Err(Error::clause("where", "empty predicate text"))
        }
        Where::Raw(text) => Ok(Condition::raw(text.clone(), Vec::new())),
        Where::Mapping(entries) => {
            let terms = entries
                .iter()
                .map(|(column, p)| entry(column, p))
                .collect::<Result<Vec<_>>>()?;
            Condition::all(terms).ok_or_else(|| Error::shape("where", "empty mapping"))
        }
    }
}

fn entry(column: &str, predicate: &Predicate) -> Result<Condition> {
    let column = col(column);
    let (op, values) = match predicate {
        Predicate::Eq(v) => return Ok(column.eq(v.clone())),
        Predicate::Any(values) => (Operator::Eq, values),
        Predicate::Op(op, values) => (*op, values),
    };
    Condition::any(values.iter().map(|v| column.compare(op, v.clone())))
        .ok_or_else(|| Error::clause("where", format!("no values for column {}", column.name())))
}

impl Where {
    /// WHERE input from loose call arguments. Keyword or mapping input
    /// binds by equality; a positional list alternates column and value.
    pub fn from_args(args: &CallArgs) -> Result<Self> {
        let bindings = match resolve("where", args)? {
            Resolved::Bindings(b) => b,
            Resolved::Positional(values) => pairs("where", values)?,
        };
        Ok(Where::mapping(bindings.into_inner()))
    }

    /// WHERE input from JSON: an object maps columns to a value or to a
    /// list (optionally led by an operator); a string is literal text.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(text) => Ok(Where::Raw(text)),
            serde_json::Value::Object(map) if map.is_empty() => {
                Err(Error::shape("where", "empty mapping"))
            }
            serde_json::Value::Object(map) => Ok(Where::Mapping(
                map.into_iter()
                    .map(|(column, v)| {
                        let predicate = match v {
                            serde_json::Value::Array(items) => {
                                Predicate::from_values(items.into_iter().map(Value::from).collect())
                            }
                            scalar => Predicate::Eq(Value::from(scalar)),
                        };
                        (column, predicate)
                    })
                    .collect(),
            )),
            other => Err(Error::clause("where", json_kind(&other))),
        }
    }
}

// ---------------------------------------------------------------------------
// ORDER BY / LIMIT / OFFSET
// ---------------------------------------------------------------------------

/// ` ORDER BY ...`
pub fn order_by(mut stmt: Statement, order: Option<&OrderBy>) -> Result<Statement> {
    let Some(order) = order else {
        return Ok(stmt);
    };
    let terms = match order {
        OrderBy::Column(c) => c.clone(),
        OrderBy::Position(0) => return Err(Error::clause("order_by", "position 0")),
        OrderBy::Position(p) => p.to_string(),
        OrderBy::Columns(cs) if cs.is_empty() => {
            return Err(Error::clause("order_by", "empty column list"))
        }
        OrderBy::Columns(cs) => cs.join(", "),
        OrderBy::Directions(ds) if ds.is_empty() => {
            return Err(Error::clause("order_by", "empty column list"))
        }
        OrderBy::Directions(ds) => ds
            .iter()
            .map(|(c, d)| format!("{} {}", c, d.as_sql()))
            .collect::<Vec<_>>()
            .join(", "),
    };
    stmt.push_str(" ORDER BY ");
    stmt.push_str(&terms);
    Ok(stmt)
}

/// ` LIMIT n`. SQLite only accepts OFFSET after a LIMIT, so a lone offset
/// gets `LIMIT -1` (no limit).
pub fn limit(mut stmt: Statement, limit: Option<u64>, offset_follows: bool) -> Statement {
    match limit {
        Some(n) => stmt.push_str(&format!(" LIMIT {}", n)),
        None if offset_follows => stmt.push_str(" LIMIT -1"),
        None => {}
    }
    stmt
}

/// ` OFFSET n`
pub fn offset(mut stmt: Statement, offset: Option<u64>) -> Statement {
    if let Some(n) = offset {
        stmt.push_str(&format!(" OFFSET {}", n));
    }
    stmt
}

// ---------------------------------------------------------------------------
// UPDATE / DELETE / DROP
// ---------------------------------------------------------------------------

/// `UPDATE [OR x] t`
pub fn update_table(mut stmt: Statement, or: Option<OrOption>, table: &str) -> Statement {
    stmt.push_str("UPDATE ");
    if let Some(or) = or {
        stmt.push_str(&format!("OR {} ", or.as_sql()));
    }
    stmt.push_str(table);
    stmt
}

/// ` SET a = ?, b = b + ?`
pub fn set(mut stmt: Statement, assignments: &Assignments) -> Result<Statement> {
    if assignments.is_empty() {
        return Err(Error::NoData {
            operation: "update",
        });
    }
    stmt.push_str(" SET ");
    for (i, assignment) in assignments.iter().enumerate() {
        if i > 0 {
            stmt.push_str(", ");
        }
        stmt.push_str(&assignment.column);
        stmt.push_str(" = ");
        match &assignment.value {
            SetValue::Value(v) => stmt.push_fragment("?", std::slice::from_ref(v)),
            SetValue::Expr(expr) => {
                aligned("set", expr.script(), expr.values())?;
                stmt.push_fragment(expr.script(), expr.values());
            }
        }
    }
    Ok(stmt)
}

impl Assignments {
    /// SET input from loose call arguments: keyword or mapping input, or
    /// an alternating `[col, val, ...]` list.
    pub fn from_args(args: &CallArgs) -> Result<Self> {
        let bindings = match resolve("update", args)? {
            Resolved::Bindings(b) => b,
            Resolved::Positional(values) => pairs("update", values)?,
        };
        Ok(bindings
            .into_inner()
            .into_iter()
            .fold(Assignments::new(), |acc, (c, v)| acc.set(c, v)))
    }

    /// SET input from a JSON object or alternating array.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Self::from_args(&CallArgs::from_json(value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Assignments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Assignments::new(), |acc, (c, v)| acc.set(c, v))
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Assignments {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// `DELETE FROM t`
pub fn delete_from(mut stmt: Statement, table: &str) -> Statement {
    stmt.push_str("DELETE FROM ");
    stmt.push_str(table);
    stmt
}

/// `DROP TABLE [IF EXISTS] t`
pub fn drop_table(mut stmt: Statement, drop: &DropTable) -> Statement {
    stmt.push_str("DROP TABLE ");
    if drop.if_exists {
        stmt.push_str("IF EXISTS ");
    }
    stmt.push_str(&drop.table);
    stmt
}

// ---------------------------------------------------------------------------
// CREATE
// ---------------------------------------------------------------------------

/// `CREATE [TEMP] TABLE [IF NOT EXISTS] t (...) [WITHOUT ROWID]`
pub fn create_table(
    mut stmt: Statement,
    name: &str,
    def: &TableDef,
    options: &CreateOptions,
) -> Result<Statement> {
    if def.columns.is_empty() {
        return Err(Error::NoData {
            operation: "create_table",
        });
    }
    let lines = def.definitions()?;

    stmt.push_str("CREATE ");
    match options.temporary {
        Temporary::No => {}
        Temporary::Temp => stmt.push_str("TEMP "),
        Temporary::Temporary => stmt.push_str("TEMPORARY "),
    }
    stmt.push_str("TABLE ");
    if options.if_not_exists {
        stmt.push_str("IF NOT EXISTS ");
    }
    stmt.push_str(&format!("{} ({})", name, lines.join(", ")));
    if options.without_rowid {
        stmt.push_str(" WITHOUT ROWID");
    }
    Ok(stmt)
}

// ---------------------------------------------------------------------------
// WITH
// ---------------------------------------------------------------------------

fn with_header(with: &[With]) -> Result<(String, Vec<Value>)> {
    let mut values = Vec::new();
    let mut ctes = Vec::with_capacity(with.len());
    for w in with {
        aligned("with", w.statement.script(), w.statement.values())?;
        values.extend_from_slice(w.statement.values());
        ctes.push(format!("{} AS ({})", w.name, w.statement.script()));
    }
    Ok((format!("WITH {} ", ctes.join(", ")), values))
}

/// Prefix `WITH name AS (...)`; sub-statement values go first.
pub fn with_prefix(stmt: Statement, with: &[With]) -> Result<Statement> {
    if with.is_empty() {
        return Ok(stmt);
    }
    let (header, mut values) = with_header(with)?;
    values.extend(stmt.values);
    Ok(Statement {
        script: header + &stmt.script,
        values,
    })
}

/// Batch form of `with_prefix`: the sub-statement values lead every row.
pub fn with_prefix_batch(batch: BatchStatement, with: &[With]) -> Result<BatchStatement> {
    if with.is_empty() {
        return Ok(batch);
    }
    let (header, values) = with_header(with)?;
    Ok(BatchStatement {
        script: header + &batch.script,
        rows: batch
            .rows
            .into_iter()
            .map(|row| values.iter().cloned().chain(row).collect())
            .collect(),
    })
}

/// Caller-supplied text must carry one value per `?`.
fn aligned(clause: &'static str, script: &str, values: &[Value]) -> Result<()> {
    let count = count_placeholders(script);
    if count != values.len() {
        return Err(Error::clause(
            clause,
            format!("{} placeholders, {} values", count, values.len()),
        ));
    }
    Ok(())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
