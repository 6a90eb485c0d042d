//! Statement assembler.
//!
//! Each statement kind has one fixed pipeline of clause builders, applied
//! left to right over an empty statement:
//!
//! ```text
//! SELECT  base → joins → where → order by → limit → offset → with
//! INSERT  target → values → with
//! UPDATE  target → set → where → with
//! DELETE  target → where → with
//! DROP    target
//! CREATE  target
//! ```
//!
//! Everything here is pure: column names for the column-aware INSERT
//! paths come from the caller, which owns schema introspection.

use tracing::warn;

use super::clauses::{self, InsertTarget};
use super::reconcile::{crop, fit_rows, widest, zip_columns};
use super::shape::Bindings;
use super::template::TableDef;
use super::types::*;
use crate::error::{Error, Result};
use crate::value::{Row, Value};

type Step<'q> = Box<dyn Fn(Statement) -> Result<Statement> + 'q>;

fn step<'q>(f: impl Fn(Statement) -> Result<Statement> + 'q) -> Step<'q> {
    Box::new(f)
}

/// Fold the steps over an empty statement.
fn run(steps: Vec<Step<'_>>) -> Result<Statement> {
    let stmt = steps
        .into_iter()
        .try_fold(Statement::default(), |stmt, step| step(stmt))?;
    debug_assert!(
        stmt.is_aligned(),
        "placeholder/value mismatch in {:?}",
        stmt.script
    );
    Ok(stmt)
}

pub fn select(query: &SelectQuery) -> Result<Statement> {
    let offset_follows = query.offset.is_some();
    run(vec![
        step(|s| clauses::select_from(s, query.method, query.columns.as_ref(), &query.table)),
        step(|s| clauses::joins(s, &query.joins)),
        step(|s| clauses::where_clause(s, query.filter.as_ref())),
        step(|s| clauses::order_by(s, query.order_by.as_ref())),
        step(move |s| Ok(clauses::limit(s, query.limit, offset_follows))),
        step(|s| Ok(clauses::offset(s, query.offset))),
        step(|s| clauses::with_prefix(s, &query.with)),
    ])
}

/// `INSERT INTO t VALUES (...)` with one placeholder per supplied value.
pub fn insert_fast(table: &str, values: &[Value], options: &InsertOptions) -> Result<Statement> {
    let target = InsertTarget {
        verb: options.verb,
        or: options.or,
        table,
        columns: None,
        arity: values.len(),
    };
    insert(&target, values, options)
}

/// Column-aware positional INSERT. Values and columns are cropped to the
/// shorter of the two before the statement is built.
pub fn insert_columns(
    table: &str,
    mut columns: Vec<String>,
    mut values: Vec<Value>,
    options: &InsertOptions,
) -> Result<Statement> {
    crop(table, &mut columns, &mut values);
    let target = InsertTarget {
        verb: options.verb,
        or: options.or,
        table,
        columns: Some(&columns),
        arity: columns.len(),
    };
    insert(&target, &values, options)
}

/// INSERT from named bindings, in binding order.
pub fn insert_bindings(
    table: &str,
    bindings: &Bindings,
    options: &InsertOptions,
) -> Result<Statement> {
    let columns: Vec<String> = bindings.columns().map(str::to_string).collect();
    let values: Vec<Value> = bindings.values().cloned().collect();
    let target = InsertTarget {
        verb: options.verb,
        or: options.or,
        table,
        columns: Some(&columns),
        arity: columns.len(),
    };
    insert(&target, &values, options)
}

fn insert(target: &InsertTarget, values: &[Value], options: &InsertOptions) -> Result<Statement> {
    run(vec![
        step(|s| clauses::insert_into(s, target)),
        step(|s| Ok(clauses::bind(s, values))),
        step(|s| clauses::with_prefix(s, &options.with)),
    ])
}

/// Bulk INSERT from rows. The widest row picks the leading table columns
/// the statement targets; every row is then padded with NULL or truncated
/// to that arity. At most one warning is logged per batch.
pub fn insert_many_rows(
    table: &str,
    mut table_columns: Vec<String>,
    mut rows: Vec<Row>,
    options: &InsertOptions,
) -> Result<BatchStatement> {
    let width = widest(&rows);
    if width == 0 {
        return Err(Error::NoData {
            operation: "insert_many",
        });
    }
    let table_width = table_columns.len();
    table_columns.truncate(width);
    let arity = table_columns.len();

    let target = InsertTarget {
        verb: options.verb,
        or: options.or,
        table,
        columns: Some(&table_columns),
        arity,
    };
    let head = clauses::insert_into(Statement::default(), &target)?;

    if fit_rows(table, &mut rows, arity) == 0 && arity < table_width {
        warn!(
            table,
            expected = table_width,
            given = arity,
            "rows are narrower than the table; trailing columns left unset"
        );
    }

    let batch = BatchStatement {
        script: head.script,
        rows,
    };
    clauses::with_prefix_batch(batch, &options.with)
}

/// Bulk INSERT from `column → values`, transposed into rows. Columns with
/// more values than the shortest one are truncated.
pub fn insert_many_columns(
    table: &str,
    columns: Vec<(String, Vec<Value>)>,
    options: &InsertOptions,
) -> Result<BatchStatement> {
    let (names, rows) = zip_columns(table, columns);
    if names.is_empty() || rows.is_empty() {
        return Err(Error::NoData {
            operation: "insert_many",
        });
    }
    let target = InsertTarget {
        verb: options.verb,
        or: options.or,
        table,
        columns: Some(&names),
        arity: names.len(),
    };
    let head = clauses::insert_into(Statement::default(), &target)?;
    let batch = BatchStatement {
        script: head.script,
        rows,
    };
    clauses::with_prefix_batch(batch, &options.with)
}

pub fn update(query: &UpdateQuery) -> Result<Statement> {
    run(vec![
        step(|s| Ok(clauses::update_table(s, query.or, &query.table))),
        step(|s| clauses::set(s, &query.set)),
        step(|s| clauses::where_clause(s, query.filter.as_ref())),
        step(|s| clauses::with_prefix(s, &query.with)),
    ])
}

pub fn delete(query: &DeleteQuery) -> Result<Statement> {
    run(vec![
        step(|s| Ok(clauses::delete_from(s, &query.table))),
        step(|s| clauses::where_clause(s, query.filter.as_ref())),
        step(|s| clauses::with_prefix(s, &query.with)),
    ])
}

pub fn drop_table(query: &DropTable) -> Result<Statement> {
    run(vec![step(|s| Ok(clauses::drop_table(s, query)))])
}

pub fn create_table(name: &str, def: &TableDef, options: &CreateOptions) -> Result<Statement> {
    run(vec![step(|s| clauses::create_table(s, name, def, options))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::condition::{col, Condition};
    use crate::statement::shape::{resolve, CallArgs, Resolved};

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn build_insert(table: &str, table_columns: &[&str], args: CallArgs) -> Statement {
        let options = InsertOptions::default();
        match resolve("insert", &args).unwrap() {
            Resolved::Bindings(b) => insert_bindings(table, &b, &options).unwrap(),
            Resolved::Positional(v) => {
                insert_columns(table, columns(table_columns), v, &options).unwrap()
            }
        }
    }

    // --- SELECT ---

    #[test]
    fn test_select_clause_order() {
        let query = SelectQuery::new("users")
            .columns(vec!["users.name", "orders.total"])
            .join(Join::new("orders").on(col("users.id").eq(col("orders.user_id"))))
            .filter(col("orders.total").gt(100).and(col("users.active").eq(true)))
            .order_by(OrderBy::Directions(vec![(
                "orders.total".into(),
                Direction::Desc,
            )]))
            .limit(10)
            .offset(20);
        let stmt = select(&query).unwrap();
        assert_eq!(
            stmt.script(),
            "SELECT users.name, orders.total FROM users \
             INNER JOIN orders ON users.id = orders.user_id \
             WHERE (orders.total > ? AND users.active = ?) \
             ORDER BY orders.total DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(stmt.values(), &[Value::Integer(100), Value::Integer(1)]);
    }

    #[test]
    fn test_select_alignment_with_join_values_first() {
        let query = SelectQuery::new("a")
            .columns(Columns::All)
            .join(Join::new("b").on(col("a.id").eq(col("b.id")).and(col("b.kind").eq("x"))))
            .filter(Where::mapping([("a.n", 5)]));
        let stmt = select(&query).unwrap();
        assert!(stmt.is_aligned());
        assert_eq!(
            stmt.values(),
            &[Value::Text("x".into()), Value::Integer(5)]
        );
    }

    #[test]
    fn test_select_with_prefix() {
        let inner = select(
            &SelectQuery::new("users")
                .columns("id")
                .filter(col("age").gt(30))
                .build_only(),
        )
        .unwrap();
        let query = SelectQuery::new("older")
            .columns(Columns::All)
            .filter(col("id").lt(100))
            .with(With::new("older", inner));
        let stmt = select(&query).unwrap();
        assert_eq!(
            stmt.script(),
            "WITH older AS (SELECT id FROM users WHERE (age > ?)) \
             SELECT * FROM older WHERE (id < ?)"
        );
        assert_eq!(stmt.values(), &[Value::Integer(30), Value::Integer(100)]);
    }

    #[test]
    fn test_unbound_caller_placeholders_are_errors() {
        let query = SelectQuery::new("t").filter(Where::Raw("id = ?".into()));
        assert!(matches!(
            select(&query),
            Err(Error::ClauseType { clause: "where", .. })
        ));

        let query = DeleteQuery::new("t")
            .filter(Condition::raw("id = ?", vec![]).and(col("a").eq(1)));
        assert!(matches!(
            delete(&query),
            Err(Error::ClauseType { clause: "where", .. })
        ));

        let query = SelectQuery::new("t").filter(Condition::raw("id = ?", vec![7.into()]));
        assert_eq!(select(&query).unwrap().values(), &[Value::Integer(7)]);
    }

    #[test]
    fn test_select_invalid_clause_propagates() {
        let query = SelectQuery::new("t").order_by(OrderBy::Position(0));
        assert!(select(&query).is_err());
    }

    // --- INSERT ---

    #[test]
    fn test_mapping_and_keywords_build_identical_statements() {
        let a = build_insert("t", &[], CallArgs::mapping([("a", 1), ("b", 2)]));
        let b = build_insert("t", &[], CallArgs::keywords([("a", 1), ("b", 2)]));
        assert_eq!(a, b);
        assert_eq!(a.script(), "INSERT INTO t (a, b) VALUES (?, ?)");
    }

    #[test]
    fn test_sequence_and_scalars_build_identical_statements() {
        let a = build_insert("t", &["x", "y", "z"], CallArgs::sequence([1, 2, 3]));
        let b = build_insert("t", &["x", "y", "z"], CallArgs::values([1, 2, 3]));
        assert_eq!(a, b);
        assert_eq!(
            a.values(),
            &[Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
    }

    #[test]
    fn test_crop_targets_leading_columns() {
        let stmt = build_insert("t", &["id", "name"], CallArgs::values([1, 2, 3]));
        assert_eq!(stmt.script(), "INSERT INTO t (id, name) VALUES (?, ?)");
        assert_eq!(stmt.values(), &[Value::Integer(1), Value::Integer(2)]);
    }

    #[test]
    fn test_insert_fast_with_or_option() {
        let options = InsertOptions::default().or(OrOption::Replace);
        let stmt = insert_fast("t", &[1.into(), "Alex".into()], &options).unwrap();
        assert_eq!(stmt.script(), "INSERT OR REPLACE INTO t VALUES (?, ?)");
        assert_eq!(stmt.values().len(), 2);
    }

    // --- INSERT many ---

    #[test]
    fn test_insert_many_pads_short_rows() {
        let rows = vec![vec![1.into(), "a".into()], vec![2.into()]];
        let batch = insert_many_rows(
            "t",
            columns(&["id", "name"]),
            rows,
            &InsertOptions::default(),
        )
        .unwrap();
        assert_eq!(batch.script(), "INSERT INTO t (id, name) VALUES (?, ?)");
        assert_eq!(batch.rows()[1], vec![Value::Integer(2), Value::Null]);
        assert!(batch.is_aligned());
    }

    #[test]
    fn test_insert_many_truncates_to_table_arity() {
        let rows = vec![vec![1.into(), "a".into(), "extra".into()], vec![2.into()]];
        let batch =
            insert_many_rows("t", columns(&["id", "name"]), rows, &InsertOptions::default())
                .unwrap();
        assert_eq!(batch.placeholder_count(), 2);
        assert!(batch.rows().iter().all(|r| r.len() == 2));
    }

    #[test]
    fn test_insert_many_narrow_rows_target_leading_columns() {
        let rows = vec![vec![1.into()], vec![2.into()]];
        let batch = insert_many_rows(
            "t",
            columns(&["id", "name", "age"]),
            rows,
            &InsertOptions::default(),
        )
        .unwrap();
        assert_eq!(batch.script(), "INSERT INTO t (id) VALUES (?)");
    }

    #[test]
    fn test_insert_many_columns_zip() {
        let batch = insert_many_columns(
            "t",
            vec![
                ("id".into(), vec![1.into(), 2.into()]),
                ("name".into(), vec!["a".into(), "b".into()]),
            ],
            &InsertOptions::default(),
        )
        .unwrap();
        assert_eq!(batch.script(), "INSERT INTO t (id, name) VALUES (?, ?)");
        assert_eq!(batch.rows().len(), 2);
        assert_eq!(batch.rows()[1], vec![Value::Integer(2), Value::Text("b".into())]);
    }

    #[test]
    fn test_insert_many_empty_rejected() {
        let err = insert_many_rows("t", columns(&["id"]), Vec::new(), &InsertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NoData { operation: "insert_many" }));
    }

    // --- UPDATE / DELETE / DROP / CREATE ---

    #[test]
    fn test_update_clause_order() {
        let query = UpdateQuery::new(
            "t",
            Assignments::new()
                .set("name", "Bo")
                .set_expr("n", col("n").mul(2)),
        )
        .filter(Where::mapping([("id", 1)]));
        let stmt = update(&query).unwrap();
        assert_eq!(stmt.script(), "UPDATE t SET name = ?, n = n * ? WHERE (id = ?)");
        assert_eq!(
            stmt.values(),
            &[Value::Text("Bo".into()), Value::Integer(2), Value::Integer(1)]
        );
    }

    #[test]
    fn test_delete_and_drop() {
        let stmt = delete(&DeleteQuery::new("t").filter(Where::mapping([("id", 1)]))).unwrap();
        assert_eq!(stmt.script(), "DELETE FROM t WHERE (id = ?)");

        let stmt = delete(&DeleteQuery::new("t")).unwrap();
        assert_eq!(stmt.script(), "DELETE FROM t");

        let stmt = drop_table(&DropTable::new("t")).unwrap();
        assert_eq!(stmt.script(), "DROP TABLE t");
    }

    #[test]
    fn test_create_type_first() {
        let def = TableDef::new().column("id", [Keyword::PrimaryKey, Keyword::NotNull, Keyword::Text]);
        let stmt = create_table("g", &def, &CreateOptions::default()).unwrap();
        assert_eq!(stmt.script(), "CREATE TABLE g (id TEXT PRIMARY KEY NOT NULL)");
    }
}
