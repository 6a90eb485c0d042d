use tracing::debug;

use super::engine::Engine;
use super::schema::ColumnDescriptor;
use super::sqlite::SqliteEngine;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::statement::assembler;
use crate::statement::shape::{resolve, CallArgs, Resolved};
use crate::statement::template::{TableDef, TableTemplate};
use crate::statement::types::*;
use crate::value::{Row, Value};

/// Result of a write or select operation.
///
/// `Rows` when the statement ran, otherwise the statement that would have
/// run (`execute = false`).
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Rows(Vec<Row>),
    Statement(Statement),
    Batch(BatchStatement),
}

impl Output {
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            Output::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn into_rows(self) -> Option<Vec<Row>> {
        match self {
            Output::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn statement(&self) -> Option<&Statement> {
        match self {
            Output::Statement(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn into_statement(self) -> Option<Statement> {
        match self {
            Output::Statement(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn batch(&self) -> Option<&BatchStatement> {
        match self {
            Output::Batch(batch) => Some(batch),
            _ => None,
        }
    }
}

/// Input to `insert_many`.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkInput {
    /// One value list per row.
    Rows(Vec<Row>),
    /// `column → values`, transposed into rows.
    Columns(Vec<(String, Vec<Value>)>),
}

impl BulkInput {
    /// An array of arrays becomes `Rows`, an object of arrays `Columns`.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let values = |v: serde_json::Value| -> Result<Row> {
            match v {
                serde_json::Value::Array(items) => Ok(items.into_iter().map(Value::from).collect()),
                other => Err(Error::clause("insert_many", format!("element {}", other))),
            }
        };
        match value {
            serde_json::Value::Array(rows) => Ok(BulkInput::Rows(
                rows.into_iter().map(values).collect::<Result<_>>()?,
            )),
            serde_json::Value::Object(columns) => Ok(BulkInput::Columns(
                columns
                    .into_iter()
                    .map(|(name, v)| Ok((name, values(v)?)))
                    .collect::<Result<_>>()?,
            )),
            other => Err(Error::clause("insert_many", format!("payload {}", other))),
        }
    }
}

impl From<Vec<Row>> for BulkInput {
    fn from(rows: Vec<Row>) -> Self {
        BulkInput::Rows(rows)
    }
}

impl From<Vec<(String, Vec<Value>)>> for BulkInput {
    fn from(columns: Vec<(String, Vec<Value>)>) -> Self {
        BulkInput::Columns(columns)
    }
}

/// Statement builders bound to one engine connection.
///
/// The database owns its engine; it never reconnects on its own.
pub struct Database<E: Engine = SqliteEngine> {
    engine: E,
    config: Config,
}

impl Database<SqliteEngine> {
    /// Open the file named by `config.path`, or an in-memory database.
    pub fn open(config: Config) -> Result<Self> {
        let engine = match &config.path {
            Some(path) => SqliteEngine::connect(path)?,
            None => SqliteEngine::open_in_memory()?,
        };
        Ok(Self::with_engine(engine, config))
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(Config::in_memory())
    }
}

impl<E: Engine> Database<E> {
    pub fn with_engine(engine: E, config: Config) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // --- CREATE / DROP ---

    pub fn create_table(&self, name: &str, def: &TableDef, options: &CreateOptions) -> Result<Output> {
        let stmt = assembler::create_table(name, def, options)?;
        self.finish(stmt, options.execute)
    }

    /// One CREATE per template table, in declaration order.
    pub fn create_tables(
        &self,
        template: &TableTemplate,
        options: &CreateOptions,
    ) -> Result<Vec<Output>> {
        template
            .iter()
            .map(|(name, def)| self.create_table(name, def, options))
            .collect()
    }

    pub fn drop_table(&self, query: &DropTable) -> Result<Output> {
        let stmt = assembler::drop_table(query)?;
        self.finish(stmt, query.execute)
    }

    // --- INSERT ---

    /// Insert one row from keyword/mapping bindings or positional values.
    ///
    /// Positional values go through the fast path first when enabled; an
    /// arity or operational failure falls back to the column-aware path,
    /// which crops values to the table's columns.
    pub fn insert(&self, table: &str, args: &CallArgs, options: &InsertOptions) -> Result<Output> {
        let values = match resolve("insert", args)? {
            Resolved::Bindings(bindings) => {
                let stmt = assembler::insert_bindings(table, &bindings, options)?;
                return self.finish(stmt, options.execute);
            }
            Resolved::Positional(values) => values,
        };

        if options.execute && self.config.fast_path {
            let stmt = assembler::insert_fast(table, &values, options)?;
            match self.run(&stmt) {
                Ok(rows) => return Ok(Output::Rows(rows)),
                Err(err) if err.is_arity_failure() => {
                    debug!(table, error = %err, "fast-path insert failed; retrying with columns");
                }
                Err(err) => return Err(err),
            }
        }

        let columns = self.engine.list_columns(table)?;
        let stmt = assembler::insert_columns(table, columns, values, options)?;
        self.finish(stmt, options.execute)
    }

    /// `insert` with the REPLACE verb.
    pub fn replace(&self, table: &str, args: &CallArgs, options: &InsertOptions) -> Result<Output> {
        let options = InsertOptions {
            verb: InsertVerb::Replace,
            ..options.clone()
        };
        self.insert(table, args, &options)
    }

    /// Insert many rows with one statement run once per row.
    ///
    /// Row input is reconciled against the table's columns: short rows are
    /// padded with NULL and long rows truncated.
    pub fn insert_many(
        &self,
        table: &str,
        input: impl Into<BulkInput>,
        options: &InsertOptions,
    ) -> Result<Output> {
        let batch = match input.into() {
            BulkInput::Rows(rows) => {
                let columns = self.engine.list_columns(table)?;
                assembler::insert_many_rows(table, columns, rows, options)?
            }
            BulkInput::Columns(columns) => {
                assembler::insert_many_columns(table, columns, options)?
            }
        };
        if !options.execute {
            return Ok(Output::Batch(batch));
        }
        self.execute_many(&batch).map(Output::Rows)
    }

    // --- SELECT ---

    pub fn select(&self, query: &SelectQuery) -> Result<Output> {
        let stmt = assembler::select(query)?;
        self.finish(stmt, query.execute)
    }

    /// Every row of `table`.
    pub fn select_all(&self, table: &str) -> Result<Vec<Row>> {
        let stmt = assembler::select(&SelectQuery::new(table).columns(Columns::All))?;
        self.run(&stmt)
    }

    pub fn select_distinct(&self, query: &SelectQuery) -> Result<Output> {
        self.select(&query.clone().method(SelectMethod::Distinct))
    }

    // --- UPDATE / DELETE ---

    pub fn update(&self, query: &UpdateQuery) -> Result<Output> {
        let stmt = assembler::update(query)?;
        self.finish(stmt, query.execute)
    }

    pub fn delete(&self, query: &DeleteQuery) -> Result<Output> {
        let stmt = assembler::delete(query)?;
        self.finish(stmt, query.execute)
    }

    // --- Introspection ---

    pub fn list_columns(&self, table: &str) -> Result<Vec<String>> {
        self.engine.list_columns(table)
    }

    pub fn list_tables(&self) -> Result<Vec<String>> {
        self.engine.list_tables()
    }

    pub fn describe_table(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        self.engine.describe_table(table)
    }

    // --- Passthrough ---

    pub fn execute(&self, stmt: &Statement) -> Result<Vec<Row>> {
        self.run(stmt)
    }

    pub fn execute_many(&self, batch: &BatchStatement) -> Result<Vec<Row>> {
        debug_assert!(batch.is_aligned());
        self.engine.execute_many(batch.script(), batch.rows())
    }

    pub fn execute_script(&self, script: &str) -> Result<Vec<Row>> {
        self.engine.execute_script(script)
    }

    /// Commit pending work and close the connection.
    pub fn disconnect(self) -> Result<()> {
        self.engine.disconnect()
    }

    fn run(&self, stmt: &Statement) -> Result<Vec<Row>> {
        self.engine.execute(stmt.script(), stmt.values())
    }

    fn finish(&self, stmt: Statement, execute: bool) -> Result<Output> {
        if execute {
            self.run(&stmt).map(Output::Rows)
        } else {
            Ok(Output::Statement(stmt))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::condition::col;
    use crate::statement::types::Keyword;
    use crate::testing::warnings;

    fn db_with_t() -> Database {
        let db = Database::open_in_memory().unwrap();
        let def = TableDef::new()
            .column("id", Keyword::Integer)
            .column("name", Keyword::Text);
        db.create_table("t", &def, &CreateOptions::default()).unwrap();
        db
    }

    fn rows(db: &Database, table: &str) -> Vec<Row> {
        db.select_all(table).unwrap()
    }

    // --- round trip ---

    #[test]
    fn test_round_trip_scenario() {
        let db = db_with_t();
        db.insert("t", &CallArgs::values([Value::from(1), "Alex".into()]), &InsertOptions::default())
            .unwrap();
        assert_eq!(rows(&db, "t"), vec![vec![Value::Integer(1), "Alex".into()]]);

        db.update(&UpdateQuery::new("t", [("name", "Bo")]).filter(Where::mapping([("id", 1)])))
            .unwrap();
        let selected = db
            .select(&SelectQuery::new("t").columns(Columns::All).filter(Where::mapping([("id", 1)])))
            .unwrap();
        assert_eq!(
            selected.into_rows().unwrap(),
            vec![vec![Value::Integer(1), "Bo".into()]]
        );

        db.delete(&DeleteQuery::new("t").filter(Where::mapping([("id", 1)])))
            .unwrap();
        assert!(rows(&db, "t").is_empty());
    }

    #[test]
    fn test_keyword_insert() {
        let db = db_with_t();
        db.insert(
            "t",
            &CallArgs::keywords([("name", Value::from("Cy")), ("id", 3.into())]),
            &InsertOptions::default(),
        )
        .unwrap();
        assert_eq!(rows(&db, "t"), vec![vec![Value::Integer(3), "Cy".into()]]);
    }

    // --- fast path / fallback ---

    #[test]
    fn test_fast_path_fallback_crops_extra_values() {
        let db = db_with_t();
        let args = CallArgs::values([Value::from(1), "Alex".into(), 3.into()]);
        let (result, warned) = warnings(|| db.insert("t", &args, &InsertOptions::default()));
        result.unwrap();
        assert_eq!(warned.len(), 1);
        assert_eq!(rows(&db, "t"), vec![vec![Value::Integer(1), "Alex".into()]]);
    }

    #[test]
    fn test_text_affinity_applies_to_cropped_values() {
        let db = db_with_t();
        db.insert("t", &CallArgs::values([1, 2, 3]), &InsertOptions::default())
            .unwrap();
        assert_eq!(rows(&db, "t"), vec![vec![Value::Integer(1), Value::from("2")]]);
    }

    #[test]
    fn test_matching_insert_logs_nothing() {
        let db = db_with_t();
        let args = CallArgs::values([Value::from(1), "Alex".into()]);
        let (result, warned) = warnings(|| db.insert("t", &args, &InsertOptions::default()));
        result.unwrap();
        assert!(warned.is_empty());
    }

    #[test]
    fn test_fallback_targets_leading_columns_when_short() {
        let db = db_with_t();
        db.insert("t", &CallArgs::values([9]), &InsertOptions::default())
            .unwrap();
        assert_eq!(rows(&db, "t"), vec![vec![Value::Integer(9), Value::Null]]);
    }

    #[test]
    fn test_fallback_surfaces_schema_error() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .insert("missing", &CallArgs::values([1]), &InsertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NoSuchTable(ref t) if t == "missing"));
    }

    #[test]
    fn test_constraint_errors_are_not_retried() {
        let db = Database::open_in_memory().unwrap();
        db.execute_script("CREATE TABLE u (id INTEGER PRIMARY KEY)").unwrap();
        db.insert("u", &CallArgs::values([1]), &InsertOptions::default())
            .unwrap();
        let err = db
            .insert("u", &CallArgs::values([1]), &InsertOptions::default())
            .unwrap_err();
        assert_eq!(err.category(), Some(crate::error::ErrorCategory::Constraint));
    }

    #[test]
    fn test_build_only_positional_insert_names_columns() {
        let db = db_with_t();
        let output = db
            .insert(
                "t",
                &CallArgs::sequence([Value::from(1), "Alex".into()]),
                &InsertOptions::default().build_only(),
            )
            .unwrap();
        let stmt = output.statement().unwrap();
        assert_eq!(stmt.script(), "INSERT INTO t (id, name) VALUES (?, ?)");
        assert!(rows(&db, "t").is_empty());
    }

    #[test]
    fn test_replace_and_or_option() {
        let db = Database::open_in_memory().unwrap();
        db.execute_script("CREATE TABLE kv (k TEXT PRIMARY KEY, v INTEGER)").unwrap();
        db.insert("kv", &CallArgs::values([Value::from("a"), 1.into()]), &InsertOptions::default())
            .unwrap();
        db.replace("kv", &CallArgs::values([Value::from("a"), 2.into()]), &InsertOptions::default())
            .unwrap();
        db.insert(
            "kv",
            &CallArgs::values([Value::from("a"), 3.into()]),
            &InsertOptions::default().or(OrOption::Ignore),
        )
        .unwrap();
        assert_eq!(rows(&db, "kv"), vec![vec![Value::from("a"), Value::Integer(2)]]);
    }

    #[test]
    fn test_replace_with_or_option_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.execute_script("CREATE TABLE kv (k TEXT PRIMARY KEY, v INTEGER)").unwrap();
        let args = CallArgs::values([Value::from("a"), 1.into()]);
        let options = InsertOptions::default().or(OrOption::Ignore);

        let err = db.replace("kv", &args, &options.clone().build_only()).unwrap_err();
        assert!(matches!(err, Error::ClauseType { clause: "insert", .. }));

        let err = db.replace("kv", &args, &options).unwrap_err();
        assert!(matches!(err, Error::ClauseType { clause: "insert", .. }));
        assert!(rows(&db, "kv").is_empty());

        let input: Vec<Row> = vec![vec!["a".into(), 1.into()]];
        let options = InsertOptions {
            verb: InsertVerb::Replace,
            ..options
        };
        assert!(db.insert_many("kv", input, &options).is_err());
    }

    // --- insert_many ---

    #[test]
    fn test_insert_many_logs_one_summary() {
        let db = db_with_t();
        let input: Vec<Row> = vec![
            vec![1.into(), "a".into()],
            vec![2.into()],
            vec![3.into(), "c".into(), "extra".into()],
        ];
        let (result, warned) = warnings(|| db.insert_many("t", input, &InsertOptions::default()));
        result.unwrap();
        assert_eq!(warned.len(), 1);
        assert_eq!(rows(&db, "t").len(), 3);
    }

    #[test]
    fn test_insert_many_narrow_rows_log_one_summary() {
        let db = Database::open_in_memory().unwrap();
        db.execute_script("CREATE TABLE w (a INTEGER, b TEXT, c TEXT)").unwrap();

        let mixed: Vec<Row> = vec![vec![1.into()], vec![2.into(), "b".into()]];
        let (result, warned) = warnings(|| db.insert_many("w", mixed, &InsertOptions::default()));
        result.unwrap();
        assert_eq!(warned.len(), 1);

        let uniform: Vec<Row> = vec![vec![3.into()], vec![4.into()]];
        let (result, warned) =
            warnings(|| db.insert_many("w", uniform, &InsertOptions::default()));
        result.unwrap();
        assert_eq!(warned.len(), 1);

        assert_eq!(
            rows(&db, "w")[1],
            vec![Value::Integer(2), Value::from("b"), Value::Null]
        );
    }

    #[test]
    fn test_insert_many_pads_short_rows() {
        let db = db_with_t();
        let input: Vec<Row> = vec![vec![1.into(), "a".into()], vec![2.into()]];
        db.insert_many("t", input, &InsertOptions::default()).unwrap();
        assert_eq!(
            rows(&db, "t"),
            vec![
                vec![Value::Integer(1), "a".into()],
                vec![Value::Integer(2), Value::Null],
            ]
        );
    }

    #[test]
    fn test_insert_many_from_columns_and_json() {
        let db = db_with_t();
        let input = BulkInput::from_json(serde_json::json!({"id": [1, 2], "name": ["a", "b"]}))
            .unwrap();
        db.insert_many("t", input, &InsertOptions::default()).unwrap();

        let input = BulkInput::from_json(serde_json::json!([[3, "c"]])).unwrap();
        db.insert_many("t", input, &InsertOptions::default()).unwrap();
        assert_eq!(rows(&db, "t").len(), 3);

        assert!(BulkInput::from_json(serde_json::json!("rows")).is_err());
        assert!(BulkInput::from_json(serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn test_insert_many_build_only() {
        let db = db_with_t();
        let input: Vec<Row> = vec![vec![1.into()], vec![2.into(), "b".into()]];
        let output = db
            .insert_many("t", input, &InsertOptions::default().build_only())
            .unwrap();
        let batch = output.batch().unwrap();
        assert_eq!(batch.rows()[0], vec![Value::Integer(1), Value::Null]);
        assert!(rows(&db, "t").is_empty());
    }

    #[test]
    fn test_insert_many_batch_fails_as_a_whole() {
        let db = Database::open_in_memory().unwrap();
        db.execute_script("CREATE TABLE u (id INTEGER PRIMARY KEY)").unwrap();
        let input: Vec<Row> = vec![vec![1.into()], vec![1.into()]];
        assert!(db.insert_many("u", input, &InsertOptions::default()).is_err());
        assert!(rows(&db, "u").is_empty());
    }

    // --- select ---

    #[test]
    fn test_select_variants() {
        let db = db_with_t();
        let input: Vec<Row> = vec![
            vec![1.into(), "a".into()],
            vec![2.into(), "a".into()],
            vec![3.into(), "b".into()],
        ];
        db.insert_many("t", input, &InsertOptions::default()).unwrap();

        let distinct = db
            .select_distinct(&SelectQuery::new("t").columns("name").order_by("name"))
            .unwrap();
        assert_eq!(
            distinct.into_rows().unwrap(),
            vec![vec![Value::from("a")], vec![Value::from("b")]]
        );

        let page = db
            .select(
                &SelectQuery::new("t")
                    .columns("id")
                    .filter(col("id").gt(1))
                    .order_by(OrderBy::Directions(vec![("id".into(), Direction::Desc)]))
                    .limit(1),
            )
            .unwrap();
        assert_eq!(page.into_rows().unwrap(), vec![vec![Value::Integer(3)]]);

        let skipped = db
            .select(&SelectQuery::new("t").columns("id").order_by(OrderBy::Position(1)).offset(2))
            .unwrap();
        assert_eq!(skipped.into_rows().unwrap(), vec![vec![Value::Integer(3)]]);
    }

    #[test]
    fn test_select_join() {
        let db = Database::open_in_memory().unwrap();
        db.execute_script(
            "CREATE TABLE users (id INTEGER, name TEXT);
             CREATE TABLE orders (user_id INTEGER, total INTEGER);
             INSERT INTO users VALUES (1, 'Alex'), (2, 'Bo');
             INSERT INTO orders VALUES (1, 50), (1, 150), (2, 300);",
        )
        .unwrap();
        let output = db
            .select(
                &SelectQuery::new("users")
                    .columns(vec!["users.name", "orders.total"])
                    .join(Join::new("orders").on(col("users.id").eq(col("orders.user_id"))))
                    .filter(col("orders.total").gt(100))
                    .order_by("orders.total"),
            )
            .unwrap();
        assert_eq!(
            output.into_rows().unwrap(),
            vec![
                vec![Value::from("Alex"), Value::Integer(150)],
                vec![Value::from("Bo"), Value::Integer(300)],
            ]
        );
    }

    #[test]
    fn test_select_build_only_returns_statement() {
        let db = db_with_t();
        let output = db
            .select(
                &SelectQuery::new("t")
                    .filter(Where::mapping([("id", 1)]))
                    .build_only(),
            )
            .unwrap();
        let stmt = output.into_statement().unwrap();
        assert_eq!(stmt.script(), "SELECT * FROM t WHERE (id = ?)");
        assert_eq!(stmt.values(), &[Value::Integer(1)]);
    }

    #[test]
    fn test_with_prefix_executes() {
        let db = db_with_t();
        let input: Vec<Row> = vec![vec![1.into(), "a".into()], vec![5.into(), "b".into()]];
        db.insert_many("t", input, &InsertOptions::default()).unwrap();

        let big = db
            .select(&SelectQuery::new("t").columns(Columns::All).filter(col("id").gt(2)).build_only())
            .unwrap()
            .into_statement()
            .unwrap();
        let output = db
            .select(
                &SelectQuery::new("big")
                    .columns("name")
                    .filter(col("id").lt(10))
                    .with(With::new("big", big)),
            )
            .unwrap();
        assert_eq!(output.into_rows().unwrap(), vec![vec![Value::from("b")]]);
    }

    // --- update ---

    #[test]
    fn test_update_with_expression() {
        let db = Database::open_in_memory().unwrap();
        db.execute_script("CREATE TABLE c (id INTEGER, n INTEGER); INSERT INTO c VALUES (1, 5);")
            .unwrap();
        let set = Assignments::new().set_expr("n", col("n").add(2));
        db.update(&UpdateQuery::new("c", set).filter(col("id").eq(1)))
            .unwrap();
        assert_eq!(rows(&db, "c"), vec![vec![Value::Integer(1), Value::Integer(7)]]);
    }

    #[test]
    fn test_update_from_alternating_args() {
        let db = db_with_t();
        db.insert("t", &CallArgs::values([Value::from(1), "Alex".into()]), &InsertOptions::default())
            .unwrap();
        let set = Assignments::from_args(&CallArgs::sequence(["name", "Bo"])).unwrap();
        let filter = Where::from_args(&CallArgs::keywords([("id", 1)])).unwrap();
        db.update(&UpdateQuery::new("t", set).filter(filter)).unwrap();
        assert_eq!(rows(&db, "t"), vec![vec![Value::Integer(1), "Bo".into()]]);
    }

    // --- create / drop / introspection ---

    #[test]
    fn test_create_tables_from_template() {
        let db = Database::open_in_memory().unwrap();
        let template = TableTemplate::from_json(
            r#"{
                "groups": {"id": ["INTEGER", "PRIMARY_KEY"]},
                "g": {
                    "id": ["NOT_NULL", "PRIMARY_KEY", "TEXT"],
                    "group_id": "INTEGER",
                    "FOREIGN_KEY": {"group_id": ["groups", "id"]}
                }
            }"#,
        )
        .unwrap();
        let outputs = db
            .create_tables(&template, &CreateOptions::default().if_not_exists())
            .unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(db.list_tables().unwrap(), vec!["g", "groups"]);

        let columns = db.describe_table("g").unwrap();
        assert_eq!(columns[0].data_type, "TEXT");
        assert!(columns[0].is_primary_key);
        assert!(!columns[0].is_nullable);
    }

    #[test]
    fn test_create_build_only() {
        let db = Database::open_in_memory().unwrap();
        let def = TableDef::new().column("id", [Keyword::PrimaryKey, Keyword::Text, Keyword::NotNull]);
        let output = db
            .create_table("g", &def, &CreateOptions::default().build_only())
            .unwrap();
        assert_eq!(
            output.statement().unwrap().script(),
            "CREATE TABLE g (id TEXT PRIMARY KEY NOT NULL)"
        );
        assert!(db.list_tables().unwrap().is_empty());
    }

    #[test]
    fn test_drop_table() {
        let db = db_with_t();
        db.drop_table(&DropTable::new("t")).unwrap();
        assert!(db.list_tables().unwrap().is_empty());
        assert!(db.drop_table(&DropTable::new("t")).is_err());
        db.drop_table(&DropTable::new("t").if_exists()).unwrap();
    }

    #[test]
    fn test_list_columns() {
        let db = db_with_t();
        assert_eq!(db.list_columns("t").unwrap(), vec!["id", "name"]);
        assert!(matches!(db.list_columns("nope"), Err(Error::NoSuchTable(_))));
    }

    // --- lifecycle ---

    #[test]
    fn test_file_database_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_path(dir.path().join("app.db"));

        let db = Database::open(config.clone()).unwrap();
        db.execute_script("CREATE TABLE t (id INTEGER)").unwrap();
        db.insert("t", &CallArgs::values([42]), &InsertOptions::default())
            .unwrap();
        db.disconnect().unwrap();

        let db = Database::open(config).unwrap();
        assert_eq!(rows(&db, "t"), vec![vec![Value::Integer(42)]]);
    }

    #[test]
    fn test_fast_path_disabled_uses_columns() {
        let config = Config {
            fast_path: false,
            ..Config::default()
        };
        let db = Database::open(config).unwrap();
        db.execute_script("CREATE TABLE t (id INTEGER, name TEXT)").unwrap();
        db.insert("t", &CallArgs::values([1, 2, 3]), &InsertOptions::default())
            .unwrap();
        assert_eq!(rows(&db, "t").len(), 1);
    }
}
