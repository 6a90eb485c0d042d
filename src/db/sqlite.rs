//! SQLite engine over `rusqlite`.

use std::path::Path;

use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use tracing::{debug, info};

use super::engine::Engine;
use super::schema::{self, ColumnDescriptor};
use crate::error::Result;
use crate::value::{Row, Value};

/// One SQLite connection.
#[derive(Debug)]
pub struct SqliteEngine {
    conn: Connection,
}

impl SqliteEngine {
    /// Open or create a database file.
    pub fn connect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "connected");
        Ok(Self { conn })
    }

    /// Private in-memory database, gone when the engine is dropped.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        info!("connected to in-memory database");
        Ok(Self { conn })
    }

    /// Escape hatch for anything the engine trait does not cover.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn run(conn: &Connection, script: &str, values: &[Value]) -> Result<Vec<Row>> {
        let mut stmt = conn.prepare(script)?;
        let width = stmt.column_count();
        if width == 0 {
            stmt.execute(params_from_iter(values))?;
            return Ok(Vec::new());
        }
        let rows = stmt
            .query_map(params_from_iter(values), |row| {
                (0..width).map(|i| row.get::<_, Value>(i)).collect()
            })?
            .collect::<rusqlite::Result<Vec<Row>>>()?;
        Ok(rows)
    }
}

impl Engine for SqliteEngine {
    fn execute(&self, script: &str, values: &[Value]) -> Result<Vec<Row>> {
        debug!(script, values = values.len(), "execute");
        Self::run(&self.conn, script, values)
    }

    fn execute_many(&self, script: &str, rows: &[Row]) -> Result<Vec<Row>> {
        debug!(script, rows = rows.len(), "execute_many");
        let tx = if self.conn.is_autocommit() {
            Some(self.conn.unchecked_transaction()?)
        } else {
            None
        };

        let mut stmt = self.conn.prepare(script)?;
        let mut output = Vec::new();
        let width = stmt.column_count();
        for values in rows {
            if width == 0 {
                stmt.execute(params_from_iter(values))?;
            } else {
                let fetched = stmt
                    .query_map(params_from_iter(values), |row| {
                        (0..width).map(|i| row.get::<_, Value>(i)).collect()
                    })?
                    .collect::<rusqlite::Result<Vec<Row>>>()?;
                output.extend(fetched);
            }
        }
        drop(stmt);

        if let Some(tx) = tx {
            tx.commit()?;
        }
        Ok(output)
    }

    fn execute_script(&self, script: &str) -> Result<Vec<Row>> {
        debug!(script, "execute_script");
        self.conn.execute_batch(script)?;
        Ok(Vec::new())
    }

    fn describe_table(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        schema::get_columns(&self.conn, table)
    }

    fn list_tables(&self) -> Result<Vec<String>> {
        Ok(schema::get_tables(&self.conn)?
            .into_iter()
            .map(|t| t.name)
            .collect())
    }

    fn disconnect(self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        self.conn.close().map_err(|(_, e)| e)?;
        info!("disconnected");
        Ok(())
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Owned(rusqlite::types::Value::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(text) => Value::Text(String::from_utf8_lossy(text).into_owned()),
            ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(Value::from(value))
    }
}
