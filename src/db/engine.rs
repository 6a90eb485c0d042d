use super::schema::ColumnDescriptor;
use crate::error::{Error, Result};
use crate::value::{Row, Value};

/// The SQL engine statements are handed to.
///
/// Implementations own one connection. Nothing here serializes access: a
/// connection shared between threads must be guarded by the caller.
pub trait Engine {
    /// Run one statement. Returns result rows, or no rows for statements
    /// that produce none.
    fn execute(&self, script: &str, values: &[Value]) -> Result<Vec<Row>>;

    /// Run one statement once per row of values. In autocommit mode the
    /// whole batch runs in one transaction, so it succeeds or fails as a
    /// unit.
    fn execute_many(&self, script: &str, rows: &[Row]) -> Result<Vec<Row>>;

    /// Run several `;`-separated statements without bound values.
    fn execute_script(&self, script: &str) -> Result<Vec<Row>>;

    fn describe_table(&self, table: &str) -> Result<Vec<ColumnDescriptor>>;

    fn list_tables(&self) -> Result<Vec<String>>;

    /// Column names in declaration order. Fails with `NoSuchTable` when the
    /// table is absent or has no columns.
    fn list_columns(&self, table: &str) -> Result<Vec<String>> {
        let columns: Vec<String> = self
            .describe_table(table)?
            .into_iter()
            .map(|c| c.name)
            .collect();
        if columns.is_empty() {
            return Err(Error::NoSuchTable(table.to_string()));
        }
        Ok(columns)
    }

    /// Commit pending work and close the connection.
    fn disconnect(self) -> Result<()>
    where
        Self: Sized;
}
