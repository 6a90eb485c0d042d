use rusqlite::Connection;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum TableType {
    Table,
    View,
}

impl TableType {
    pub fn label(&self) -> &'static str {
        match self {
            TableType::Table => "TABLE",
            TableType::View => "VIEW",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub name: String,
    pub table_type: TableType,
}

/// One column of a table, as reported by schema introspection.
///
/// Fetched on demand and never cached: re-fetch after any DDL.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub table: String,
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub is_primary_key: bool,
    pub default_value: Option<String>,
    pub ordinal_position: i32,
}

/// User tables and views, in name order. SQLite's internal tables are skipped.
pub fn get_tables(conn: &Connection) -> Result<Vec<TableInfo>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT name, type
        FROM sqlite_master
        WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%'
        ORDER BY name
        "#,
    )?;

    let tables = stmt
        .query_map([], |row| {
            let kind: String = row.get(1)?;
            Ok(TableInfo {
                name: row.get(0)?,
                table_type: if kind == "view" {
                    TableType::View
                } else {
                    TableType::Table
                },
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(tables)
}

/// Columns of `table` in declaration order; empty when the table is absent.
pub fn get_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnDescriptor>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT cid, name, type, "notnull", dflt_value, pk
        FROM pragma_table_info(?1)
        ORDER BY cid
        "#,
    )?;

    let columns = stmt
        .query_map([table], |row| {
            let cid: i32 = row.get(0)?;
            let not_null: bool = row.get(3)?;
            let pk: i32 = row.get(5)?;
            Ok(ColumnDescriptor {
                table: table.to_string(),
                name: row.get(1)?,
                data_type: row.get(2)?,
                is_nullable: !not_null,
                is_primary_key: pk > 0,
                default_value: row.get(4)?,
                ordinal_position: cid + 1,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(columns)
}
