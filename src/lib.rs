pub mod config;
pub mod db;
pub mod error;
pub mod statement;
pub mod value;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use db::{BulkInput, Database, Engine, Output, SqliteEngine};
pub use error::{Error, ErrorCategory, Result};
pub use statement::{
    col, CallArgs, Columns, CreateOptions, DeleteQuery, DropTable, InsertOptions, Keyword,
    SelectQuery, Statement, TableDef, TableTemplate, UpdateQuery, Where,
};
pub use value::{Row, Value};
