mod database;
mod engine;
mod schema;
mod sqlite;

pub use database::*;
pub use engine::*;
pub use schema::*;
pub use sqlite::*;
