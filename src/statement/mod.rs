/// Statement building core.
///
/// Loosely-shaped caller input is reduced to one parameterized statement:
///
/// ```text
/// Caller input (values / mapping / sequence / JSON)
///       ↓
/// Argument Shape Resolver  (shape.rs)
///       ↓
/// Crop / Pad Reconciliation (reconcile.rs)
///       ↓
/// Clause Builders           (clauses.rs, condition.rs, normalize.rs)
///       ↓
/// Statement Assembler       (assembler.rs)
///       ↓
/// (script, values)  →  Engine (db/ module)
/// ```
///
/// Table templates (template.rs) feed the CREATE TABLE builder.
pub mod assembler;
pub mod clauses;
pub mod condition;
pub mod normalize;
pub mod reconcile;
pub mod shape;
pub mod template;
pub mod types;

// Re-export key types for convenience
pub use condition::{col, Column, Condition, Operand};
pub use normalize::{column_definition, normalize};
pub use shape::{resolve, Arg, Bindings, CallArgs, Resolved};
pub use template::{ColumnSpec, ForeignKey, TableDef, TableTemplate};
pub use types::*;
