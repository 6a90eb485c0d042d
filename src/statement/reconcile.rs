//! Column-count reconciliation.
//!
//! Mismatched value counts are never errors: they are cropped or padded to
//! the known column arity and reported at `warn` level.

use tracing::warn;

use crate::value::{Row, Value};

/// Outcome of a reconciliation that had to change its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: usize,
    pub given: usize,
}

/// Truncate `columns` and `values` to the shorter of the two.
///
/// Returns the mismatch when anything was dropped.
pub fn crop<C>(table: &str, columns: &mut Vec<C>, values: &mut Vec<Value>) -> Option<Mismatch> {
    if columns.len() == values.len() {
        return None;
    }
    let mismatch = Mismatch {
        expected: columns.len(),
        given: values.len(),
    };
    let keep = columns.len().min(values.len());
    columns.truncate(keep);
    values.truncate(keep);
    warn!(
        table,
        expected = mismatch.expected,
        given = mismatch.given,
        "value count does not match column count; extra entries dropped"
    );
    Some(mismatch)
}

/// Pad short rows with NULL and truncate long ones so every row has `arity`
/// values. Logs one summary for the whole batch.
pub fn fit_rows(table: &str, rows: &mut [Row], arity: usize) -> usize {
    let mut padded = 0;
    let mut truncated = 0;
    for row in rows.iter_mut() {
        if row.len() < arity {
            padded += 1;
            row.resize(arity, Value::Null);
        } else if row.len() > arity {
            truncated += 1;
            row.truncate(arity);
        }
    }
    let changed = padded + truncated;
    if changed > 0 {
        warn!(
            table,
            arity, padded, truncated, "row lengths do not match column count; rows adjusted"
        );
    }
    changed
}

/// Length of the longest row; the arity used for the prototype statement.
pub fn widest(rows: &[Row]) -> usize {
    rows.iter().map(Vec::len).max().unwrap_or(0)
}

/// Transpose `column → values` into rows, stopping at the shortest column.
pub fn zip_columns(table: &str, columns: Vec<(String, Vec<Value>)>) -> (Vec<String>, Vec<Row>) {
    let height = columns.iter().map(|(_, v)| v.len()).min().unwrap_or(0);
    let tallest = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    if height != tallest {
        warn!(
            table,
            shortest = height,
            longest = tallest,
            "column value lists differ in length; extra values dropped"
        );
    }

    let mut names = Vec::with_capacity(columns.len());
    let mut rows: Vec<Row> = (0..height).map(|_| Vec::with_capacity(columns.len())).collect();
    for (name, values) in columns {
        names.push(name);
        for (row, value) in rows.iter_mut().zip(values) {
            row.push(value);
        }
    }
    (names, rows)
}
