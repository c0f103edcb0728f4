//! portfolio_grid: a typed, multi-column sortable table engine.
//!
//! Rows are nested JSON records. Columns locate values with dotted paths and
//! declare how those values compare. A [`SortState`] tracks which columns are
//! sorted and in which direction, and [`sort`] produces an ordered view of the
//! rows without touching them.

pub mod column;
pub mod compare;
pub mod config;
pub mod error;
pub mod format;
pub mod grid;
pub mod path;
pub mod sort;

pub use column::{Column, Columns, Format, ValueType};
pub use compare::compare;
pub use error::GridError;
pub use grid::Grid;
pub use path::{resolve, Record};
pub use sort::{sort, sorted_indices, SortDirection, SortKey, SortState};

use serde_json::Value;

/// Parse a JSON array of records.
pub fn rows_from_str(data: &str) -> Result<Vec<Value>, GridError> {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::Array(rows)) => Ok(rows),
        Ok(_) => Err(GridError::InvalidRows("expected a JSON array of records".to_string())),
        Err(e) => Err(GridError::InvalidRows(e.to_string())),
    }
}
