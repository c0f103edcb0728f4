//! Error types for portfolio_grid
//!
//! The sorting core never fails: unresolvable paths, un-coercible values and
//! unknown sort keys all degrade to absent/zero/equal. The errors below only
//! come from building a column set or loading data for the grid.

use thiserror::Error;

/// Errors raised while loading column configurations or row data.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("Column path '{0}' appears more than once")]
    DuplicatePath(String),

    #[error("Invalid column configuration: {0}")]
    InvalidColumns(#[source] serde_json::Error),

    #[error("Invalid row data: {0}")]
    InvalidRows(String),
}
