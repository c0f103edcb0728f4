//! Column descriptors and the validated column set a grid is driven by.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GridError;

/// Semantic type of a column, selecting the comparison strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ValueType {
    #[default]
    String,
    Number,
    Date,
    Cash,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Date => "date",
            ValueType::Cash => "cash",
        }
    }

    /// The display strategy used when a column does not name one.
    pub fn default_format(&self) -> Format {
        match self {
            ValueType::Cash => Format::Cash,
            ValueType::Date => Format::Date,
            ValueType::String | ValueType::Number => Format::Text,
        }
    }
}

/// Lenient: anything that is not a known type name compares as a string.
impl FromStr for ValueType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "number" => ValueType::Number,
            "date" => ValueType::Date,
            "cash" => ValueType::Cash,
            _ => ValueType::String,
        })
    }
}

impl From<String> for ValueType {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed set of cell display strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// The value as is; strings without quotes.
    Text,
    /// Two decimals, with the grid's currency when one is set.
    Cash,
    /// `DD/MM/YYYY`.
    Date,
    /// Thousands, millions and billions as `K`, `M`, `B`.
    Compact,
}

/// One column of the grid. `path` identifies the column for sorting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub header: String,
    pub path: String,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

impl Column {
    pub fn new(header: &str, path: &str, value_type: ValueType) -> Column {
        Column {
            header: header.to_string(),
            path: path.to_string(),
            sortable: true,
            value_type,
            format: None,
        }
    }

    pub fn unsortable(mut self) -> Column {
        self.sortable = false;
        self
    }

    pub fn with_format(mut self, format: Format) -> Column {
        self.format = Some(format);
        self
    }

    pub fn display_format(&self) -> Format {
        self.format.unwrap_or_else(|| self.value_type.default_format())
    }
}

/// An ordered set of columns with unique paths.
#[derive(Debug, Clone, Default)]
pub struct Columns {
    columns: Vec<Column>,
    by_path: HashMap<String, usize>,
}

impl Columns {
    /// Build a column set, rejecting the configuration if a path repeats.
    pub fn new(columns: Vec<Column>) -> Result<Columns, GridError> {
        let mut by_path = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            if by_path.insert(column.path.clone(), i).is_some() {
                return Err(GridError::DuplicatePath(column.path.clone()));
            }
        }
        Ok(Columns { columns, by_path })
    }

    /// Parse a JSON array of column descriptors.
    pub fn from_json(data: &str) -> Result<Columns, GridError> {
        let columns: Vec<Column> =
            serde_json::from_str(data).map_err(GridError::InvalidColumns)?;
        debug!(count = columns.len(), "loaded column configuration");
        Columns::new(columns)
    }

    pub fn get(&self, path: &str) -> Option<&Column> {
        self.by_path.get(path).map(|&i| &self.columns[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns for a list of stock holdings with optional extended quote data.
    pub fn holdings() -> Columns {
        let columns = vec![
            Column::new("Symbol", "symbol", ValueType::String),
            Column::new("Company", "data.company_name", ValueType::String),
            Column::new("Quantity", "quantity", ValueType::Number),
            Column::new("Purchase", "purchasePrice", ValueType::Cash),
            Column::new("Price", "currentPrice", ValueType::Cash),
            Column::new("Dividend", "data.dividend", ValueType::Cash),
            Column::new("Target", "data.priceTarget", ValueType::Cash),
            Column::new("Updated", "data.last_updated", ValueType::Date),
            Column::new("Id", "id", ValueType::String).unsortable(),
        ];
        let by_path = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.path.clone(), i))
            .collect();
        Columns { columns, by_path }
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
