//! Binds a column set, a sort state and a dataset into rendered rows.

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, CellAlignment, ContentArrangement, Table};
use tracing::debug;

use crate::column::{Column, Columns, Format, ValueType};
use crate::format::format_value;
use crate::path::Record;
use crate::sort::{sorted_indices, SortState};

#[derive(Debug, Clone)]
pub struct Grid {
    columns: Columns,
    sort: SortState,
    currency: Option<String>,
}

impl Grid {
    pub fn new(columns: Columns) -> Grid {
        Grid {
            columns,
            sort: SortState::new(),
            currency: None,
        }
    }

    pub fn with_currency(mut self, currency: &str) -> Grid {
        self.currency = Some(currency.to_string());
        self
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Header click. Only sortable columns react; returns whether the sort
    /// state changed.
    pub fn click(&mut self, path: &str) -> bool {
        match self.columns.get(path) {
            Some(column) if column.sortable => {
                self.sort.toggle(path);
                debug!(path, state = %self.sort, "toggled sort");
                true
            }
            Some(_) => false,
            None => {
                debug!(path, "click on unknown column");
                false
            }
        }
    }

    /// Header labels with a direction marker on sorted columns, and the key's
    /// precedence when several keys are active.
    pub fn headers(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| self.header_label(column))
            .collect()
    }

    fn header_label(&self, column: &Column) -> String {
        let Some(direction) = self.sort.direction_of(&column.path) else {
            return column.header.clone();
        };
        match self.sort.precedence_of(&column.path) {
            Some(i) if self.sort.len() > 1 => {
                format!("{} {}{}", column.header, direction.arrow(), i + 1)
            }
            _ => format!("{} {}", column.header, direction.arrow()),
        }
    }

    pub fn cells<R: Record>(&self, row: &R) -> Vec<String> {
        let currency = self.currency.as_deref();
        self.columns
            .iter()
            .map(|column| format_value(row.resolve(&column.path), column.display_format(), currency))
            .collect()
    }

    /// Rows in display order, each paired with its position in `rows`.
    pub fn view<'a, R: Record>(&self, rows: &'a [R]) -> Vec<(usize, &'a R)> {
        sorted_indices(rows, &self.sort, &self.columns)
            .into_iter()
            .map(|i| (i, &rows[i]))
            .collect()
    }

    pub fn table<R: Record>(&self, rows: &[R]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(120);

        table.set_header(
            self.headers()
                .into_iter()
                .map(|label| Cell::new(label).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );

        let alignments: Vec<CellAlignment> = self.columns.iter().map(alignment).collect();
        for (_, row) in self.view(rows) {
            table.add_row(
                self.cells(row)
                    .into_iter()
                    .zip(&alignments)
                    .map(|(text, &align)| Cell::new(text).set_alignment(align))
                    .collect::<Vec<_>>(),
            );
        }
        table
    }
}

fn alignment(column: &Column) -> CellAlignment {
    match (column.value_type, column.display_format()) {
        (_, Format::Cash | Format::Compact) => CellAlignment::Right,
        (ValueType::Number | ValueType::Cash, _) => CellAlignment::Right,
        _ => CellAlignment::Left,
    }
}
